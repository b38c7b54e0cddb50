//! 公告、活动（学校级）与站内消息（组织级）

pub mod announcements;
pub mod events;
pub mod messages;

define_service!(CommunicationService);

/// 必填文本字段
pub(crate) fn require_text(value: Option<&str>, field: &str) -> Result<(), String> {
    match value {
        Some(v) if v.trim().is_empty() => Err(format!("{field} is required")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text(None, "Title").is_ok());
        assert!(require_text(Some("Exam week"), "Title").is_ok());
        assert_eq!(
            require_text(Some("  "), "Title"),
            Err("Title is required".to_string())
        );
    }
}
