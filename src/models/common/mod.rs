pub mod pagination;
pub mod response;
pub mod tenant;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use tenant::{OrgScope, TenantScope};

use serde::{Deserialize, Deserializer};

/// 将空字符串视为缺省值的可选查询参数
///
/// 表单筛选框清空时前端通常会传 `?status=`，这里统一当作未设置。
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// 金额保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        class_id: Option<i64>,
    }

    #[test]
    fn test_empty_string_as_none() {
        let f: Filter = serde_json::from_str(r#"{"class_id": ""}"#).unwrap();
        assert_eq!(f.class_id, None);
        let f: Filter = serde_json::from_str(r#"{"class_id": "12"}"#).unwrap();
        assert_eq!(f.class_id, Some(12));
        let f: Filter = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(f.class_id, None);
        assert!(serde_json::from_str::<Filter>(r#"{"class_id": "x"}"#).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
