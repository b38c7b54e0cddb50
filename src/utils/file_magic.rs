//! 上传文件的内容签名校验

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// 扩展名 -> 允许的文件头
///
/// 学生证件照、成绩单扫描件、Office 表格与文档。
/// OOXML 与 zip 共用同一个文件头。
const SIGNATURES: &[(&[&str], &[&[u8]])] = &[
    (&[".png"], &[PNG]),
    (&[".jpg", ".jpeg"], &[JPEG]),
    (&[".gif"], &[b"GIF87a", b"GIF89a"]),
    (&[".pdf"], &[b"%PDF"]),
    (&[".doc", ".xls"], &[OLE]),
    (&[".docx", ".xlsx", ".zip"], &[ZIP]),
];

/// 不做签名校验，但必须是 UTF-8 文本
const TEXT_TYPES: &[&str] = &[".csv", ".txt"];

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// 文本文件的首块可能在多字节字符中间截断，只检查到最后一个完整字符
fn looks_like_text(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && !data[..e.valid_up_to()].contains(&0),
    }
}

/// 校验上传内容的首个数据块是否与扩展名相符
///
/// `extension` 带点号，大小写不敏感。未登记的扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }
    let extension = extension.to_lowercase();

    if extension == ".webp" {
        return is_webp(data);
    }
    if TEXT_TYPES.contains(&extension.as_str()) {
        return !data.contains(&0) && looks_like_text(data);
    }

    SIGNATURES
        .iter()
        .find(|(extensions, _)| extensions.contains(&extension.as_str()))
        .is_some_and(|(_, headers)| headers.iter().any(|h| data.starts_with(h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_signatures() {
        assert!(validate_magic_bytes(PNG, ".PNG"));
        assert!(!validate_magic_bytes(PNG, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(validate_magic_bytes(b"RIFF\x10\x00\x00\x00WEBPVP8 ", ".webp"));
    }

    #[test]
    fn test_office_documents() {
        assert!(validate_magic_bytes(b"PK\x03\x04rest", ".xlsx"));
        assert!(validate_magic_bytes(OLE, ".xls"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
    }

    #[test]
    fn test_text_uploads() {
        assert!(validate_magic_bytes("admission_no,name\nA-1,Zahra".as_bytes(), ".csv"));
        // 截断在多字节字符中间
        let text = "نام".as_bytes();
        assert!(validate_magic_bytes(&text[..text.len() - 1], ".txt"));
        assert!(!validate_magic_bytes(&[0x4D, 0x5A, 0x00, 0x90], ".txt"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(b"MZ", ".exe"));
    }
}
