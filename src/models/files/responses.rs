use serde::Serialize;
use ts_rs::TS;

#[derive(Serialize, TS)]
#[ts(export, export_to = "file.ts")]
pub struct FileUploadResponse {
    /// 下载凭证
    pub download_token: String,
    /// 原始文件名
    pub file_name: String,
    /// 文件大小(字节)
    pub size: i64,
    /// 文件类型
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
