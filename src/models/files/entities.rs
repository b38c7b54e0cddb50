use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "file.ts")]
pub struct File {
    pub id: i64,
    // 下载凭证
    pub download_token: String,
    pub organization_id: i64,
    pub school_id: Option<i64>,
    // 原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    pub file_type: String,
    // 上传者
    pub user_id: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// 写入文件记录所需的字段
#[derive(Debug, Clone)]
pub struct NewFile {
    pub download_token: String,
    pub organization_id: i64,
    pub school_id: Option<i64>,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
}
