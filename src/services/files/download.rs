use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::{FileService, file_failure};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::services::{error_response, not_found, org_scope};

/// 文件名中的引号与控制字符会破坏 Content-Disposition
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let org = org_scope(request)?;
    let storage = service.get_storage(request)?;

    let file = match storage.get_file_by_token(&file_token).await {
        // 其他组织的文件按不存在处理
        Ok(Some(f)) if f.organization_id == org.organization_id => f,
        Ok(_) => return Ok(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let file_path = format!("{}/{}", AppConfig::get().upload.dir, file.stored_name);
    if !Path::new(&file_path).exists() {
        tracing::warn!("File record {} has no content on disk", file.id);
        return Ok(not_found(ErrorCode::FileNotFound, "File not found"));
    }

    let buf = match std::fs::read(&file_path) {
        Ok(buf) => buf,
        Err(e) => {
            return Ok(file_failure(
                ErrorCode::InternalServerError,
                e,
                "File read failed",
            ));
        }
    };

    let content_type = if file.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        file.file_type.clone()
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_file_name(&file.original_name)
            ),
        ))
        .body(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report \"final\".pdf"), "report final.pdf");
        assert_eq!(sanitize_file_name("a\r\nb.txt"), "ab.txt");
        assert_eq!(sanitize_file_name("\"\""), "download");
    }
}
