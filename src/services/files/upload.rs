use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::{FileService, file_failure};
use crate::config::AppConfig;
use crate::models::files::entities::NewFile;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::{bad_request, current_user, error_response, tenant_scope};
use crate::utils::validate_magic_bytes;

/// 文件扩展名（小写，带点）
pub(crate) fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub(crate) fn is_allowed(extension: &str, allowed_types: &[String]) -> bool {
    !extension.is_empty()
        && allowed_types
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(extension))
}

/// 下载凭证：32 位十六进制
pub(crate) fn new_download_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub async fn handle_upload(
    service: &FileService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let user = current_user(request)?;

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        return Ok(file_failure(
            ErrorCode::FileUploadFailed,
            e,
            "Failed to prepare upload directory",
        ));
    }

    let mut original_name = String::new();
    let mut file_type = String::new();
    let mut stored_name = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }

        if file_uploaded {
            if !stored_name.is_empty() {
                let _ = fs::remove_file(format!("{upload_dir}/{stored_name}"));
            }
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = extension_of(&original_name);
        if !is_allowed(&extension, &config.upload.allowed_types) {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        // MIME 类型只用于记录，不参与校验
        file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let file_path = format!("{upload_dir}/{stored_name}");
        let mut f = match fs::File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                return Ok(file_failure(
                    ErrorCode::FileUploadFailed,
                    e,
                    "Failed to store file",
                ));
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = chunk?;

            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Ok(bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                return Ok(file_failure(
                    ErrorCode::FileUploadFailed,
                    e,
                    "Failed to store file",
                ));
            }
        }

        if total_size == 0 {
            let _ = fs::remove_file(&file_path);
            return Ok(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    }

    let storage = service.get_storage(request)?;
    let new_file = NewFile {
        download_token: new_download_token(),
        organization_id: scope.organization_id,
        school_id: Some(scope.school_id),
        original_name,
        stored_name: stored_name.clone(),
        file_size,
        file_type,
        user_id: user.id,
    };

    match storage.create_file(new_file).await {
        Ok(file) => {
            tracing::info!(
                "File {} uploaded by user {} ({} bytes)",
                file.original_name,
                user.id,
                file.file_size
            );
            let response = FileUploadResponse {
                download_token: file.download_token,
                file_name: file.original_name,
                size: file.file_size,
                content_type: file.file_type,
                uploaded_at: file.uploaded_at,
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(
                response,
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            // 记录写入失败时清理已落盘的内容
            let _ = fs::remove_file(format!("{upload_dir}/{stored_name}"));
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_whitelist() {
        let allowed = vec![".pdf".to_string(), ".PNG".to_string()];
        assert_eq!(extension_of("Report.Final.PDF"), ".pdf");
        assert!(is_allowed(&extension_of("scan.png"), &allowed));
        assert!(is_allowed(".pdf", &allowed));
        assert!(!is_allowed(&extension_of("run.exe"), &allowed));
        assert!(!is_allowed(&extension_of("no_extension"), &allowed));
    }

    #[test]
    fn test_download_token_shape() {
        let token = new_download_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, new_download_token());
    }
}
