//! 附件上传与下载
//!
//! 文件内容落盘到 `upload.dir`，数据库只保存元数据与下载凭证。

pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::NazimError;
use crate::models::{ApiResponse, ErrorCode};

define_service!(FileService);

impl FileService {
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_token).await
    }
}

/// 磁盘读写失败：记录日志，对外只返回通用信息
fn file_failure(code: ErrorCode, err: impl std::fmt::Display, message: &str) -> HttpResponse {
    tracing::error!("{}", NazimError::file_operation(err.to_string()));
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(code, message))
}
