use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission, RequireTenant};
use crate::models::users::permissions::Resource;
use crate::services::FileService;
use crate::utils::SafeFileToken;

static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_upload(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_upload(&request, payload).await
}

pub async fn handle_download(
    request: HttpRequest,
    token: SafeFileToken,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_download(&request, token.0).await
}

// 上传记录学校范围；下载只校验组织
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(RequireTenant::organization())
            .wrap(middlewares::RequireJWT)
            .route(
                "/upload",
                web::post()
                    .to(handle_upload)
                    .wrap(RequireTenant::school())
                    .wrap(RateLimit::file_upload())
                    .wrap(RequirePermission::create(Resource::Files)),
            )
            .route(
                "/download/{token}",
                web::get()
                    .to(handle_download)
                    .wrap(RequirePermission::read(Resource::Files)),
            ),
    );
}
