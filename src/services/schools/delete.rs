use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SchoolService, evict_school_cache};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response_with, not_found, org_scope, realtime::publish_change};

pub async fn delete_school(
    service: &SchoolService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = org_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.delete_school(&scope, id).await {
        Ok(true) => {
            info!("School {} of organization {} deleted", id, scope.organization_id);
            evict_school_cache(request, scope.organization_id, id).await;
            publish_change(
                scope.organization_id,
                Some(id),
                "schools",
                ChangeAction::Delete,
                id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "School deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(error_response_with(&e, ErrorCode::SchoolInUse)),
    }
}
