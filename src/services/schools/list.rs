use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, schools::SchoolListParams};
use crate::services::{error_response, org_scope};

pub async fn list_schools(
    service: &SchoolService,
    params: SchoolListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = org_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_schools(&scope, &params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Schools retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
