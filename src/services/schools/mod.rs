pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, keys};
use crate::models::schools::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};

define_service!(SchoolService);

impl SchoolService {
    pub async fn list_schools(
        &self,
        params: SchoolListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, params, request).await
    }

    pub async fn create_school(
        &self,
        req: CreateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, req, request).await
    }

    pub async fn get_school(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_school(self, id, request).await
    }

    pub async fn update_school(
        &self,
        id: i64,
        req: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, id, req, request).await
    }

    pub async fn delete_school(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_school(self, id, request).await
    }
}

// 学校变更后清除租户中间件的缓存
async fn evict_school_cache(request: &HttpRequest, organization_id: i64, school_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache
            .remove(&keys::school(organization_id, school_id))
            .await;
    }
}

pub(crate) fn validate_school_fields(
    name: Option<&str>,
    code: Option<&str>,
    email: Option<&str>,
) -> Result<(), &'static str> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err("School name cannot be empty");
    }
    if code.is_some_and(|c| c.trim().is_empty()) {
        return Err("School code cannot be empty");
    }
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        crate::utils::validate::validate_email(email)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_school_fields() {
        assert!(validate_school_fields(Some("Central"), Some("C1"), None).is_ok());
        assert!(validate_school_fields(Some("  "), Some("C1"), None).is_err());
        assert!(validate_school_fields(None, Some(""), None).is_err());
        assert!(validate_school_fields(None, None, Some("bad")).is_err());
        assert!(validate_school_fields(None, None, Some("")).is_ok());
    }
}
