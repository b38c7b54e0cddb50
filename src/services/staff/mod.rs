pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ErrorCode;
use crate::models::staff::{CreateStaffRequest, StaffListParams, UpdateStaffRequest};

define_service!(StaffService);

impl StaffService {
    pub async fn list_staff(
        &self,
        params: StaffListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_staff(self, params, request).await
    }

    pub async fn create_staff(
        &self,
        req: CreateStaffRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_staff(self, req, request).await
    }

    pub async fn get_staff(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_staff(self, id, request).await
    }

    pub async fn update_staff(
        &self,
        id: i64,
        req: UpdateStaffRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_staff(self, id, req, request).await
    }

    pub async fn delete_staff(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_staff(self, id, request).await
    }
}

fn staff_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::StaffNotFound, "Staff member not found")
}

pub(crate) fn validate_staff_fields(
    employee_id: Option<&str>,
    full_name: Option<&str>,
    email: Option<&str>,
    salary: Option<f64>,
) -> Result<(), &'static str> {
    if employee_id.is_some_and(|v| v.trim().is_empty()) {
        return Err("Employee ID is required");
    }
    if full_name.is_some_and(|v| v.trim().is_empty()) {
        return Err("Full name is required");
    }
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        crate::utils::validate::validate_email(email)?;
    }
    if salary.is_some_and(|s| s < 0.0 || !s.is_finite()) {
        return Err("Salary must be a non-negative number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_staff_fields() {
        assert!(validate_staff_fields(Some("EMP-1"), Some("Amina"), None, Some(1200.0)).is_ok());
        assert!(validate_staff_fields(None, None, Some(""), None).is_ok());
        assert!(validate_staff_fields(Some(""), Some("Amina"), None, None).is_err());
        assert!(validate_staff_fields(None, None, Some("not-an-email"), None).is_err());
        assert!(validate_staff_fields(None, None, None, Some(-5.0)).is_err());
    }
}
