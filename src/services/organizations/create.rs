use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::OrganizationService;
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode, organizations::CreateOrganizationRequest};
use crate::services::{bad_request, error_response_with, realtime::publish_change};
use crate::utils::validate::{validate_email, validate_slug};

/// 组织请求的字段校验，通过后返回规范化的请求
pub(crate) fn normalize_organization(
    mut req: CreateOrganizationRequest,
) -> Result<CreateOrganizationRequest, String> {
    req.name = req.name.trim().to_string();
    req.slug = req.slug.trim().to_string();
    if req.name.is_empty() {
        return Err("Organization name is required".to_string());
    }
    validate_slug(&req.slug).map_err(str::to_string)?;
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty()) {
        validate_email(email).map_err(str::to_string)?;
    }
    Ok(req)
}

pub async fn create_organization(
    service: &OrganizationService,
    req: CreateOrganizationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let req = match normalize_organization(req) {
        Ok(req) => req,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request)?;
    match storage.create_organization(req).await {
        Ok(org) => {
            info!("Organization {} ({}) created", org.name, org.slug);
            publish_change(org.id, None, "organizations", ChangeAction::Insert, org.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                org,
                "Organization created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::OrganizationSlugExists)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, slug: &str) -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            name: name.to_string(),
            slug: slug.to_string(),
            email: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_normalize_organization() {
        let req = normalize_organization(request("  Green Valley ", " green-valley ")).unwrap();
        assert_eq!(req.name, "Green Valley");
        assert_eq!(req.slug, "green-valley");

        assert!(normalize_organization(request("", "ok-slug")).is_err());
        assert!(normalize_organization(request("Org", "Bad Slug")).is_err());

        let mut bad_email = request("Org", "org");
        bad_email.email = Some("nope".into());
        assert!(normalize_organization(bad_email).is_err());
    }
}
