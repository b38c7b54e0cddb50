use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CommunicationService, require_text};
use crate::models::communications::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{
    bad_request, current_user, error_response, not_found, tenant_scope, today,
};

const TABLE: &str = "announcements";

fn announcement_not_found() -> HttpResponse {
    not_found(ErrorCode::NotFound, "Announcement not found")
}

/// 去掉空白项与重复项
pub(crate) fn normalize_audience(audience: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(audience.len());
    for item in audience {
        let item = item.trim().to_lowercase();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl CommunicationService {
    pub async fn list_announcements(
        &self,
        params: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_announcements(&scope, &params, today()).await {
            Ok(announcements) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                announcements,
                "Announcements retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_announcement(
        &self,
        mut req: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        if let Err(msg) = require_text(Some(&req.title), "Title")
            .and_then(|_| require_text(Some(&req.content), "Content"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        req.target_audience = normalize_audience(req.target_audience);
        let publish_date = req.publish_date.unwrap_or_else(today);

        let storage = self.get_storage(request)?;
        match storage
            .create_announcement(&scope, user.id, req, publish_date)
            .await
        {
            Ok(announcement) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, announcement.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    announcement,
                    "Announcement published successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_announcement(
        &self,
        id: i64,
        mut req: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = require_text(req.title.as_deref(), "Title")
            .and_then(|_| require_text(req.content.as_deref(), "Content"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        req.target_audience = req.target_audience.map(normalize_audience);

        let storage = self.get_storage(request)?;
        match storage.update_announcement(&scope, id, req).await {
            Ok(Some(announcement)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, announcement.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    announcement,
                    "Announcement updated successfully",
                )))
            }
            Ok(None) => Ok(announcement_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_announcement(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_announcement(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Announcement deleted successfully",
                )))
            }
            Ok(false) => Ok(announcement_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_audience() {
        let audience = vec![
            "Teachers".to_string(),
            " ".to_string(),
            "parents".to_string(),
            "teachers ".to_string(),
        ];
        assert_eq!(normalize_audience(audience), vec!["teachers", "parents"]);
    }
}
