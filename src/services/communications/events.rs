use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CommunicationService, require_text};
use crate::models::communications::{CreateEventRequest, EventListParams, UpdateEventRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, current_user, error_response, not_found, tenant_scope};

const TABLE: &str = "events";

fn event_not_found() -> HttpResponse {
    not_found(ErrorCode::NotFound, "Event not found")
}

impl CommunicationService {
    pub async fn list_events(
        &self,
        params: EventListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_events(&scope, &params).await {
            Ok(events) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                events,
                "Events retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_event(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_event(&scope, id).await {
            Ok(Some(event)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                event,
                "Event retrieved successfully",
            ))),
            Ok(None) => Ok(event_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_event(
        &self,
        mut req: CreateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        req.title = req.title.trim().to_string();
        if let Err(msg) = require_text(Some(&req.title), "Title") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        if req.start_time >= req.end_time {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Event start time must be before its end time",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.create_event(&scope, user.id, req).await {
            Ok(event) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, event.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    event,
                    "Event created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 时间窗口与状态流转（scheduled → completed / cancelled）由存储层校验
    pub async fn update_event(
        &self,
        id: i64,
        req: UpdateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = require_text(req.title.as_deref(), "Title") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_event(&scope, id, req).await {
            Ok(Some(event)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, event.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    event,
                    "Event updated successfully",
                )))
            }
            Ok(None) => Ok(event_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_event(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_event(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Event deleted successfully",
                )))
            }
            Ok(false) => Ok(event_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
