use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CommunicationService, require_text};
use crate::models::communications::{MessageListParams, SendMessageRequest, UnreadCountResponse};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_change;
use crate::services::{bad_request, current_user, error_response, not_found, org_scope};

const TABLE: &str = "messages";

fn message_not_found() -> HttpResponse {
    not_found(ErrorCode::MessageNotFound, "Message not found")
}

impl CommunicationService {
    pub async fn list_messages(
        &self,
        params: MessageListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = org_scope(request)?;
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_messages(&scope, user.id, &params).await {
            Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                messages,
                "Messages retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 收件人必须属于同一组织
    pub async fn send_message(
        &self,
        req: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = org_scope(request)?;
        let user = current_user(request)?;
        if let Err(msg) = require_text(Some(&req.subject), "Subject")
            .and_then(|_| require_text(Some(&req.body), "Body"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        if req.recipient_id == user.id {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Cannot send a message to yourself",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.send_message(&scope, user.id, req).await {
            Ok(message) => {
                publish_change(scope.organization_id, None, TABLE, ChangeAction::Insert, message.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    message,
                    "Message sent successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn mark_message_read(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = org_scope(request)?;
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.mark_message_read(&scope, user.id, id).await {
            Ok(Some(message)) => {
                publish_change(scope.organization_id, None, TABLE, ChangeAction::Update, message.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    message,
                    "Message marked as read",
                )))
            }
            Ok(None) => Ok(message_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = org_scope(request)?;
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.count_unread_messages(&scope, user.id).await {
            Ok(unread) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnreadCountResponse { unread },
                "Unread count retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 只从调用者的收件箱或发件箱中移除
    pub async fn delete_message(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = org_scope(request)?;
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_message(&scope, user.id, id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Message deleted successfully",
            ))),
            Ok(false) => Ok(message_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
