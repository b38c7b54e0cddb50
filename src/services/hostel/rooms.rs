use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HostelService, room_not_found};
use crate::models::hostel::{
    CreateHostelRoomRequest, HostelRoomListParams, UpdateHostelRoomRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, tenant_scope};

const TABLE: &str = "hostel_rooms";

pub(crate) fn validate_room(
    hostel_name: Option<&str>,
    room_number: Option<&str>,
    monthly_fee: Option<f64>,
) -> Result<(), &'static str> {
    if hostel_name.is_some_and(|v| v.trim().is_empty()) {
        return Err("Hostel name is required");
    }
    if room_number.is_some_and(|v| v.trim().is_empty()) {
        return Err("Room number is required");
    }
    if monthly_fee.is_some_and(|fee| fee < 0.0) {
        return Err("Monthly fee must not be negative");
    }
    Ok(())
}

impl HostelService {
    pub async fn list_rooms(
        &self,
        params: HostelRoomListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_hostel_rooms(&scope, &params).await {
            Ok(rooms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                rooms,
                "Hostel rooms retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_room(
        &self,
        mut req: CreateHostelRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.hostel_name = req.hostel_name.trim().to_string();
        req.room_number = req.room_number.trim().to_string();
        if let Err(msg) = validate_room(
            Some(&req.hostel_name),
            Some(&req.room_number),
            req.monthly_fee,
        ) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_hostel_room(&scope, req).await {
            Ok(room) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, room.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    room,
                    "Hostel room created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_room(
        &self,
        id: i64,
        req: UpdateHostelRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = validate_room(
            req.hostel_name.as_deref(),
            req.room_number.as_deref(),
            req.monthly_fee,
        ) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_hostel_room(&scope, id, req).await {
            Ok(Some(room)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, room.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    room,
                    "Hostel room updated successfully",
                )))
            }
            Ok(None) => Ok(room_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_room(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_hostel_room(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Hostel room deleted successfully",
                )))
            }
            Ok(false) => Ok(room_not_found()),
            // 有人入住的房间不可删除
            Err(e) => Ok(error_response_with(&e, ErrorCode::HostelAllocationExists)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room() {
        assert!(validate_room(Some("North"), Some("101"), Some(50.0)).is_ok());
        assert!(validate_room(None, None, None).is_ok());
        assert!(validate_room(Some(""), Some("101"), None).is_err());
        assert!(validate_room(Some("North"), Some("  "), None).is_err());
        assert!(validate_room(None, None, Some(-1.0)).is_err());
    }
}
