use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicService, check_positive, check_required, record_not_found};
use crate::models::academic::{
    AcademicListParams, CreateBuildingRequest, CreateRoomRequest, RoomListParams,
    UpdateBuildingRequest, UpdateRoomRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, tenant_scope};

impl AcademicService {
    pub async fn list_buildings(
        &self,
        params: AcademicListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_buildings(&scope, &params).await {
            Ok(buildings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                buildings,
                "Buildings retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_building(
        &self,
        mut req: CreateBuildingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        if let Err(msg) = check_required(Some(&req.name), "Building name")
            .and_then(|_| check_positive(req.floors, "Floors"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_building(&scope, req).await {
            Ok(building) => {
                publish_school_change(&scope, "buildings", ChangeAction::Insert, building.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    building,
                    "Building created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_building(
        &self,
        id: i64,
        req: UpdateBuildingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_required(req.name.as_deref(), "Building name")
            .and_then(|_| check_positive(req.floors, "Floors"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_building(&scope, id, req).await {
            Ok(Some(building)) => {
                publish_school_change(&scope, "buildings", ChangeAction::Update, building.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    building,
                    "Building updated successfully",
                )))
            }
            Ok(None) => Ok(record_not_found("Building")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 仍有教室引用时拒绝删除
    pub async fn delete_building(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_building(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, "buildings", ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Building deleted successfully",
                )))
            }
            Ok(false) => Ok(record_not_found("Building")),
            Err(e) => Ok(error_response_with(&e, ErrorCode::AcademicRecordInUse)),
        }
    }

    pub async fn list_rooms(
        &self,
        params: RoomListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_rooms(&scope, &params).await {
            Ok(rooms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                rooms,
                "Rooms retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_room(
        &self,
        mut req: CreateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.room_number = req.room_number.trim().to_string();
        if let Err(msg) = check_required(Some(&req.room_number), "Room number")
            .and_then(|_| check_positive(req.capacity, "Capacity"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_room(&scope, req).await {
            Ok(room) => {
                publish_school_change(&scope, "rooms", ChangeAction::Insert, room.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    room,
                    "Room created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_room(
        &self,
        id: i64,
        req: UpdateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_required(req.room_number.as_deref(), "Room number")
            .and_then(|_| check_positive(req.capacity, "Capacity"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_room(&scope, id, req).await {
            Ok(Some(room)) => {
                publish_school_change(&scope, "rooms", ChangeAction::Update, room.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    room,
                    "Room updated successfully",
                )))
            }
            Ok(None) => Ok(record_not_found("Room")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_room(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_room(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, "rooms", ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Room deleted successfully")))
            }
            Ok(false) => Ok(record_not_found("Room")),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
