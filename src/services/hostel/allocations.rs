use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HostelService, room_not_found};
use crate::models::hostel::{AllocateRoomRequest, AllocationListParams, CheckoutRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{error_response, error_response_with, tenant_scope, today};

const TABLE: &str = "hostel_allocations";

impl HostelService {
    pub async fn list_allocations(
        &self,
        params: AllocationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_allocations(&scope, &params).await {
            Ok(allocations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                allocations,
                "Allocations retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 分配床位；满员房间返回 HostelRoomFull，学生已有床位返回 HostelAllocationExists
    pub async fn allocate(
        &self,
        req: AllocateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let rooms = match storage.list_all_hostel_rooms(&scope).await {
            Ok(rooms) => rooms,
            Err(e) => return Ok(error_response(&e)),
        };
        let Some(room) = rooms.iter().find(|r| r.id == req.room_id) else {
            return Ok(room_not_found());
        };
        if room.free_beds() == 0 {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HostelRoomFull,
                "Hostel room is full",
            )));
        }

        let room_id = room.id;
        match storage.allocate_room(&scope, req, today()).await {
            Ok(allocation) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, allocation.id);
                publish_school_change(&scope, "hostel_rooms", ChangeAction::Update, room_id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    allocation,
                    "Room allocated successfully",
                )))
            }
            Err(e) => Ok(error_response_with(&e, ErrorCode::HostelAllocationExists)),
        }
    }

    pub async fn checkout(
        &self,
        id: i64,
        req: CheckoutRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;
        let checkout_on = req.checkout_on.unwrap_or_else(today);

        match storage.checkout_allocation(&scope, id, checkout_on).await {
            Ok(allocation) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, allocation.id);
                publish_school_change(
                    &scope,
                    "hostel_rooms",
                    ChangeAction::Update,
                    allocation.room_id,
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    allocation,
                    "Checked out successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }
}
