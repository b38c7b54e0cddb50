pub mod allocations;
pub mod rooms;
pub mod stats;

use actix_web::HttpResponse;

use crate::models::ErrorCode;
use crate::services::not_found;

define_service!(HostelService);

fn room_not_found() -> HttpResponse {
    not_found(ErrorCode::HostelRoomNotFound, "Hostel room not found")
}
