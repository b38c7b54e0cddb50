pub mod manage;
pub mod summary;

use actix_web::HttpResponse;

use crate::models::ErrorCode;

define_service!(DonationService);

fn donation_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::DonationNotFound, "Donation not found")
}
