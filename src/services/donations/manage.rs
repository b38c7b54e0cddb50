use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DonationService, donation_not_found};
use crate::models::donations::{CreateDonationRequest, DonationListParams, UpdateDonationRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, current_user, error_response, tenant_scope, today};
use crate::utils::random_code::donation_transaction_id;

const TABLE: &str = "donations";

pub(crate) fn validate_donation(
    donor_name: Option<&str>,
    amount: Option<f64>,
) -> Result<(), &'static str> {
    if donor_name.is_some_and(|n| n.trim().is_empty()) {
        return Err("Donor name is required");
    }
    if amount.is_some_and(|a| !a.is_finite() || a <= 0.0) {
        return Err("Donation amount must be greater than zero");
    }
    Ok(())
}

impl DonationService {
    pub async fn list_donations(
        &self,
        params: DonationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_donations(&scope, &params).await {
            Ok(donations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                donations,
                "Donations retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_donation(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_donation(&scope, id).await {
            Ok(Some(donation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                donation,
                "Donation retrieved successfully",
            ))),
            Ok(None) => Ok(donation_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 未提供流水号时按捐赠日期生成
    pub async fn create_donation(
        &self,
        mut req: CreateDonationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        req.donor_name = req.donor_name.trim().to_string();
        if let Err(msg) = validate_donation(Some(&req.donor_name), Some(req.amount)) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let donation_date = req.donation_date.unwrap_or_else(today);
        let transaction_id = req
            .transaction_id
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| donation_transaction_id(donation_date));

        let storage = self.get_storage(request)?;
        match storage
            .create_donation(&scope, user.id, req, transaction_id, donation_date)
            .await
        {
            Ok(donation) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, donation.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    donation,
                    "Donation recorded successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_donation(
        &self,
        id: i64,
        req: UpdateDonationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = validate_donation(req.donor_name.as_deref(), req.amount) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_donation(&scope, id, req).await {
            Ok(Some(donation)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, donation.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    donation,
                    "Donation updated successfully",
                )))
            }
            Ok(None) => Ok(donation_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 重复调用结果相同
    pub async fn generate_receipt(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.mark_receipt_generated(&scope, id).await {
            Ok(Some(donation)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, donation.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    donation,
                    "Receipt generated successfully",
                )))
            }
            Ok(None) => Ok(donation_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_donation(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_donation(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Donation deleted successfully",
                )))
            }
            Ok(false) => Ok(donation_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_donation() {
        assert!(validate_donation(Some("Amina"), Some(10.0)).is_ok());
        assert!(validate_donation(None, None).is_ok());
        assert!(validate_donation(Some(" "), Some(10.0)).is_err());
        assert!(validate_donation(Some("Amina"), Some(0.0)).is_err());
        assert!(validate_donation(None, Some(f64::NAN)).is_err());
    }
}
