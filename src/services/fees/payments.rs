use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FeeService, domain_error};
use crate::models::fees::requests::{CreateFeePaymentRequest, FeePaymentListParams};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{
    bad_request, current_user, error_response, not_found, tenant_scope, today,
};

impl FeeService {
    pub async fn list_payments(
        &self,
        params: FeePaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let (Some(from), Some(to)) = (params.date_from, params.date_to)
            && from > to
        {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "date_from must not be after date_to",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.list_fee_payments(&scope, &params).await {
            Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                payments,
                "Fee payments retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 缴费与应收更新在同一事务内完成
    pub async fn record_payment(
        &self,
        req: CreateFeePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        if !req.amount.is_finite() || req.amount <= 0.0 {
            return Ok(bad_request(
                ErrorCode::FeePaymentInvalid,
                "Payment amount must be greater than zero",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage
            .record_fee_payment(&scope, user.id, req, today())
            .await
        {
            Ok((payment, assignment)) => {
                publish_school_change(&scope, "fee_payments", ChangeAction::Insert, payment.id);
                publish_school_change(
                    &scope,
                    "fee_assignments",
                    ChangeAction::Update,
                    assignment.id,
                );
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    payment,
                    "Payment recorded successfully",
                )))
            }
            Err(e) => Ok(domain_error(&e, ErrorCode::FeePaymentInvalid)),
        }
    }

    /// 删除缴费并回退应收的已缴金额
    pub async fn delete_payment(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_fee_payment(&scope, id, today()).await {
            Ok(true) => {
                publish_school_change(&scope, "fee_payments", ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Payment deleted successfully",
                )))
            }
            Ok(false) => Ok(not_found(
                ErrorCode::FeePaymentNotFound,
                "Fee payment not found",
            )),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
