use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FeeService, assignment_not_found, check_amount};
use crate::models::fees::AssignmentStatus;
use crate::models::fees::requests::{
    BulkAssignRequest, CreateFeeAssignmentRequest, FeeAssignmentListParams,
    UpdateFeeAssignmentRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{
    bad_request, error_response, error_response_with, tenant_scope, today,
};

const TABLE: &str = "fee_assignments";

/// 应收状态只能手动改为 cancelled，其余由金额推导
pub(crate) fn check_manual_status(status: Option<AssignmentStatus>) -> Result<(), String> {
    match status {
        None | Some(AssignmentStatus::Cancelled) => Ok(()),
        Some(other) => Err(format!(
            "Status {other} is derived and cannot be set manually"
        )),
    }
}

impl FeeService {
    pub async fn list_assignments(
        &self,
        params: FeeAssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_fee_assignments(&scope, &params).await {
            Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignments,
                "Fee assignments retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_assignment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_fee_assignment(&scope, id).await {
            Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Fee assignment retrieved successfully",
            ))),
            Ok(None) => Ok(assignment_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_assignment(
        &self,
        req: CreateFeeAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_amount(req.original_amount, "Original amount")
            .and_then(|_| check_amount(req.assigned_amount, "Assigned amount"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_fee_assignment(&scope, req, today()).await {
            Ok(assignment) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, assignment.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    assignment,
                    "Fee assigned successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 按班级批量分配；已有该项目应收的学生跳过
    pub async fn bulk_assign(
        &self,
        req: BulkAssignRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_amount(req.assigned_amount, "Assigned amount") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        let structure_id = req.fee_structure_id;
        match storage.bulk_assign_fees(&scope, req, today()).await {
            Ok(result) => {
                if result.created > 0 {
                    publish_school_change(&scope, TABLE, ChangeAction::Insert, structure_id);
                }
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    result,
                    "Fees assigned successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_assignment(
        &self,
        id: i64,
        req: UpdateFeeAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_manual_status(req.status)
            .and_then(|_| check_amount(req.original_amount, "Original amount"))
            .and_then(|_| check_amount(req.assigned_amount, "Assigned amount"))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_fee_assignment(&scope, id, req, today()).await {
            Ok(Some(assignment)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, assignment.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    assignment,
                    "Fee assignment updated successfully",
                )))
            }
            Ok(None) => Ok(assignment_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_assignment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_fee_assignment(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Fee assignment deleted successfully",
                )))
            }
            Ok(false) => Ok(assignment_not_found()),
            Err(e) => Ok(error_response_with(&e, ErrorCode::FeeAssignmentHasPayments)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cancelled_is_manual() {
        assert!(check_manual_status(None).is_ok());
        assert!(check_manual_status(Some(AssignmentStatus::Cancelled)).is_ok());
        assert!(check_manual_status(Some(AssignmentStatus::Paid)).is_err());
        assert!(check_manual_status(Some(AssignmentStatus::Waived)).is_err());
    }
}
