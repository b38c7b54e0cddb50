use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FeeService, check_amount, structure_not_found};
use crate::models::fees::requests::{
    CreateFeeStructureRequest, FeeStructureListParams, UpdateFeeStructureRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, tenant_scope};

const TABLE: &str = "fee_structures";

impl FeeService {
    pub async fn list_structures(
        &self,
        params: FeeStructureListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_fee_structures(&scope, &params).await {
            Ok(structures) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                structures,
                "Fee structures retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_structure(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_fee_structure(&scope, id).await {
            Ok(Some(structure)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                structure,
                "Fee structure retrieved successfully",
            ))),
            Ok(None) => Ok(structure_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_structure(
        &self,
        mut req: CreateFeeStructureRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Name is required"));
        }
        if let Err(msg) = check_amount(Some(req.amount), "Amount") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_fee_structure(&scope, req).await {
            Ok(structure) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, structure.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    structure,
                    "Fee structure created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_structure(
        &self,
        id: i64,
        req: UpdateFeeStructureRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Name is required"));
        }
        if let Err(msg) = check_amount(req.amount, "Amount") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_fee_structure(&scope, id, req).await {
            Ok(Some(structure)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, structure.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    structure,
                    "Fee structure updated successfully",
                )))
            }
            Ok(None) => Ok(structure_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_structure(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_fee_structure(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Fee structure deleted successfully",
                )))
            }
            Ok(false) => Ok(structure_not_found()),
            Err(e) => Ok(error_response_with(&e, ErrorCode::FeeStructureInUse)),
        }
    }
}
