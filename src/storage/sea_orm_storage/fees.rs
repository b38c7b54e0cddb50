//! 收费：收费项目、学生应收、缴费、减免
//!
//! 应收的 paid / remaining / status 只在这里随缴费和减免一起改动，
//! 每次改动都和对应的缴费或减免记录处于同一事务。

use super::SeaOrmStorage;
use super::activity_logs::insert_activity;
use super::scoped::{
    delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped, search_condition,
};
use crate::entity::academic_years::Entity as AcademicYears;
use crate::entity::classes::Entity as Classes;
use crate::entity::fee_assignments::{self, Entity as FeeAssignments};
use crate::entity::fee_exceptions::{self, Entity as FeeExceptions};
use crate::entity::fee_payments::{self, Entity as FeePayments};
use crate::entity::fee_structures::{self, Entity as FeeStructures};
use crate::entity::students::{self, Entity as Students};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::activity_logs::{ActivityEvent, NewActivityLog};
use crate::models::fees::calc::{
    apply_exception, derive_status, remaining_amount, revert_exception, validate_payment,
};
use crate::models::fees::requests::{
    BulkAssignRequest, BulkAssignResponse, CreateFeeAssignmentRequest,
    CreateFeeExceptionRequest, CreateFeePaymentRequest, CreateFeeStructureRequest,
    FeeAssignmentListParams, FeeExceptionListParams, FeePaymentListParams, FeeReportFilter,
    FeeStructureListParams, UpdateFeeAssignmentRequest, UpdateFeeExceptionRequest,
    UpdateFeeStructureRequest,
};
use crate::models::fees::{
    AssignmentStatus, ExceptionType, FeeAssignment, FeeAssignmentListResponse, FeeException,
    FeeExceptionListResponse, FeePayment, FeePaymentListResponse, FeeStructure,
    FeeStructureListResponse,
};
use crate::models::students::StudentStatus;
use crate::storage::FeeStorage;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Set, TransactionTrait,
};
use std::collections::HashSet;

fn check_amount(amount: f64, label: &str) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(NazimError::validation(format!(
            "{label} must be a non-negative number"
        )));
    }
    Ok(())
}

async fn check_structure_links<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    academic_year_id: Option<i64>,
    class_id: Option<i64>,
) -> Result<()> {
    if let Some(id) = academic_year_id {
        ensure_scoped::<AcademicYears, _>(db, scope, id, "Academic year").await?;
    }
    if let Some(id) = class_id {
        ensure_scoped::<Classes, _>(db, scope, id, "Class").await?;
    }
    Ok(())
}

async fn load_assignment<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    id: i64,
) -> Result<fee_assignments::Model> {
    find_scoped::<FeeAssignments, _>(db, scope, id)
        .await?
        .ok_or_else(|| NazimError::not_found(format!("Fee assignment {id} not found")))
}

/// 写回应收金额，剩余与状态统一重新计算
async fn save_amounts<C: ConnectionTrait>(
    db: &C,
    existing: &fee_assignments::Model,
    assigned: f64,
    paid: f64,
    current: AssignmentStatus,
    today: NaiveDate,
) -> Result<fee_assignments::Model> {
    let status = derive_status(current, assigned, paid, existing.due_date, today);
    let model = fee_assignments::ActiveModel {
        id: Set(existing.id),
        assigned_amount: Set(assigned),
        paid_amount: Set(paid),
        remaining_amount: Set(remaining_amount(assigned, paid)),
        status: Set(status.to_string()),
        updated_at: Set(now()),
        ..Default::default()
    };
    model
        .update(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("更新应收失败: {e}")))
}

/// 操作日志里减免记录的 subject_type
const EXCEPTION_SUBJECT: &str = "fee_exceptions";

fn check_validity(valid_from: NaiveDate, valid_to: Option<NaiveDate>) -> Result<()> {
    match valid_to {
        Some(to) if to < valid_from => Err(NazimError::validation(
            "Exception valid_to must not be earlier than valid_from",
        )),
        _ => Ok(()),
    }
}

/// 在应收上应用减免，返回更新后的应收和实际减少的金额
async fn apply_on_assignment<C: ConnectionTrait>(
    db: &C,
    assignment: &fee_assignments::Model,
    kind: ExceptionType,
    value: f64,
    today: NaiveDate,
) -> Result<(fee_assignments::Model, f64)> {
    let applied = apply_exception(
        kind,
        value,
        assignment.original_amount,
        assignment.assigned_amount,
    );
    let status = if applied.waived {
        AssignmentStatus::Waived
    } else {
        assignment.status()
    };
    let updated = save_amounts(
        db,
        assignment,
        applied.assigned_amount,
        assignment.paid_amount,
        status,
        today,
    )
    .await?;
    Ok((updated, applied.exception_amount))
}

/// 把减免减少的金额加回应收，撤销豁免时状态重新推导
async fn revert_on_assignment<C: ConnectionTrait>(
    db: &C,
    assignment: &fee_assignments::Model,
    kind: ExceptionType,
    exception_amount: f64,
    today: NaiveDate,
) -> Result<fee_assignments::Model> {
    let assigned = revert_exception(
        assignment.original_amount,
        assignment.assigned_amount,
        exception_amount,
    );
    let status = match assignment.status() {
        AssignmentStatus::Waived if kind == ExceptionType::Waiver => AssignmentStatus::Pending,
        other => other,
    };
    save_amounts(db, assignment, assigned, assignment.paid_amount, status, today).await
}

async fn student_name<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    student_id: i64,
) -> Result<String> {
    Ok(find_scoped::<Students, _>(db, scope, student_id)
        .await?
        .map_or_else(|| "Unknown".to_string(), |s| s.full_name))
}

#[allow(clippy::too_many_arguments)]
fn new_assignment(
    scope: &TenantScope,
    student_id: i64,
    structure_id: i64,
    academic_year_id: Option<i64>,
    class_id: Option<i64>,
    original: f64,
    assigned: f64,
    due_date: NaiveDate,
    notes: Option<String>,
    today: NaiveDate,
) -> fee_assignments::ActiveModel {
    let status = derive_status(AssignmentStatus::Pending, assigned, 0.0, due_date, today);
    let now = now();
    fee_assignments::ActiveModel {
        organization_id: Set(scope.organization_id),
        school_id: Set(scope.school_id),
        student_id: Set(student_id),
        fee_structure_id: Set(structure_id),
        academic_year_id: Set(academic_year_id),
        class_id: Set(class_id),
        original_amount: Set(original),
        assigned_amount: Set(assigned),
        paid_amount: Set(0.0),
        remaining_amount: Set(remaining_amount(assigned, 0.0)),
        due_date: Set(due_date),
        status: Set(status.to_string()),
        notes: Set(notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl FeeStorage for SeaOrmStorage {
    async fn list_fee_structures(
        &self,
        scope: &TenantScope,
        params: &FeeStructureListParams,
    ) -> Result<FeeStructureListResponse> {
        let select = scoped::<FeeStructures>(scope)
            .apply_if(
                search_condition(params.search.as_deref(), &[fee_structures::Column::Name]),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(fee_structures::Column::AcademicYearId.eq(id))
            })
            .apply_if(params.class_id, |q, id| {
                q.filter(fee_structures::Column::ClassId.eq(id))
            })
            .apply_if(params.is_active, |q, active| {
                q.filter(fee_structures::Column::IsActive.eq(active))
            })
            .order_by_asc(fee_structures::Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_structure()).await
    }

    async fn list_all_fee_structures(&self, scope: &TenantScope) -> Result<Vec<FeeStructure>> {
        let structures = scoped::<FeeStructures>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询收费项目失败: {e}")))?;
        Ok(structures.into_iter().map(|m| m.into_structure()).collect())
    }

    async fn get_fee_structure(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeStructure>> {
        let result = find_scoped::<FeeStructures, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_structure()))
    }

    async fn create_fee_structure(
        &self,
        scope: &TenantScope,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure> {
        check_amount(req.amount, "Amount")?;
        check_structure_links(&self.db, scope, req.academic_year_id, req.class_id).await?;

        let now = now();
        let model = fee_structures::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            academic_year_id: Set(req.academic_year_id),
            class_id: Set(req.class_id),
            name: Set(req.name),
            fee_type: Set(req.fee_type.to_string()),
            amount: Set(req.amount),
            description: Set(req.description),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建收费项目失败: {e}")))?;

        Ok(result.into_structure())
    }

    async fn update_fee_structure(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateFeeStructureRequest,
    ) -> Result<Option<FeeStructure>> {
        if find_scoped::<FeeStructures, _>(&self.db, scope, id)
            .await?
            .is_none()
        {
            return Ok(None);
        }
        if let Some(amount) = req.amount {
            check_amount(amount, "Amount")?;
        }
        check_structure_links(&self.db, scope, req.academic_year_id, req.class_id).await?;

        let mut model = fee_structures::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(academic_year_id) = req.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }
        if let Some(class_id) = req.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(fee_type) = req.fee_type {
            model.fee_type = Set(fee_type.to_string());
        }
        if let Some(amount) = req.amount {
            model.amount = Set(amount);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = req.is_active {
            model.is_active = Set(is_active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新收费项目失败: {e}")))?;

        Ok(Some(result.into_structure()))
    }

    async fn delete_fee_structure(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        let live = scoped::<FeeAssignments>(scope)
            .filter(fee_assignments::Column::FeeStructureId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询应收失败: {e}")))?;
        if live > 0 {
            return Err(NazimError::conflict(format!(
                "Fee structure is still assigned to {live} student(s)"
            )));
        }

        delete_scoped::<FeeStructures, _>(&self.db, scope, id).await
    }

    async fn list_fee_assignments(
        &self,
        scope: &TenantScope,
        params: &FeeAssignmentListParams,
    ) -> Result<FeeAssignmentListResponse> {
        let select = scoped::<FeeAssignments>(scope)
            .apply_if(params.student_id, |q, id| {
                q.filter(fee_assignments::Column::StudentId.eq(id))
            })
            .apply_if(params.fee_structure_id, |q, id| {
                q.filter(fee_assignments::Column::FeeStructureId.eq(id))
            })
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(fee_assignments::Column::AcademicYearId.eq(id))
            })
            .apply_if(params.class_id, |q, id| {
                q.filter(fee_assignments::Column::ClassId.eq(id))
            })
            .apply_if(params.status, |q, status| {
                q.filter(fee_assignments::Column::Status.eq(status.as_str()))
            })
            .order_by_asc(fee_assignments::Column::DueDate)
            .order_by_asc(fee_assignments::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_assignment()).await
    }

    async fn list_fee_assignments_for_report(
        &self,
        scope: &TenantScope,
        filter: &FeeReportFilter,
    ) -> Result<Vec<FeeAssignment>> {
        let assignments = scoped::<FeeAssignments>(scope)
            .apply_if(filter.academic_year_id, |q, id| {
                q.filter(fee_assignments::Column::AcademicYearId.eq(id))
            })
            .apply_if(filter.class_id, |q, id| {
                q.filter(fee_assignments::Column::ClassId.eq(id))
            })
            .order_by_asc(fee_assignments::Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询应收失败: {e}")))?;
        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }

    async fn get_fee_assignment(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeAssignment>> {
        let result = find_scoped::<FeeAssignments, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_assignment()))
    }

    async fn create_fee_assignment(
        &self,
        scope: &TenantScope,
        req: CreateFeeAssignmentRequest,
        today: NaiveDate,
    ) -> Result<FeeAssignment> {
        let student = ensure_scoped::<Students, _>(&self.db, scope, req.student_id, "Student")
            .await?;
        let structure = ensure_scoped::<FeeStructures, _>(
            &self.db,
            scope,
            req.fee_structure_id,
            "Fee structure",
        )
        .await?;

        let original = req.original_amount.unwrap_or(structure.amount);
        let assigned = req.assigned_amount.unwrap_or(original);
        check_amount(original, "Original amount")?;
        check_amount(assigned, "Assigned amount")?;

        let academic_year_id = req.academic_year_id.or(structure.academic_year_id);
        let class_id = req.class_id.or(structure.class_id).or(student.class_id);
        check_structure_links(&self.db, scope, req.academic_year_id, req.class_id).await?;

        let model = new_assignment(
            scope,
            student.id,
            structure.id,
            academic_year_id,
            class_id,
            original,
            assigned,
            req.due_date,
            req.notes,
            today,
        );
        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建应收失败: {e}")))?;

        Ok(result.into_assignment())
    }

    async fn bulk_assign_fees(
        &self,
        scope: &TenantScope,
        req: BulkAssignRequest,
        today: NaiveDate,
    ) -> Result<BulkAssignResponse> {
        ensure_scoped::<Classes, _>(&self.db, scope, req.class_id, "Class").await?;
        let structure = ensure_scoped::<FeeStructures, _>(
            &self.db,
            scope,
            req.fee_structure_id,
            "Fee structure",
        )
        .await?;
        if let Some(id) = req.academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, id, "Academic year").await?;
        }

        let assigned = req.assigned_amount.unwrap_or(structure.amount);
        check_amount(assigned, "Assigned amount")?;
        let academic_year_id = req.academic_year_id.or(structure.academic_year_id);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let students = scoped::<Students>(scope)
            .filter(students::Column::ClassId.eq(req.class_id))
            .filter(students::Column::Status.eq(StudentStatus::Active.as_str()))
            .order_by_asc(students::Column::Id)
            .all(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学生失败: {e}")))?;

        let already: HashSet<i64> = scoped::<FeeAssignments>(scope)
            .filter(fee_assignments::Column::FeeStructureId.eq(structure.id))
            .all(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询应收失败: {e}")))?
            .into_iter()
            .map(|a| a.student_id)
            .collect();

        let mut created = 0;
        let mut skipped = 0;
        for student in students {
            if already.contains(&student.id) {
                skipped += 1;
                continue;
            }
            new_assignment(
                scope,
                student.id,
                structure.id,
                academic_year_id,
                Some(req.class_id),
                structure.amount,
                assigned,
                req.due_date,
                None,
                today,
            )
            .insert(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建应收失败: {e}")))?;
            created += 1;
        }

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(BulkAssignResponse { created, skipped })
    }

    async fn update_fee_assignment(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateFeeAssignmentRequest,
        today: NaiveDate,
    ) -> Result<Option<FeeAssignment>> {
        let Some(existing) = find_scoped::<FeeAssignments, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };

        let current = match req.status {
            None => existing.status(),
            Some(AssignmentStatus::Cancelled) => AssignmentStatus::Cancelled,
            Some(other) => {
                return Err(NazimError::validation(format!(
                    "Status {other} is derived and cannot be set manually"
                )));
            }
        };

        let (structure_id, structure_amount) = match req.fee_structure_id {
            Some(structure_id) if structure_id != existing.fee_structure_id => {
                let structure = ensure_scoped::<FeeStructures, _>(
                    &self.db,
                    scope,
                    structure_id,
                    "Fee structure",
                )
                .await?;
                (structure.id, Some(structure.amount))
            }
            _ => (existing.fee_structure_id, None),
        };

        // 换了收费项目时金额默认取新项目
        let original = req
            .original_amount
            .or(structure_amount)
            .unwrap_or(existing.original_amount);
        let assigned = req
            .assigned_amount
            .or(structure_amount.map(|_| original))
            .unwrap_or(existing.assigned_amount);
        check_amount(original, "Original amount")?;
        check_amount(assigned, "Assigned amount")?;
        check_structure_links(&self.db, scope, req.academic_year_id, req.class_id).await?;

        let due_date = req.due_date.unwrap_or(existing.due_date);
        let status = derive_status(current, assigned, existing.paid_amount, due_date, today);

        let mut model = fee_assignments::ActiveModel {
            id: Set(id),
            fee_structure_id: Set(structure_id),
            original_amount: Set(original),
            assigned_amount: Set(assigned),
            remaining_amount: Set(remaining_amount(assigned, existing.paid_amount)),
            due_date: Set(due_date),
            status: Set(status.to_string()),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(academic_year_id) = req.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }
        if let Some(class_id) = req.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(notes) = req.notes {
            model.notes = Set(Some(notes));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新应收失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    async fn delete_fee_assignment(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        let payments = scoped::<FeePayments>(scope)
            .filter(fee_payments::Column::FeeAssignmentId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询缴费失败: {e}")))?;
        if payments > 0 {
            return Err(NazimError::conflict(format!(
                "Fee assignment has {payments} payment(s) and cannot be deleted"
            )));
        }

        delete_scoped::<FeeAssignments, _>(&self.db, scope, id).await
    }

    async fn list_fee_payments(
        &self,
        scope: &TenantScope,
        params: &FeePaymentListParams,
    ) -> Result<FeePaymentListResponse> {
        let select = scoped::<FeePayments>(scope)
            .apply_if(params.fee_assignment_id, |q, id| {
                q.filter(fee_payments::Column::FeeAssignmentId.eq(id))
            })
            .apply_if(params.student_id, |q, id| {
                q.filter(fee_payments::Column::StudentId.eq(id))
            })
            .apply_if(params.payment_method, |q, method| {
                q.filter(fee_payments::Column::PaymentMethod.eq(method.as_str()))
            })
            .apply_if(params.date_from, |q, from| {
                q.filter(fee_payments::Column::PaymentDate.gte(from))
            })
            .apply_if(params.date_to, |q, to| {
                q.filter(fee_payments::Column::PaymentDate.lte(to))
            })
            .order_by_desc(fee_payments::Column::PaymentDate)
            .order_by_desc(fee_payments::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_payment()).await
    }

    async fn list_fee_payments_between(
        &self,
        scope: &TenantScope,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<FeePayment>> {
        let counted: HashSet<i64> = scoped::<FeeAssignments>(scope)
            .filter(fee_assignments::Column::Status.ne(AssignmentStatus::Cancelled.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询应收失败: {e}")))?
            .into_iter()
            .map(|a| a.id)
            .collect();

        let payments = scoped::<FeePayments>(scope)
            .apply_if(date_from, |q, from| {
                q.filter(fee_payments::Column::PaymentDate.gte(from))
            })
            .apply_if(date_to, |q, to| {
                q.filter(fee_payments::Column::PaymentDate.lte(to))
            })
            .order_by_desc(fee_payments::Column::PaymentDate)
            .order_by_desc(fee_payments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询缴费失败: {e}")))?;
        Ok(payments
            .into_iter()
            .filter(|p| counted.contains(&p.fee_assignment_id))
            .map(|m| m.into_payment())
            .collect())
    }

    async fn record_fee_payment(
        &self,
        scope: &TenantScope,
        received_by: i64,
        req: CreateFeePaymentRequest,
        today: NaiveDate,
    ) -> Result<(FeePayment, FeeAssignment)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = load_assignment(&txn, scope, req.fee_assignment_id).await?;
        let status = assignment.status();
        if status.is_sticky() {
            return Err(NazimError::conflict(format!(
                "Cannot record a payment on a {status} assignment"
            )));
        }
        validate_payment(req.amount, assignment.remaining_amount)
            .map_err(NazimError::validation)?;

        let payment = fee_payments::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            fee_assignment_id: Set(assignment.id),
            student_id: Set(assignment.student_id),
            amount: Set(req.amount),
            payment_date: Set(req.payment_date.unwrap_or(today)),
            payment_method: Set(req.payment_method.to_string()),
            reference_no: Set(req.reference_no),
            received_by: Set(Some(received_by)),
            notes: Set(req.notes),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| NazimError::database_operation(format!("创建缴费记录失败: {e}")))?;

        let paid = assignment.paid_amount + req.amount;
        let updated = save_amounts(
            &txn,
            &assignment,
            assignment.assigned_amount,
            paid,
            status,
            today,
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((payment.into_payment(), updated.into_assignment()))
    }

    async fn delete_fee_payment(
        &self,
        scope: &TenantScope,
        id: i64,
        today: NaiveDate,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(payment) = find_scoped::<FeePayments, _>(&txn, scope, id).await? else {
            return Ok(false);
        };

        if let Some(assignment) =
            find_scoped::<FeeAssignments, _>(&txn, scope, payment.fee_assignment_id).await?
        {
            let paid = (assignment.paid_amount - payment.amount).max(0.0);
            save_amounts(
                &txn,
                &assignment,
                assignment.assigned_amount,
                paid,
                assignment.status(),
                today,
            )
            .await?;
        }
        let deleted = delete_scoped::<FeePayments, _>(&txn, scope, id).await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(deleted)
    }

    async fn list_fee_exceptions(
        &self,
        scope: &TenantScope,
        params: &FeeExceptionListParams,
    ) -> Result<FeeExceptionListResponse> {
        let select = scoped::<FeeExceptions>(scope)
            .apply_if(params.student_id, |q, id| {
                q.filter(fee_exceptions::Column::StudentId.eq(id))
            })
            .apply_if(params.fee_assignment_id, |q, id| {
                q.filter(fee_exceptions::Column::FeeAssignmentId.eq(id))
            })
            .apply_if(params.exception_type, |q, kind| {
                q.filter(fee_exceptions::Column::ExceptionType.eq(kind.as_str()))
            })
            .apply_if(params.is_active, |q, active| {
                q.filter(fee_exceptions::Column::IsActive.eq(active))
            })
            .order_by_desc(fee_exceptions::Column::CreatedAt)
            .order_by_desc(fee_exceptions::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_exception()).await
    }

    async fn list_active_fee_exceptions(&self, scope: &TenantScope) -> Result<Vec<FeeException>> {
        let live: HashSet<i64> = scoped::<FeeAssignments>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询应收失败: {e}")))?
            .into_iter()
            .map(|a| a.id)
            .collect();

        let exceptions = scoped::<FeeExceptions>(scope)
            .filter(fee_exceptions::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询减免失败: {e}")))?;

        Ok(exceptions
            .into_iter()
            .filter(|e| live.contains(&e.fee_assignment_id))
            .map(|m| m.into_exception())
            .collect())
    }

    async fn get_fee_exception(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeException>> {
        let result = find_scoped::<FeeExceptions, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_exception()))
    }

    async fn create_fee_exception(
        &self,
        scope: &TenantScope,
        approved_by: i64,
        req: CreateFeeExceptionRequest,
        today: NaiveDate,
    ) -> Result<(FeeException, FeeAssignment)> {
        if req.exception_type != ExceptionType::Waiver {
            check_amount(req.value, "Exception value")?;
        }
        if req.reason.trim().is_empty() {
            return Err(NazimError::validation("Exception reason is required"));
        }
        let valid_from = req.valid_from.unwrap_or(today);
        check_validity(valid_from, req.valid_to)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = find_scoped::<FeeAssignments, _>(&txn, scope, req.fee_assignment_id)
            .await?
            .ok_or_else(|| {
                NazimError::validation(format!(
                    "Fee assignment {} does not exist in this school",
                    req.fee_assignment_id
                ))
            })?;
        if assignment.student_id != req.student_id {
            return Err(NazimError::validation("Exception student mismatch"));
        }
        if assignment.status() == AssignmentStatus::Cancelled {
            return Err(NazimError::conflict(
                "Cannot apply an exception to a cancelled assignment",
            ));
        }

        let (updated, exception_amount) =
            apply_on_assignment(&txn, &assignment, req.exception_type, req.value, today).await?;

        let now = now();
        let exception = fee_exceptions::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            fee_assignment_id: Set(assignment.id),
            student_id: Set(assignment.student_id),
            exception_type: Set(req.exception_type.to_string()),
            value: Set(req.value),
            exception_amount: Set(exception_amount),
            reason: Set(req.reason),
            approved_by: Set(Some(approved_by)),
            approved_at: Set(req.approved_at.map_or(now, |at| at.timestamp())),
            valid_from: Set(valid_from),
            valid_to: Set(req.valid_to),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| NazimError::database_operation(format!("创建减免记录失败: {e}")))?;

        let name = student_name(&txn, scope, exception.student_id).await?;
        insert_activity(
            &txn,
            scope,
            NewActivityLog {
                user_id: Some(approved_by),
                event: ActivityEvent::Created,
                subject_type: EXCEPTION_SUBJECT,
                subject_id: exception.id,
                description: format!(
                    "Created fee exception: {} ({:.2}) for {name}",
                    exception.exception_type, exception.exception_amount
                ),
                properties: Some(serde_json::json!({
                    "exception_id": exception.id,
                    "fee_assignment_id": exception.fee_assignment_id,
                    "student_id": exception.student_id,
                    "exception_type": exception.exception_type,
                    "exception_amount": exception.exception_amount,
                })),
            },
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((exception.into_exception(), updated.into_assignment()))
    }

    async fn update_fee_exception(
        &self,
        scope: &TenantScope,
        actor: i64,
        id: i64,
        req: UpdateFeeExceptionRequest,
        today: NaiveDate,
    ) -> Result<Option<(FeeException, Vec<FeeAssignment>)>> {
        if let Some(reason) = &req.reason
            && reason.trim().is_empty()
        {
            return Err(NazimError::validation("Exception reason is required"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = find_scoped::<FeeExceptions, _>(&txn, scope, id).await? else {
            return Ok(None);
        };

        let assignment_id = req.fee_assignment_id.unwrap_or(existing.fee_assignment_id);
        let student_id = req.student_id.unwrap_or(existing.student_id);
        if req.fee_assignment_id.is_some() || req.student_id.is_some() {
            let target = find_scoped::<FeeAssignments, _>(&txn, scope, assignment_id)
                .await?
                .ok_or_else(|| {
                    NazimError::validation(format!(
                        "Fee assignment {assignment_id} does not exist in this school"
                    ))
                })?;
            if target.student_id != student_id {
                return Err(NazimError::validation("Exception student mismatch"));
            }
        }
        let valid_from = req.valid_from.unwrap_or(existing.valid_from);
        let valid_to = req.valid_to.or(existing.valid_to);
        check_validity(valid_from, valid_to)?;

        let kind = existing.kind();
        let was_active = existing.is_active;
        let active = req.is_active.unwrap_or(was_active);
        let moved = assignment_id != existing.fee_assignment_id;

        // 换了应收或启停状态变化时：先从旧应收撤销，再在新应收上重新应用
        let mut touched = Vec::new();
        let mut exception_amount = existing.exception_amount;
        if moved || active != was_active {
            if was_active
                && let Some(old) =
                    find_scoped::<FeeAssignments, _>(&txn, scope, existing.fee_assignment_id)
                        .await?
            {
                touched.push(
                    revert_on_assignment(&txn, &old, kind, existing.exception_amount, today)
                        .await?,
                );
            }
            if active {
                let target = load_assignment(&txn, scope, assignment_id).await?;
                if target.status() == AssignmentStatus::Cancelled {
                    return Err(NazimError::conflict(
                        "Cannot apply an exception to a cancelled assignment",
                    ));
                }
                let (updated, amount) =
                    apply_on_assignment(&txn, &target, kind, existing.value, today).await?;
                exception_amount = amount;
                touched.push(updated);
            }
        }

        let mut model = fee_exceptions::ActiveModel {
            id: Set(id),
            fee_assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            exception_amount: Set(exception_amount),
            valid_from: Set(valid_from),
            valid_to: Set(valid_to),
            is_active: Set(active),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(reason) = req.reason {
            model.reason = Set(reason);
        }

        let result = model
            .update(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新减免记录失败: {e}")))?;

        let name = student_name(&txn, scope, result.student_id).await?;
        insert_activity(
            &txn,
            scope,
            NewActivityLog {
                user_id: Some(actor),
                event: ActivityEvent::Updated,
                subject_type: EXCEPTION_SUBJECT,
                subject_id: id,
                description: format!(
                    "Updated fee exception: {} for {name}",
                    result.exception_type
                ),
                properties: Some(serde_json::json!({
                    "old_values": existing.audit_values(),
                    "new_values": result.audit_values(),
                })),
            },
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((
            result.into_exception(),
            touched.into_iter().map(|m| m.into_assignment()).collect(),
        )))
    }

    async fn delete_fee_exception(
        &self,
        scope: &TenantScope,
        actor: i64,
        id: i64,
        today: NaiveDate,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(exception) = find_scoped::<FeeExceptions, _>(&txn, scope, id).await? else {
            return Ok(false);
        };

        // 停用的减免在停用时已经撤销过
        if exception.is_active
            && let Some(assignment) =
                find_scoped::<FeeAssignments, _>(&txn, scope, exception.fee_assignment_id).await?
        {
            revert_on_assignment(
                &txn,
                &assignment,
                exception.kind(),
                exception.exception_amount,
                today,
            )
            .await?;
        }
        let deleted = delete_scoped::<FeeExceptions, _>(&txn, scope, id).await?;

        let name = student_name(&txn, scope, exception.student_id).await?;
        insert_activity(
            &txn,
            scope,
            NewActivityLog {
                user_id: Some(actor),
                event: ActivityEvent::Deleted,
                subject_type: EXCEPTION_SUBJECT,
                subject_id: id,
                description: format!(
                    "Deleted fee exception: {} for {name}",
                    exception.exception_type
                ),
                properties: Some(serde_json::json!({
                    "deleted_exception": exception.audit_values(),
                })),
            },
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity_logs::ActivityLogListParams;
    use crate::models::fees::{FeeType, PaymentMethod};
    use crate::storage::ActivityLogStorage;
    use crate::storage::sea_orm_storage::test_support::{seed_class, seed_school, seed_student};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn seed_structure(storage: &SeaOrmStorage, scope: &TenantScope, amount: f64) -> i64 {
        storage
            .create_fee_structure(
                scope,
                CreateFeeStructureRequest {
                    academic_year_id: None,
                    class_id: None,
                    name: "Tuition".to_string(),
                    fee_type: FeeType::Monthly,
                    amount,
                    description: None,
                    is_active: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn assign(student_id: i64, structure_id: i64, due: &str) -> CreateFeeAssignmentRequest {
        CreateFeeAssignmentRequest {
            student_id,
            fee_structure_id: structure_id,
            academic_year_id: None,
            class_id: None,
            original_amount: None,
            assigned_amount: None,
            due_date: date(due),
            notes: None,
        }
    }

    fn pay(assignment_id: i64, amount: f64) -> CreateFeePaymentRequest {
        CreateFeePaymentRequest {
            fee_assignment_id: assignment_id,
            amount,
            payment_date: Some(date("2026-03-05")),
            payment_method: PaymentMethod::Cash,
            reference_no: None,
            notes: None,
        }
    }

    fn exception(
        assignment_id: i64,
        student_id: i64,
        kind: ExceptionType,
        value: f64,
    ) -> CreateFeeExceptionRequest {
        CreateFeeExceptionRequest {
            fee_assignment_id: assignment_id,
            student_id,
            exception_type: kind,
            value,
            reason: "Sibling discount".to_string(),
            approved_at: None,
            valid_from: None,
            valid_to: None,
        }
    }

    async fn amounts(storage: &SeaOrmStorage, scope: &TenantScope, id: i64) -> (f64, f64) {
        let assignment = storage
            .get_fee_assignment(scope, id)
            .await
            .unwrap()
            .unwrap();
        (assignment.assigned_amount, assignment.remaining_amount)
    }

    #[tokio::test]
    async fn test_structure_validation_and_delete_guard() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-structures").await;

        let err = storage
            .create_fee_structure(
                &scope,
                CreateFeeStructureRequest {
                    academic_year_id: None,
                    class_id: None,
                    name: "Bad".to_string(),
                    fee_type: FeeType::OneTime,
                    amount: -1.0,
                    description: None,
                    is_active: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "F-1", None).await;
        let assignment = storage
            .create_fee_assignment(
                &scope,
                assign(student.id, structure_id, "2026-04-01"),
                date("2026-03-01"),
            )
            .await
            .unwrap();
        assert_eq!(assignment.original_amount, 1000.0);
        assert_eq!(assignment.remaining_amount, 1000.0);
        assert_eq!(assignment.status, AssignmentStatus::Pending);

        let err = storage
            .delete_fee_structure(&scope, structure_id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_payments_update_assignment() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-payments").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "F-2", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-03-01"), today)
            .await
            .unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Overdue);

        let (payment, updated) = storage
            .record_fee_payment(&scope, 1, pay(assignment.id, 400.0), today)
            .await
            .unwrap();
        assert_eq!(payment.student_id, student.id);
        assert_eq!(updated.paid_amount, 400.0);
        assert_eq!(updated.remaining_amount, 600.0);
        assert_eq!(updated.status, AssignmentStatus::Partial);

        // 超过剩余金额
        let err = storage
            .record_fee_payment(&scope, 1, pay(assignment.id, 700.0), today)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let (_, paid) = storage
            .record_fee_payment(&scope, 1, pay(assignment.id, 600.0), today)
            .await
            .unwrap();
        assert_eq!(paid.status, AssignmentStatus::Paid);

        // 有缴费时不能删除应收
        let err = storage
            .delete_fee_assignment(&scope, assignment.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        assert!(storage.delete_fee_payment(&scope, payment.id, today).await.unwrap());
        let reverted = storage
            .get_fee_assignment(&scope, assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reverted.paid_amount, 600.0);
        assert_eq!(reverted.remaining_amount, 400.0);
        assert_eq!(reverted.status, AssignmentStatus::Partial);
    }

    #[tokio::test]
    async fn test_exceptions_apply_and_revert() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-exceptions").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "F-3", None).await;
        let other = seed_student(&storage, &scope, "F-4", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();

        let err = storage
            .create_fee_exception(
                &scope,
                1,
                exception(assignment.id, other.id, ExceptionType::DiscountFixed, 100.0),
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Exception student mismatch");

        let (discount, updated) = storage
            .create_fee_exception(
                &scope,
                1,
                exception(assignment.id, student.id, ExceptionType::DiscountPercentage, 25.0),
                today,
            )
            .await
            .unwrap();
        assert_eq!(discount.exception_amount, 250.0);
        assert_eq!(updated.assigned_amount, 750.0);
        assert_eq!(updated.remaining_amount, 750.0);

        let (waiver, waived) = storage
            .create_fee_exception(
                &scope,
                1,
                exception(assignment.id, student.id, ExceptionType::Waiver, 0.0),
                today,
            )
            .await
            .unwrap();
        assert_eq!(waived.status, AssignmentStatus::Waived);
        assert_eq!(waived.remaining_amount, 0.0);

        let active = storage.list_active_fee_exceptions(&scope).await.unwrap();
        assert_eq!(active.len(), 2);

        assert!(storage.delete_fee_exception(&scope, 1, waiver.id, today).await.unwrap());
        let restored = storage
            .get_fee_assignment(&scope, assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.assigned_amount, 750.0);
        assert_eq!(restored.status, AssignmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_moving_exception_restores_source_assignment() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-exception-move").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "M-1", None).await;
        let today = date("2026-03-10");
        let first = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        let second = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-05-01"), today)
            .await
            .unwrap();

        let (moved, _) = storage
            .create_fee_exception(
                &scope,
                1,
                exception(first.id, student.id, ExceptionType::DiscountPercentage, 25.0),
                today,
            )
            .await
            .unwrap();
        storage
            .create_fee_exception(
                &scope,
                1,
                exception(second.id, student.id, ExceptionType::DiscountPercentage, 50.0),
                today,
            )
            .await
            .unwrap();
        assert_eq!(amounts(&storage, &scope, first.id).await, (750.0, 750.0));
        assert_eq!(amounts(&storage, &scope, second.id).await, (500.0, 500.0));

        let (updated, touched) = storage
            .update_fee_exception(
                &scope,
                1,
                moved.id,
                UpdateFeeExceptionRequest {
                    fee_assignment_id: Some(second.id),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.fee_assignment_id, second.id);
        // 25% 作用在第二笔应收当前的 500 上
        assert_eq!(updated.exception_amount, 125.0);
        assert_eq!(touched.len(), 2);
        assert_eq!(amounts(&storage, &scope, first.id).await, (1000.0, 1000.0));
        assert_eq!(amounts(&storage, &scope, second.id).await, (375.0, 375.0));

        assert!(
            storage
                .delete_fee_exception(&scope, 1, moved.id, today)
                .await
                .unwrap()
        );
        assert_eq!(amounts(&storage, &scope, first.id).await, (1000.0, 1000.0));
        assert_eq!(amounts(&storage, &scope, second.id).await, (500.0, 500.0));
    }

    #[tokio::test]
    async fn test_toggling_exception_reverts_and_reapplies() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-exception-toggle").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "T-1", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();

        let (waiver, waived) = storage
            .create_fee_exception(
                &scope,
                1,
                exception(assignment.id, student.id, ExceptionType::Waiver, 0.0),
                today,
            )
            .await
            .unwrap();
        assert_eq!(waived.status, AssignmentStatus::Waived);

        let deactivate = || UpdateFeeExceptionRequest {
            is_active: Some(false),
            ..Default::default()
        };
        let (inactive, _) = storage
            .update_fee_exception(&scope, 1, waiver.id, deactivate(), today)
            .await
            .unwrap()
            .unwrap();
        assert!(!inactive.is_active);
        let restored = storage
            .get_fee_assignment(&scope, assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.assigned_amount, 1000.0);
        assert_eq!(restored.status, AssignmentStatus::Pending);

        // 再次停用不会重复加回
        storage
            .update_fee_exception(&scope, 1, waiver.id, deactivate(), today)
            .await
            .unwrap();
        assert_eq!(amounts(&storage, &scope, assignment.id).await, (1000.0, 1000.0));

        let (active, _) = storage
            .update_fee_exception(
                &scope,
                1,
                waiver.id,
                UpdateFeeExceptionRequest {
                    is_active: Some(true),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.exception_amount, 1000.0);
        assert_eq!(amounts(&storage, &scope, assignment.id).await, (0.0, 0.0));

        storage
            .update_fee_exception(&scope, 1, waiver.id, deactivate(), today)
            .await
            .unwrap();
        assert!(
            storage
                .delete_fee_exception(&scope, 1, waiver.id, today)
                .await
                .unwrap()
        );
        let after_delete = storage
            .get_fee_assignment(&scope, assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after_delete.assigned_amount, 1000.0);
        assert_eq!(after_delete.remaining_amount, 1000.0);
        assert_eq!(after_delete.status, AssignmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_exception_revalidates_target() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-exception-check").await;
        let other_school = seed_school(&storage, "fee-exception-other").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let foreign_structure = seed_structure(&storage, &other_school, 1000.0).await;
        let student = seed_student(&storage, &scope, "V-1", None).await;
        let sibling = seed_student(&storage, &scope, "V-2", None).await;
        let outsider = seed_student(&storage, &other_school, "V-3", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        let sibling_assignment = storage
            .create_fee_assignment(&scope, assign(sibling.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        let foreign = storage
            .create_fee_assignment(
                &other_school,
                assign(outsider.id, foreign_structure, "2026-04-01"),
                today,
            )
            .await
            .unwrap();
        let (discount, _) = storage
            .create_fee_exception(
                &scope,
                1,
                exception(assignment.id, student.id, ExceptionType::DiscountFixed, 100.0),
                today,
            )
            .await
            .unwrap();

        // 应收属于另一名学生
        let err = storage
            .update_fee_exception(
                &scope,
                1,
                discount.id,
                UpdateFeeExceptionRequest {
                    fee_assignment_id: Some(sibling_assignment.id),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Exception student mismatch");

        // 只改学生也要和应收一致
        let err = storage
            .update_fee_exception(
                &scope,
                1,
                discount.id,
                UpdateFeeExceptionRequest {
                    student_id: Some(sibling.id),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Exception student mismatch");

        // 其他学校的应收不可见
        let err = storage
            .update_fee_exception(
                &scope,
                1,
                discount.id,
                UpdateFeeExceptionRequest {
                    fee_assignment_id: Some(foreign.id),
                    student_id: Some(outsider.id),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let err = storage
            .update_fee_exception(
                &scope,
                1,
                discount.id,
                UpdateFeeExceptionRequest {
                    valid_from: Some(date("2026-06-01")),
                    valid_to: Some(date("2026-05-01")),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        // 失败的更新不改动金额
        assert_eq!(amounts(&storage, &scope, assignment.id).await, (900.0, 900.0));
        assert_eq!(
            amounts(&storage, &scope, sibling_assignment.id).await,
            (1000.0, 1000.0)
        );
        assert_eq!(amounts(&storage, &other_school, foreign.id).await, (1000.0, 1000.0));

        // 其他学校看不到这条减免
        assert!(
            storage
                .update_fee_exception(
                    &other_school,
                    1,
                    discount.id,
                    UpdateFeeExceptionRequest::default(),
                    today,
                )
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_exception_changes_are_logged() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-exception-log").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "L-1", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();

        let mut req = exception(assignment.id, student.id, ExceptionType::DiscountFixed, 200.0);
        req.valid_to = Some(date("2026-12-31"));
        let (created, _) = storage
            .create_fee_exception(&scope, 3, req, today)
            .await
            .unwrap();
        assert_eq!(created.valid_from, today);
        assert_eq!(created.valid_to, Some(date("2026-12-31")));
        assert_eq!(created.approved_by, Some(3));

        storage
            .update_fee_exception(
                &scope,
                4,
                created.id,
                UpdateFeeExceptionRequest {
                    reason: Some("Scholarship".to_string()),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap();
        // 只改说明不动金额
        assert_eq!(amounts(&storage, &scope, assignment.id).await, (800.0, 800.0));
        storage
            .delete_fee_exception(&scope, 5, created.id, today)
            .await
            .unwrap();

        let params = ActivityLogListParams {
            subject_type: Some(EXCEPTION_SUBJECT.to_string()),
            subject_id: Some(created.id),
            ..Default::default()
        };
        let logs = storage.list_activity_logs(&scope, &params).await.unwrap();
        assert_eq!(logs.pagination.total, 3);
        let mut events: Vec<_> = logs
            .items
            .iter()
            .map(|log| (log.event, log.user_id))
            .collect();
        events.sort_by_key(|(_, user)| *user);
        assert_eq!(
            events,
            vec![
                (ActivityEvent::Created, Some(3)),
                (ActivityEvent::Updated, Some(4)),
                (ActivityEvent::Deleted, Some(5)),
            ]
        );
        let created_log = logs
            .items
            .iter()
            .find(|log| log.event == ActivityEvent::Created)
            .unwrap();
        assert_eq!(
            created_log.description,
            format!("Created fee exception: discount_fixed (200.00) for {}", student.full_name)
        );
        let updated_log = logs
            .items
            .iter()
            .find(|log| log.event == ActivityEvent::Updated)
            .unwrap();
        let properties = updated_log.properties.as_ref().unwrap();
        assert_eq!(properties["old_values"]["reason"], "Sibling discount");
        assert_eq!(properties["new_values"]["reason"], "Scholarship");
    }

    #[tokio::test]
    async fn test_update_assignment_recomputes_amounts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-assignment-update").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let bigger = seed_structure(&storage, &scope, 1200.0).await;
        let student = seed_student(&storage, &scope, "U-1", None).await;
        let today = date("2026-03-10");
        let assignment = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        storage
            .record_fee_payment(&scope, 1, pay(assignment.id, 300.0), today)
            .await
            .unwrap();

        let updated = storage
            .update_fee_assignment(
                &scope,
                assignment.id,
                UpdateFeeAssignmentRequest {
                    assigned_amount: Some(800.0),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.original_amount, 1000.0);
        assert_eq!(updated.assigned_amount, 800.0);
        assert_eq!(updated.paid_amount, 300.0);
        assert_eq!(updated.remaining_amount, 500.0);
        assert_eq!(updated.status, AssignmentStatus::Partial);

        // 换收费项目时金额取新项目
        let switched = storage
            .update_fee_assignment(
                &scope,
                assignment.id,
                UpdateFeeAssignmentRequest {
                    fee_structure_id: Some(bigger),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(switched.fee_structure_id, bigger);
        assert_eq!(switched.original_amount, 1200.0);
        assert_eq!(switched.assigned_amount, 1200.0);
        assert_eq!(switched.remaining_amount, 900.0);

        // 应收调到已缴金额以下即结清
        let settled = storage
            .update_fee_assignment(
                &scope,
                assignment.id,
                UpdateFeeAssignmentRequest {
                    assigned_amount: Some(300.0),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settled.remaining_amount, 0.0);
        assert_eq!(settled.status, AssignmentStatus::Paid);

        let err = storage
            .update_fee_assignment(
                &scope,
                assignment.id,
                UpdateFeeAssignmentRequest {
                    status: Some(AssignmentStatus::Paid),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_cancelled_assignment_payments_not_counted() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-collection").await;
        let structure_id = seed_structure(&storage, &scope, 1000.0).await;
        let student = seed_student(&storage, &scope, "C-1", None).await;
        let today = date("2026-03-10");
        let kept = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        let cancelled = storage
            .create_fee_assignment(&scope, assign(student.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();
        storage
            .record_fee_payment(&scope, 1, pay(kept.id, 400.0), today)
            .await
            .unwrap();
        storage
            .record_fee_payment(&scope, 1, pay(cancelled.id, 250.0), today)
            .await
            .unwrap();

        let before = storage
            .list_fee_payments_between(&scope, None, None)
            .await
            .unwrap();
        assert_eq!(before.len(), 2);

        let updated = storage
            .update_fee_assignment(
                &scope,
                cancelled.id,
                UpdateFeeAssignmentRequest {
                    status: Some(AssignmentStatus::Cancelled),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AssignmentStatus::Cancelled);

        let after = storage
            .list_fee_payments_between(&scope, Some(date("2026-03-01")), Some(date("2026-03-31")))
            .await
            .unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].fee_assignment_id, kept.id);
        assert_eq!(after[0].amount, 400.0);
    }

    #[tokio::test]
    async fn test_bulk_assign_skips_existing() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "fee-bulk").await;
        let class_id = seed_class(&storage, &scope, "Grade 5").await;
        let structure_id = seed_structure(&storage, &scope, 500.0).await;
        let first = seed_student(&storage, &scope, "B-1", Some(class_id)).await;
        seed_student(&storage, &scope, "B-2", Some(class_id)).await;
        seed_student(&storage, &scope, "B-3", None).await;
        let today = date("2026-03-10");

        storage
            .create_fee_assignment(&scope, assign(first.id, structure_id, "2026-04-01"), today)
            .await
            .unwrap();

        let result = storage
            .bulk_assign_fees(
                &scope,
                BulkAssignRequest {
                    fee_structure_id: structure_id,
                    class_id,
                    academic_year_id: None,
                    assigned_amount: None,
                    due_date: date("2026-04-01"),
                },
                today,
            )
            .await
            .unwrap();
        assert_eq!(result.created, 1);
        assert_eq!(result.skipped, 1);

        let params = FeeAssignmentListParams {
            class_id: Some(class_id),
            ..Default::default()
        };
        let listed = storage.list_fee_assignments(&scope, &params).await.unwrap();
        assert_eq!(listed.pagination.total, 2);
    }
}
