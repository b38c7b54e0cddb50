//! 收费报表
//!
//! 先按租户取出全部相关行，再在内存中聚合。报表读取时按今天重新推导逾期状态，
//! cancelled 的应收不计入任何报表。

pub mod collection;
pub mod dashboard;
pub mod defaulters;
pub mod export;
pub mod student_fees;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use super::FeeService;
use crate::errors::NazimError;
use crate::models::TenantScope;
use crate::models::academic::Class;
use crate::models::common::PaginationInfo;
use crate::models::fees::calc::derive_status;
use crate::models::fees::requests::{
    CollectionParams, DefaultersParams, FeeReportFilter, StudentFeesParams,
};
use crate::models::fees::{AssignmentStatus, FeeAssignment, FeeStructure};
use crate::models::students::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, tenant_scope, today};
use crate::storage::Storage;

/// 报表所需的关联数据
pub(crate) struct ReportData {
    pub assignments: Vec<FeeAssignment>,
    pub structures: HashMap<i64, FeeStructure>,
    pub students: HashMap<i64, Student>,
    pub classes: HashMap<i64, Class>,
}

impl ReportData {
    pub(crate) fn new(
        assignments: Vec<FeeAssignment>,
        structures: Vec<FeeStructure>,
        students: Vec<Student>,
        classes: Vec<Class>,
        today: NaiveDate,
    ) -> Self {
        let assignments = assignments
            .into_iter()
            .filter(|a| a.status != AssignmentStatus::Cancelled)
            .map(|mut a| {
                a.status = derive_status(a.status, a.assigned_amount, a.paid_amount, a.due_date, today);
                a
            })
            .collect();
        Self {
            assignments,
            structures: structures.into_iter().map(|s| (s.id, s)).collect(),
            students: students.into_iter().map(|s| (s.id, s)).collect(),
            classes: classes.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub(crate) fn student_name(&self, student_id: i64) -> String {
        self.students
            .get(&student_id)
            .map(|s| s.full_name.clone())
            .unwrap_or_else(|| format!("Student #{student_id}"))
    }

    pub(crate) fn structure_name(&self, structure_id: i64) -> String {
        self.structures
            .get(&structure_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Fee #{structure_id}"))
    }

    pub(crate) fn class_name(&self, class_id: Option<i64>) -> Option<String> {
        class_id.map(|id| {
            self.classes
                .get(&id)
                .map(crate::services::students::stats::class_label)
                .unwrap_or_else(|| format!("Class #{id}"))
        })
    }
}

async fn load_report_data(
    storage: &Arc<dyn Storage>,
    scope: &TenantScope,
    filter: &FeeReportFilter,
) -> Result<ReportData, NazimError> {
    let assignments = storage.list_fee_assignments_for_report(scope, filter).await?;
    let structures = storage.list_all_fee_structures(scope).await?;
    let students = storage.list_all_students(scope, None).await?;
    let classes = storage.list_all_classes(scope).await?;
    Ok(ReportData::new(
        assignments,
        structures,
        students,
        classes,
        today(),
    ))
}

fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), HttpResponse> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(bad_request(
            ErrorCode::ValidationFailed,
            "date_from must not be after date_to",
        )),
        _ => Ok(()),
    }
}

impl FeeService {
    pub async fn dashboard(
        &self,
        filter: FeeReportFilter,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let data = match load_report_data(&storage, &scope, &filter).await {
            Ok(data) => data,
            Err(e) => return Ok(error_response(&e)),
        };
        let payments = match storage.list_fee_payments_between(&scope, None, None).await {
            Ok(payments) => payments,
            Err(e) => return Ok(error_response(&e)),
        };
        let exceptions = match storage.list_active_fee_exceptions(&scope).await {
            Ok(exceptions) => exceptions,
            Err(e) => return Ok(error_response(&e)),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard::build_dashboard(&data, &payments, &exceptions),
            "Fee dashboard retrieved successfully",
        )))
    }

    pub async fn student_fees(
        &self,
        params: StudentFeesParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;
        let filter = FeeReportFilter {
            academic_year_id: params.academic_year_id,
            class_id: params.class_id,
        };

        let data = match load_report_data(&storage, &scope, &filter).await {
            Ok(data) => data,
            Err(e) => return Ok(error_response(&e)),
        };
        let rows = student_fees::student_fee_rows(&data, params.status, params.search.as_deref());

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            PaginationInfo::slice(rows, &params.pagination),
            "Student fees retrieved successfully",
        )))
    }

    pub async fn collection_report(
        &self,
        params: CollectionParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(resp) = check_range(params.date_from, params.date_to) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage
            .list_fee_payments_between(&scope, params.date_from, params.date_to)
            .await
        {
            Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                collection::collection_report(&payments, today()),
                "Collection report retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn defaulters(
        &self,
        params: DefaultersParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;
        let filter = FeeReportFilter {
            academic_year_id: params.academic_year_id,
            class_id: params.class_id,
        };

        match load_report_data(&storage, &scope, &filter).await {
            Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                defaulters::defaulters_report(&data, params.min_amount),
                "Defaulters retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 欠费名单导出为 xlsx 或 csv 附件
    pub async fn export_defaulters(
        &self,
        params: DefaultersParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let format = match export::ExportFormat::parse(params.format.as_deref()) {
            Ok(format) => format,
            Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
        };

        let storage = self.get_storage(request)?;
        let filter = FeeReportFilter {
            academic_year_id: params.academic_year_id,
            class_id: params.class_id,
        };
        let data = match load_report_data(&storage, &scope, &filter).await {
            Ok(data) => data,
            Err(e) => return Ok(error_response(&e)),
        };
        let report = defaulters::defaulters_report(&data, params.min_amount);

        Ok(export::attachment(format, &report.defaulters))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::fees::FeeType;
    use crate::services::students::stats::tests::{class, student};
    use crate::models::students::Gender;
    use chrono::Utc;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn structure(id: i64, name: &str, amount: f64) -> FeeStructure {
        FeeStructure {
            id,
            organization_id: 1,
            school_id: 1,
            academic_year_id: None,
            class_id: None,
            name: name.to_string(),
            fee_type: FeeType::Monthly,
            amount,
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assignment(
        id: i64,
        student_id: i64,
        structure_id: i64,
        class_id: Option<i64>,
        original: f64,
        assigned: f64,
        paid: f64,
        due: NaiveDate,
    ) -> FeeAssignment {
        FeeAssignment {
            id,
            organization_id: 1,
            school_id: 1,
            student_id,
            fee_structure_id: structure_id,
            academic_year_id: None,
            class_id,
            original_amount: original,
            assigned_amount: assigned,
            paid_amount: paid,
            remaining_amount: (assigned - paid).max(0.0),
            due_date: due,
            status: AssignmentStatus::Pending,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// 两个班、三个学生、两个收费项目；今天为 2026-03-10
    pub(crate) fn sample_data() -> ReportData {
        let due_past = date(2026, 3, 1);
        let due_later = date(2026, 4, 1);
        let mut cancelled = assignment(5, 3, 2, Some(20), 100.0, 100.0, 0.0, due_later);
        cancelled.status = AssignmentStatus::Cancelled;

        ReportData::new(
            vec![
                // 学生 1：已缴清 + 部分缴费
                assignment(1, 1, 1, Some(10), 1000.0, 1000.0, 1000.0, due_past),
                assignment(2, 1, 2, Some(10), 200.0, 200.0, 50.0, due_later),
                // 学生 2：逾期未缴
                assignment(3, 2, 1, Some(10), 1000.0, 800.0, 0.0, due_past),
                // 学生 3：未到期
                assignment(4, 3, 2, Some(20), 200.0, 200.0, 0.0, due_later),
                cancelled,
            ],
            vec![structure(1, "Tuition", 1000.0), structure(2, "Library", 200.0)],
            vec![
                student(1, Some(10), Gender::Male),
                student(2, Some(10), Gender::Female),
                student(3, Some(20), Gender::Male),
            ],
            vec![class(10, "Grade 5", Some("A")), class(20, "Grade 6", None)],
            date(2026, 3, 10),
        )
    }

    #[test]
    fn test_report_data_refreshes_status() {
        let data = sample_data();
        assert_eq!(data.assignments.len(), 4);
        let status: Vec<_> = data.assignments.iter().map(|a| a.status).collect();
        assert_eq!(
            status,
            vec![
                AssignmentStatus::Paid,
                AssignmentStatus::Partial,
                AssignmentStatus::Overdue,
                AssignmentStatus::Pending,
            ]
        );
        assert_eq!(data.class_name(Some(10)).as_deref(), Some("Grade 5 A"));
        assert_eq!(data.class_name(Some(99)).as_deref(), Some("Class #99"));
        assert_eq!(data.structure_name(7), "Fee #7");
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(None, Some(date(2026, 1, 1))).is_ok());
        assert!(check_range(Some(date(2026, 1, 2)), Some(date(2026, 1, 1))).is_err());
    }
}
