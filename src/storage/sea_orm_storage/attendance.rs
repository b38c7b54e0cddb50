use super::SeaOrmStorage;
use super::scoped::{delete_scoped, ensure_scoped, fetch_page, now, scoped};
use crate::entity::attendance_records::{ActiveModel, Column, Entity as AttendanceRecords};
use crate::entity::classes::Entity as Classes;
use crate::entity::students::{self, Entity as Students};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::attendance::{
    AttendanceListParams, AttendanceListResponse, AttendanceRecord, MarkAttendanceRequest,
    MarkAttendanceResponse,
};
use crate::storage::AttendanceStorage;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

#[async_trait::async_trait]
impl AttendanceStorage for SeaOrmStorage {
    async fn mark_attendance(
        &self,
        scope: &TenantScope,
        marked_by: i64,
        req: MarkAttendanceRequest,
    ) -> Result<MarkAttendanceResponse> {
        ensure_scoped::<Classes, _>(&self.db, scope, req.class_id, "Class").await?;

        let mut seen = HashSet::new();
        if let Some(dup) = req.records.iter().find(|r| !seen.insert(r.student_id)) {
            return Err(NazimError::validation(format!(
                "Student {} appears more than once",
                dup.student_id
            )));
        }

        // 学生必须属于该班级
        let enrolled: HashSet<i64> = scoped::<Students>(scope)
            .filter(students::Column::ClassId.eq(req.class_id))
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if let Some(outsider) = req.records.iter().find(|r| !enrolled.contains(&r.student_id)) {
            return Err(NazimError::validation(format!(
                "Student {} is not enrolled in class {}",
                outsider.student_id, req.class_id
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids: Vec<i64> = req.records.iter().map(|r| r.student_id).collect();
        let existing: HashMap<i64, i64> = scoped::<AttendanceRecords>(scope)
            .filter(Column::Date.eq(req.date))
            .filter(Column::StudentId.is_in(student_ids))
            .all(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询考勤失败: {e}")))?
            .into_iter()
            .map(|r| (r.student_id, r.id))
            .collect();

        let now = now();
        let mut created = 0;
        let mut updated = 0;
        let mut records = Vec::with_capacity(req.records.len());

        for mark in req.records {
            let model = match existing.get(&mark.student_id) {
                Some(&id) => {
                    updated += 1;
                    ActiveModel {
                        id: Set(id),
                        class_id: Set(req.class_id),
                        status: Set(mark.status.to_string()),
                        remarks: Set(mark.remarks),
                        marked_by: Set(Some(marked_by)),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                }
                None => {
                    created += 1;
                    ActiveModel {
                        organization_id: Set(scope.organization_id),
                        school_id: Set(scope.school_id),
                        class_id: Set(req.class_id),
                        student_id: Set(mark.student_id),
                        date: Set(req.date),
                        status: Set(mark.status.to_string()),
                        remarks: Set(mark.remarks),
                        marked_by: Set(Some(marked_by)),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| NazimError::database_operation(format!("保存考勤失败: {e}")))?;

            records.push(model.into_record());
        }

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(MarkAttendanceResponse {
            created,
            updated,
            records,
        })
    }

    async fn list_attendance(
        &self,
        scope: &TenantScope,
        params: &AttendanceListParams,
    ) -> Result<AttendanceListResponse> {
        let select = scoped::<AttendanceRecords>(scope)
            .apply_if(params.class_id, |q, id| q.filter(Column::ClassId.eq(id)))
            .apply_if(params.student_id, |q, id| q.filter(Column::StudentId.eq(id)))
            .apply_if(params.status, |q, status| {
                q.filter(Column::Status.eq(status.as_str()))
            })
            .apply_if(params.date_from, |q, from| q.filter(Column::Date.gte(from)))
            .apply_if(params.date_to, |q, to| q.filter(Column::Date.lte(to)))
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_record()).await
    }

    async fn list_class_attendance(
        &self,
        scope: &TenantScope,
        class_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = scoped::<AttendanceRecords>(scope)
            .filter(Column::ClassId.eq(class_id))
            .apply_if(date_from, |q, from| q.filter(Column::Date.gte(from)))
            .apply_if(date_to, |q, to| q.filter(Column::Date.lte(to)))
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    async fn delete_attendance(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<AttendanceRecords, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::attendance::{AttendanceMark, AttendanceStatus};
    use crate::storage::sea_orm_storage::test_support::{seed_class, seed_school, seed_student};

    fn mark(student_id: i64, status: AttendanceStatus) -> AttendanceMark {
        AttendanceMark {
            student_id,
            status,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_mark_attendance_upserts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "attend").await;
        let class_id = seed_class(&storage, &scope, "Grade 2").await;
        let a = seed_student(&storage, &scope, "AT-1", Some(class_id)).await;
        let b = seed_student(&storage, &scope, "AT-2", Some(class_id)).await;
        let date: NaiveDate = "2026-03-02".parse().unwrap();

        let first = storage
            .mark_attendance(
                &scope,
                7,
                MarkAttendanceRequest {
                    class_id,
                    date,
                    records: vec![
                        mark(a.id, AttendanceStatus::Present),
                        mark(b.id, AttendanceStatus::Absent),
                    ],
                },
            )
            .await
            .unwrap();
        assert_eq!((first.created, first.updated), (2, 0));

        let second = storage
            .mark_attendance(
                &scope,
                7,
                MarkAttendanceRequest {
                    class_id,
                    date,
                    records: vec![mark(b.id, AttendanceStatus::Late)],
                },
            )
            .await
            .unwrap();
        assert_eq!((second.created, second.updated), (0, 1));
        assert_eq!(second.records[0].status, AttendanceStatus::Late);

        let all = storage
            .list_class_attendance(&scope, class_id, Some(date), Some(date))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let params = AttendanceListParams {
            pagination: PaginationQuery::default(),
            class_id: None,
            student_id: Some(b.id),
            status: None,
            date_from: None,
            date_to: None,
        };
        let listed = storage.list_attendance(&scope, &params).await.unwrap();
        assert_eq!(listed.pagination.total, 1);

        assert!(storage.delete_attendance(&scope, listed.items[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_attendance_rejects_outsiders() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "strict").await;
        let class_id = seed_class(&storage, &scope, "Grade 4").await;
        let other_class = seed_class(&storage, &scope, "Grade 5").await;
        let student = seed_student(&storage, &scope, "S-1", Some(other_class)).await;

        let err = storage
            .mark_attendance(
                &scope,
                1,
                MarkAttendanceRequest {
                    class_id,
                    date: "2026-03-02".parse().unwrap(),
                    records: vec![mark(student.id, AttendanceStatus::Present)],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }
}
