//! 课表与教师偏好

use super::SeaOrmStorage;
use super::scoped::{delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped};
use crate::entity::academic_years::Entity as AcademicYears;
use crate::entity::classes::Entity as Classes;
use crate::entity::rooms::Entity as Rooms;
use crate::entity::staff::Entity as Staff;
use crate::entity::subjects::Entity as Subjects;
use crate::entity::teacher_preferences::{self, Entity as TeacherPreferences};
use crate::entity::timetable_entries::{self, Entity as TimetableEntries};
use crate::entity::timetables::{self, Entity as Timetables};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::timetables::{
    CreateTimetableRequest, TeacherPreference, TeacherPreferenceListParams,
    TeacherPreferenceListResponse, Timetable, TimetableDetail, TimetableEntry,
    TimetableEntryInput, TimetableListParams, TimetableListResponse, UpdateTimetableRequest,
    UpsertTeacherPreferenceRequest,
};
use crate::storage::TimetableStorage;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QueryTrait, Set, TransactionTrait,
};
use std::collections::BTreeSet;

const DEFAULT_TIMETABLE_TYPE: &str = "teaching";

/// 条目引用的班级、科目、教师、教室都必须属于当前学校
async fn check_entry_links<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    entries: &[TimetableEntryInput],
) -> Result<()> {
    let classes: BTreeSet<i64> = entries.iter().map(|e| e.class_id).collect();
    let subjects: BTreeSet<i64> = entries.iter().map(|e| e.subject_id).collect();
    let teachers: BTreeSet<i64> = entries.iter().map(|e| e.teacher_id).collect();
    let rooms: BTreeSet<i64> = entries.iter().filter_map(|e| e.room_id).collect();

    for id in classes {
        ensure_scoped::<Classes, _>(db, scope, id, "Class").await?;
    }
    for id in subjects {
        ensure_scoped::<Subjects, _>(db, scope, id, "Subject").await?;
    }
    for id in teachers {
        ensure_scoped::<Staff, _>(db, scope, id, "Teacher").await?;
    }
    for id in rooms {
        ensure_scoped::<Rooms, _>(db, scope, id, "Room").await?;
    }
    Ok(())
}

async fn insert_entries<C: ConnectionTrait>(
    db: &C,
    timetable_id: i64,
    entries: Vec<TimetableEntryInput>,
) -> Result<()> {
    for entry in entries {
        let model = timetable_entries::ActiveModel {
            timetable_id: Set(timetable_id),
            class_id: Set(entry.class_id),
            subject_id: Set(entry.subject_id),
            teacher_id: Set(entry.teacher_id),
            room_id: Set(entry.room_id),
            day_of_week: Set(entry.day_of_week.to_string()),
            period_order: Set(entry.period_order),
            start_time: Set(entry.start_time),
            end_time: Set(entry.end_time),
            ..Default::default()
        };
        model
            .insert(db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建课表条目失败: {e}")))?;
    }
    Ok(())
}

/// 按星期、节次排序的条目
async fn load_entries<C: ConnectionTrait>(db: &C, timetable_id: i64) -> Result<Vec<TimetableEntry>> {
    let models = TimetableEntries::find()
        .filter(timetable_entries::Column::TimetableId.eq(timetable_id))
        .order_by_asc(timetable_entries::Column::PeriodOrder)
        .all(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("查询课表条目失败: {e}")))?;

    let mut entries: Vec<TimetableEntry> = models.into_iter().map(|m| m.into_entry()).collect();
    entries.sort_by_key(|e| (e.day_of_week.order(), e.period_order));
    Ok(entries)
}

#[async_trait::async_trait]
impl TimetableStorage for SeaOrmStorage {
    async fn list_timetables(
        &self,
        scope: &TenantScope,
        params: &TimetableListParams,
    ) -> Result<TimetableListResponse> {
        let select = scoped::<Timetables>(scope)
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(timetables::Column::AcademicYearId.eq(id))
            })
            .apply_if(params.is_active, |q, active| {
                q.filter(timetables::Column::IsActive.eq(active))
            })
            .order_by_desc(timetables::Column::CreatedAt)
            .order_by_desc(timetables::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_timetable()).await
    }

    async fn get_timetable(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<TimetableDetail>> {
        let Some(model) = find_scoped::<Timetables, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        let entries = load_entries(&self.db, id).await?;

        Ok(Some(TimetableDetail {
            timetable: model.into_timetable(),
            entries,
        }))
    }

    async fn create_timetable(
        &self,
        scope: &TenantScope,
        created_by: i64,
        req: CreateTimetableRequest,
    ) -> Result<TimetableDetail> {
        if let Some(year_id) = req.academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, year_id, "Academic year").await?;
        }
        check_entry_links(&self.db, scope, &req.entries).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let now = now();
        let model = timetables::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name),
            timetable_type: Set(req
                .timetable_type
                .unwrap_or_else(|| DEFAULT_TIMETABLE_TYPE.to_string())),
            description: Set(req.description),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let timetable = model
            .insert(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建课表失败: {e}")))?;

        insert_entries(&txn, timetable.id, req.entries).await?;
        let entries = load_entries(&txn, timetable.id).await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(TimetableDetail {
            timetable: timetable.into_timetable(),
            entries,
        })
    }

    async fn update_timetable(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateTimetableRequest,
    ) -> Result<Option<Timetable>> {
        if find_scoped::<Timetables, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = timetables::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(year_id) = req.academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, year_id, "Academic year").await?;
            model.academic_year_id = Set(Some(year_id));
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(timetable_type) = req.timetable_type {
            model.timetable_type = Set(timetable_type);
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
            .map_err(|e| NazimError::database_operation(format!("更新课表失败: {e}")))?;

        Ok(Some(result.into_timetable()))
    }

    async fn replace_timetable_entries(
        &self,
        scope: &TenantScope,
        id: i64,
        entries: Vec<TimetableEntryInput>,
    ) -> Result<Option<TimetableDetail>> {
        let Some(timetable) = find_scoped::<Timetables, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        check_entry_links(&self.db, scope, &entries).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        TimetableEntries::delete_many()
            .filter(timetable_entries::Column::TimetableId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除课表条目失败: {e}")))?;
        insert_entries(&txn, id, entries).await?;

        Timetables::update_many()
            .col_expr(timetables::Column::UpdatedAt, Expr::value(now()))
            .filter(timetables::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新课表失败: {e}")))?;

        let entries = load_entries(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(TimetableDetail {
            timetable: timetable.into_timetable(),
            entries,
        }))
    }

    async fn delete_timetable(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        // 软删除同时停用
        let result = Timetables::update_many()
            .col_expr(timetables::Column::DeletedAt, Expr::value(now()))
            .col_expr(timetables::Column::IsActive, Expr::value(false))
            .filter(timetables::Column::Id.eq(id))
            .filter(timetables::Column::OrganizationId.eq(scope.organization_id))
            .filter(timetables::Column::SchoolId.eq(scope.school_id))
            .filter(timetables::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn list_teacher_preferences(
        &self,
        scope: &TenantScope,
        params: &TeacherPreferenceListParams,
    ) -> Result<TeacherPreferenceListResponse> {
        let select = scoped::<TeacherPreferences>(scope)
            .apply_if(params.teacher_id, |q, id| {
                q.filter(teacher_preferences::Column::TeacherId.eq(id))
            })
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(teacher_preferences::Column::AcademicYearId.eq(id))
            })
            .order_by_asc(teacher_preferences::Column::TeacherId);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_preference()).await
    }

    async fn upsert_teacher_preference(
        &self,
        scope: &TenantScope,
        req: UpsertTeacherPreferenceRequest,
    ) -> Result<TeacherPreference> {
        ensure_scoped::<Staff, _>(&self.db, scope, req.teacher_id, "Teacher").await?;
        if let Some(year_id) = req.academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, year_id, "Academic year").await?;
        }

        let year_filter = match req.academic_year_id {
            Some(id) => teacher_preferences::Column::AcademicYearId.eq(id),
            None => teacher_preferences::Column::AcademicYearId.is_null(),
        };
        let existing = scoped::<TeacherPreferences>(scope)
            .filter(teacher_preferences::Column::TeacherId.eq(req.teacher_id))
            .filter(year_filter)
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询教师偏好失败: {e}")))?;

        let preferred_days = serde_json::to_string(&req.preferred_days)?;
        let unavailable_periods = serde_json::to_string(&req.unavailable_periods)?;
        let now = now();

        let result = match existing {
            Some(existing) => {
                let model = teacher_preferences::ActiveModel {
                    id: Set(existing.id),
                    preferred_days: Set(preferred_days),
                    unavailable_periods: Set(unavailable_periods),
                    max_periods_per_day: Set(req.max_periods_per_day),
                    notes: Set(req.notes),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.update(&self.db).await
            }
            None => {
                let model = teacher_preferences::ActiveModel {
                    organization_id: Set(scope.organization_id),
                    school_id: Set(scope.school_id),
                    teacher_id: Set(req.teacher_id),
                    academic_year_id: Set(req.academic_year_id),
                    preferred_days: Set(preferred_days),
                    unavailable_periods: Set(unavailable_periods),
                    max_periods_per_day: Set(req.max_periods_per_day),
                    notes: Set(req.notes),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await
            }
        }
        .map_err(|e| NazimError::database_operation(format!("保存教师偏好失败: {e}")))?;

        Ok(result.into_preference())
    }

    async fn delete_teacher_preference(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<TeacherPreferences, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::academic::CreateSubjectRequest;
    use crate::models::timetables::DayOfWeek;
    use crate::storage::AcademicStorage;
    use crate::storage::sea_orm_storage::test_support::{seed_class, seed_school, seed_staff};

    struct Fixture {
        scope: TenantScope,
        class_id: i64,
        subject_id: i64,
        teacher_id: i64,
    }

    async fn fixture(storage: &SeaOrmStorage) -> Fixture {
        let scope = seed_school(storage, "timetable").await;
        let class_id = seed_class(storage, &scope, "Grade 3").await;
        let teacher_id = seed_staff(storage, &scope, "T-9").await;
        let subject_id = storage
            .create_subject(
                &scope,
                CreateSubjectRequest {
                    name: "Science".to_string(),
                    code: "SCI".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id;
        Fixture {
            scope,
            class_id,
            subject_id,
            teacher_id,
        }
    }

    fn entry(f: &Fixture, day: DayOfWeek, period: i32) -> TimetableEntryInput {
        TimetableEntryInput {
            class_id: f.class_id,
            subject_id: f.subject_id,
            teacher_id: f.teacher_id,
            room_id: None,
            day_of_week: day,
            period_order: period,
            start_time: "08:00".to_string(),
            end_time: "08:45".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_timetable_orders_entries() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;

        let detail = storage
            .create_timetable(
                &f.scope,
                1,
                CreateTimetableRequest {
                    academic_year_id: None,
                    name: "Term 1".to_string(),
                    timetable_type: None,
                    description: None,
                    is_active: None,
                    entries: vec![
                        entry(&f, DayOfWeek::Tuesday, 1),
                        entry(&f, DayOfWeek::Monday, 2),
                        entry(&f, DayOfWeek::Monday, 1),
                    ],
                },
            )
            .await
            .unwrap();

        assert_eq!(detail.timetable.timetable_type, "teaching");
        let order: Vec<_> = detail
            .entries
            .iter()
            .map(|e| (e.day_of_week, e.period_order))
            .collect();
        assert_eq!(
            order,
            vec![
                (DayOfWeek::Monday, 1),
                (DayOfWeek::Monday, 2),
                (DayOfWeek::Tuesday, 1)
            ]
        );

        let replaced = storage
            .replace_timetable_entries(
                &f.scope,
                detail.timetable.id,
                vec![entry(&f, DayOfWeek::Friday, 3)],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.entries.len(), 1);

        assert!(storage.delete_timetable(&f.scope, detail.timetable.id).await.unwrap());
        assert!(
            storage
                .get_timetable(&f.scope, detail.timetable.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_entry_links_checked() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;
        let mut bad = entry(&f, DayOfWeek::Monday, 1);
        bad.teacher_id = 9999;

        let err = storage
            .create_timetable(
                &f.scope,
                1,
                CreateTimetableRequest {
                    academic_year_id: None,
                    name: "Broken".to_string(),
                    timetable_type: None,
                    description: None,
                    is_active: None,
                    entries: vec![bad],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_teacher_preference_upsert() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;
        let req = |max: i32| UpsertTeacherPreferenceRequest {
            teacher_id: f.teacher_id,
            academic_year_id: None,
            preferred_days: vec![DayOfWeek::Monday, DayOfWeek::Wednesday],
            unavailable_periods: vec![1],
            max_periods_per_day: Some(max),
            notes: None,
        };

        let first = storage.upsert_teacher_preference(&f.scope, req(4)).await.unwrap();
        let second = storage.upsert_teacher_preference(&f.scope, req(6)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.max_periods_per_day, Some(6));
        assert_eq!(second.preferred_days, vec![DayOfWeek::Monday, DayOfWeek::Wednesday]);

        let params = TeacherPreferenceListParams {
            pagination: PaginationQuery::default(),
            teacher_id: Some(f.teacher_id),
            academic_year_id: None,
        };
        let list = storage.list_teacher_preferences(&f.scope, &params).await.unwrap();
        assert_eq!(list.pagination.total, 1);
    }
}
