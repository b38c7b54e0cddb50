//! 学年、班级、科目、教学楼与教室

use super::SeaOrmStorage;
use super::scoped::{
    delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped, search_condition,
};
use crate::entity::academic_years::{self, Entity as AcademicYears};
use crate::entity::buildings::{self, Entity as Buildings};
use crate::entity::classes::{self, Entity as Classes};
use crate::entity::rooms::{self, Entity as Rooms};
use crate::entity::staff::Entity as Staff;
use crate::entity::subjects::{self, Entity as Subjects};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::academic::{
    AcademicListParams, AcademicYear, Building, BuildingListResponse, Class, ClassListParams,
    ClassListResponse, CreateAcademicYearRequest, CreateBuildingRequest, CreateClassRequest,
    CreateRoomRequest, CreateSubjectRequest, Room, RoomListParams, RoomListResponse, Subject,
    SubjectListResponse, UpdateAcademicYearRequest, UpdateBuildingRequest, UpdateClassRequest,
    UpdateRoomRequest, UpdateSubjectRequest,
};
use crate::storage::AcademicStorage;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait, Set, TransactionTrait,
};

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(NazimError::validation(
            "Academic year start date must not be after end date",
        ));
    }
    Ok(())
}

/// 取消学校内其他学年的当前标记
async fn clear_current_year<C: ConnectionTrait>(db: &C, scope: &TenantScope) -> Result<()> {
    AcademicYears::update_many()
        .col_expr(academic_years::Column::IsCurrent, Expr::value(false))
        .filter(academic_years::Column::OrganizationId.eq(scope.organization_id))
        .filter(academic_years::Column::SchoolId.eq(scope.school_id))
        .exec(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("更新当前学年失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    async fn check_class_links(
        &self,
        scope: &TenantScope,
        academic_year_id: Option<i64>,
        class_teacher_id: Option<i64>,
        room_id: Option<i64>,
    ) -> Result<()> {
        if let Some(id) = academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, id, "Academic year").await?;
        }
        if let Some(id) = class_teacher_id {
            ensure_scoped::<Staff, _>(&self.db, scope, id, "Class teacher").await?;
        }
        if let Some(id) = room_id {
            ensure_scoped::<Rooms, _>(&self.db, scope, id, "Room").await?;
        }
        Ok(())
    }

    async fn subject_code_taken(
        &self,
        scope: &TenantScope,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let count = scoped::<Subjects>(scope)
            .filter(subjects::Column::Code.eq(code))
            .apply_if(exclude_id, |q, id| q.filter(subjects::Column::Id.ne(id)))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询科目失败: {e}")))?;
        Ok(count > 0)
    }

    /// 同一教学楼内房间号唯一（未指定教学楼的房间视为一组）
    async fn room_number_taken(
        &self,
        scope: &TenantScope,
        building_id: Option<i64>,
        room_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let building_filter = match building_id {
            Some(id) => rooms::Column::BuildingId.eq(id),
            None => rooms::Column::BuildingId.is_null(),
        };
        let count = scoped::<Rooms>(scope)
            .filter(building_filter)
            .filter(rooms::Column::RoomNumber.eq(room_number))
            .apply_if(exclude_id, |q, id| q.filter(rooms::Column::Id.ne(id)))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询教室失败: {e}")))?;
        Ok(count > 0)
    }
}

#[async_trait::async_trait]
impl AcademicStorage for SeaOrmStorage {
    async fn list_academic_years(&self, scope: &TenantScope) -> Result<Vec<AcademicYear>> {
        let years = scoped::<AcademicYears>(scope)
            .order_by_desc(academic_years::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    async fn get_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        let result = find_scoped::<AcademicYears, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_academic_year()))
    }

    async fn create_academic_year(
        &self,
        scope: &TenantScope,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        check_date_range(req.start_date, req.end_date)?;
        let is_current = req.is_current.unwrap_or(false);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        if is_current {
            clear_current_year(&txn, scope).await?;
        }

        let now = now();
        let model = academic_years::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = model
            .insert(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_academic_year())
    }

    async fn update_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        let Some(existing) = find_scoped::<AcademicYears, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        check_date_range(
            req.start_date.unwrap_or(existing.start_date),
            req.end_date.unwrap_or(existing.end_date),
        )?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = academic_years::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(start_date) = req.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = req.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(is_current) = req.is_current {
            if is_current {
                clear_current_year(&txn, scope).await?;
            }
            model.is_current = Set(is_current);
        }

        let result = model
            .update(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_academic_year()))
    }

    async fn set_current_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year(
            scope,
            id,
            UpdateAcademicYearRequest {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete_academic_year(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<AcademicYears, _>(&self.db, scope, id).await
    }

    async fn list_classes(
        &self,
        scope: &TenantScope,
        params: &ClassListParams,
    ) -> Result<ClassListResponse> {
        let select = scoped::<Classes>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[classes::Column::Name, classes::Column::Section],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(classes::Column::AcademicYearId.eq(id))
            })
            .order_by_asc(classes::Column::GradeLevel)
            .order_by_asc(classes::Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_class()).await
    }

    async fn list_all_classes(&self, scope: &TenantScope) -> Result<Vec<Class>> {
        let classes = scoped::<Classes>(scope)
            .order_by_asc(classes::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    async fn get_class(&self, scope: &TenantScope, id: i64) -> Result<Option<Class>> {
        let result = find_scoped::<Classes, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_class()))
    }

    async fn create_class(&self, scope: &TenantScope, req: CreateClassRequest) -> Result<Class> {
        self.check_class_links(scope, req.academic_year_id, req.class_teacher_id, req.room_id)
            .await?;

        let now = now();
        let model = classes::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name),
            section: Set(req.section),
            grade_level: Set(req.grade_level),
            class_teacher_id: Set(req.class_teacher_id),
            room_id: Set(req.room_id),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    async fn update_class(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if find_scoped::<Classes, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }
        self.check_class_links(scope, req.academic_year_id, req.class_teacher_id, req.room_id)
            .await?;

        let mut model = classes::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(academic_year_id) = req.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(section) = req.section {
            model.section = Set(Some(section));
        }
        if let Some(grade_level) = req.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(class_teacher_id) = req.class_teacher_id {
            model.class_teacher_id = Set(Some(class_teacher_id));
        }
        if let Some(room_id) = req.room_id {
            model.room_id = Set(Some(room_id));
        }
        if let Some(capacity) = req.capacity {
            model.capacity = Set(Some(capacity));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(result.into_class()))
    }

    async fn delete_class(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Classes, _>(&self.db, scope, id).await
    }

    async fn list_subjects(
        &self,
        scope: &TenantScope,
        params: &AcademicListParams,
    ) -> Result<SubjectListResponse> {
        let select = scoped::<Subjects>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[subjects::Column::Name, subjects::Column::Code],
                ),
                |q, cond| q.filter(cond),
            )
            .order_by_asc(subjects::Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_subject()).await
    }

    async fn list_all_subjects(&self, scope: &TenantScope) -> Result<Vec<Subject>> {
        let subjects = scoped::<Subjects>(scope)
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    async fn create_subject(
        &self,
        scope: &TenantScope,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        if self.subject_code_taken(scope, &req.code, None).await? {
            return Err(NazimError::conflict(format!(
                "Subject code '{}' already exists",
                req.code
            )));
        }

        let now = now();
        let model = subjects::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    async fn update_subject(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if find_scoped::<Subjects, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = subjects::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(code) = req.code {
            if self.subject_code_taken(scope, &code, Some(id)).await? {
                return Err(NazimError::conflict(format!(
                    "Subject code '{code}' already exists"
                )));
            }
            model.code = Set(code);
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新科目失败: {e}")))?;

        Ok(Some(result.into_subject()))
    }

    async fn delete_subject(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Subjects, _>(&self.db, scope, id).await
    }

    async fn list_buildings(
        &self,
        scope: &TenantScope,
        params: &AcademicListParams,
    ) -> Result<BuildingListResponse> {
        let select = scoped::<Buildings>(scope)
            .apply_if(
                search_condition(params.search.as_deref(), &[buildings::Column::Name]),
                |q, cond| q.filter(cond),
            )
            .order_by_asc(buildings::Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_building()).await
    }

    async fn create_building(
        &self,
        scope: &TenantScope,
        req: CreateBuildingRequest,
    ) -> Result<Building> {
        let now = now();
        let model = buildings::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            name: Set(req.name),
            description: Set(req.description),
            floors: Set(req.floors),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建教学楼失败: {e}")))?;

        Ok(result.into_building())
    }

    async fn update_building(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateBuildingRequest,
    ) -> Result<Option<Building>> {
        if find_scoped::<Buildings, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = buildings::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(floors) = req.floors {
            model.floors = Set(Some(floors));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新教学楼失败: {e}")))?;

        Ok(Some(result.into_building()))
    }

    async fn delete_building(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        let rooms = scoped::<Rooms>(scope)
            .filter(rooms::Column::BuildingId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询教室失败: {e}")))?;
        if rooms > 0 {
            return Err(NazimError::conflict(format!(
                "Building still has {rooms} room(s)"
            )));
        }

        delete_scoped::<Buildings, _>(&self.db, scope, id).await
    }

    async fn list_rooms(
        &self,
        scope: &TenantScope,
        params: &RoomListParams,
    ) -> Result<RoomListResponse> {
        let select = scoped::<Rooms>(scope)
            .apply_if(
                search_condition(params.search.as_deref(), &[rooms::Column::RoomNumber]),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.building_id, |q, id| {
                q.filter(rooms::Column::BuildingId.eq(id))
            })
            .order_by_asc(rooms::Column::RoomNumber);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_room()).await
    }

    async fn create_room(&self, scope: &TenantScope, req: CreateRoomRequest) -> Result<Room> {
        if let Some(building_id) = req.building_id {
            ensure_scoped::<Buildings, _>(&self.db, scope, building_id, "Building").await?;
        }
        if self
            .room_number_taken(scope, req.building_id, &req.room_number, None)
            .await?
        {
            return Err(NazimError::conflict(format!(
                "Room '{}' already exists in this building",
                req.room_number
            )));
        }

        let now = now();
        let model = rooms::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            building_id: Set(req.building_id),
            room_number: Set(req.room_number),
            capacity: Set(req.capacity),
            room_type: Set(req.room_type),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建教室失败: {e}")))?;

        Ok(result.into_room())
    }

    async fn update_room(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateRoomRequest,
    ) -> Result<Option<Room>> {
        let Some(existing) = find_scoped::<Rooms, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };

        if let Some(building_id) = req.building_id {
            ensure_scoped::<Buildings, _>(&self.db, scope, building_id, "Building").await?;
        }
        let building_id = req.building_id.or(existing.building_id);
        let room_number = req.room_number.clone().unwrap_or(existing.room_number);
        if self
            .room_number_taken(scope, building_id, &room_number, Some(id))
            .await?
        {
            return Err(NazimError::conflict(format!(
                "Room '{room_number}' already exists in this building"
            )));
        }

        let mut model = rooms::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(building_id) = req.building_id {
            model.building_id = Set(Some(building_id));
        }
        if let Some(room_number) = req.room_number {
            model.room_number = Set(room_number);
        }
        if let Some(capacity) = req.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(room_type) = req.room_type {
            model.room_type = Set(Some(room_type));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新教室失败: {e}")))?;

        Ok(Some(result.into_room()))
    }

    async fn delete_room(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Rooms, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::test_support::{seed_school, seed_staff};

    fn year_request(name: &str, start: &str, end: &str, current: bool) -> CreateAcademicYearRequest {
        CreateAcademicYearRequest {
            name: name.to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            is_current: Some(current),
        }
    }

    #[tokio::test]
    async fn test_single_current_academic_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "years").await;

        let first = storage
            .create_academic_year(&scope, year_request("2024", "2024-04-01", "2025-03-31", true))
            .await
            .unwrap();
        let second = storage
            .create_academic_year(&scope, year_request("2025", "2025-04-01", "2026-03-31", true))
            .await
            .unwrap();
        assert!(second.is_current);

        let years = storage.list_academic_years(&scope).await.unwrap();
        assert_eq!(years.iter().filter(|y| y.is_current).count(), 1);

        storage
            .set_current_academic_year(&scope, first.id)
            .await
            .unwrap()
            .unwrap();
        let years = storage.list_academic_years(&scope).await.unwrap();
        let current: Vec<_> = years.iter().filter(|y| y.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, first.id);
    }

    #[tokio::test]
    async fn test_academic_year_date_order() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "dates").await;

        let err = storage
            .create_academic_year(&scope, year_request("bad", "2025-04-01", "2024-03-31", false))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_class_teacher_must_be_local_staff() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "local").await;
        let other = seed_school(&storage, "remote").await;
        let remote_teacher = seed_staff(&storage, &other, "R-1").await;
        let local_teacher = seed_staff(&storage, &scope, "L-1").await;

        let mut req = CreateClassRequest {
            academic_year_id: None,
            name: "Grade 5".to_string(),
            section: Some("A".to_string()),
            grade_level: Some(5),
            class_teacher_id: Some(remote_teacher),
            room_id: None,
            capacity: Some(30),
        };
        assert!(storage.create_class(&scope, req).await.is_err());

        req = CreateClassRequest {
            academic_year_id: None,
            name: "Grade 5".to_string(),
            section: Some("A".to_string()),
            grade_level: Some(5),
            class_teacher_id: Some(local_teacher),
            room_id: None,
            capacity: Some(30),
        };
        let class = storage.create_class(&scope, req).await.unwrap();
        assert_eq!(class.class_teacher_id, Some(local_teacher));
    }

    #[tokio::test]
    async fn test_building_rooms_guard_and_room_number() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "campus").await;

        let building = storage
            .create_building(
                &scope,
                CreateBuildingRequest {
                    name: "Block A".to_string(),
                    description: None,
                    floors: Some(2),
                },
            )
            .await
            .unwrap();
        let room_req = |number: &str| CreateRoomRequest {
            building_id: Some(building.id),
            room_number: number.to_string(),
            capacity: Some(40),
            room_type: None,
        };

        let room = storage.create_room(&scope, room_req("101")).await.unwrap();
        let err = storage.create_room(&scope, room_req("101")).await.unwrap_err();
        assert_eq!(err.code(), "E014");

        let err = storage.delete_building(&scope, building.id).await.unwrap_err();
        assert_eq!(err.code(), "E014");

        assert!(storage.delete_room(&scope, room.id).await.unwrap());
        assert!(storage.delete_building(&scope, building.id).await.unwrap());

        let params = RoomListParams {
            pagination: PaginationQuery::default(),
            search: None,
            building_id: Some(building.id),
        };
        assert_eq!(storage.list_rooms(&scope, &params).await.unwrap().pagination.total, 0);
    }

    #[tokio::test]
    async fn test_subject_code_unique() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "subjects").await;
        let req = || CreateSubjectRequest {
            name: "Mathematics".to_string(),
            code: "MATH".to_string(),
            description: None,
        };

        let subject = storage.create_subject(&scope, req()).await.unwrap();
        assert!(storage.create_subject(&scope, req()).await.is_err());

        storage.delete_subject(&scope, subject.id).await.unwrap();
        storage.create_subject(&scope, req()).await.unwrap();
        assert_eq!(storage.list_all_subjects(&scope).await.unwrap().len(), 1);
    }
}
