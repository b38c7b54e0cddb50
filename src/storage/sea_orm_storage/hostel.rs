//! 宿舍房间与分配

use super::SeaOrmStorage;
use super::scoped::{delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped};
use crate::entity::hostel_allocations::{self, Entity as HostelAllocations};
use crate::entity::hostel_rooms::{self, Entity as HostelRooms};
use crate::entity::students::Entity as Students;
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::hostel::{
    AllocateRoomRequest, AllocationListParams, AllocationListResponse, AllocationStatus,
    CreateHostelRoomRequest, HostelAllocation, HostelRoom, HostelRoomListParams,
    HostelRoomListResponse, UpdateHostelRoomRequest,
};
use crate::storage::HostelStorage;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};

/// 同一宿舍楼内房号唯一
async fn room_number_taken<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    hostel_name: &str,
    room_number: &str,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let count = scoped::<HostelRooms>(scope)
        .filter(hostel_rooms::Column::HostelName.eq(hostel_name))
        .filter(hostel_rooms::Column::RoomNumber.eq(room_number))
        .apply_if(exclude_id, |q, id| q.filter(hostel_rooms::Column::Id.ne(id)))
        .count(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("查询宿舍房间失败: {e}")))?;
    Ok(count > 0)
}

#[async_trait::async_trait]
impl HostelStorage for SeaOrmStorage {
    async fn list_hostel_rooms(
        &self,
        scope: &TenantScope,
        params: &HostelRoomListParams,
    ) -> Result<HostelRoomListResponse> {
        let select = scoped::<HostelRooms>(scope)
            .apply_if(params.hostel_name.clone(), |q, name| {
                q.filter(hostel_rooms::Column::HostelName.eq(name))
            })
            .apply_if(params.available_only.filter(|only| *only), |q, _| {
                q.filter(
                    Expr::col(hostel_rooms::Column::Occupied)
                        .lt(Expr::col(hostel_rooms::Column::Capacity)),
                )
            })
            .order_by_asc(hostel_rooms::Column::HostelName)
            .order_by_asc(hostel_rooms::Column::RoomNumber);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_room()).await
    }

    async fn list_all_hostel_rooms(&self, scope: &TenantScope) -> Result<Vec<HostelRoom>> {
        let rooms = scoped::<HostelRooms>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询宿舍房间失败: {e}")))?;
        Ok(rooms.into_iter().map(|m| m.into_room()).collect())
    }

    async fn create_hostel_room(
        &self,
        scope: &TenantScope,
        req: CreateHostelRoomRequest,
    ) -> Result<HostelRoom> {
        if req.capacity < 1 {
            return Err(NazimError::validation("Room capacity must be at least 1"));
        }
        if room_number_taken(&self.db, scope, &req.hostel_name, &req.room_number, None).await? {
            return Err(NazimError::conflict(format!(
                "Room {} already exists in {}",
                req.room_number, req.hostel_name
            )));
        }

        let now = now();
        let model = hostel_rooms::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            hostel_name: Set(req.hostel_name),
            room_number: Set(req.room_number),
            floor: Set(req.floor),
            capacity: Set(req.capacity),
            occupied: Set(0),
            room_type: Set(req.room_type),
            monthly_fee: Set(req.monthly_fee),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建宿舍房间失败: {e}")))?;

        Ok(result.into_room())
    }

    async fn update_hostel_room(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateHostelRoomRequest,
    ) -> Result<Option<HostelRoom>> {
        let Some(existing) = find_scoped::<HostelRooms, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };

        if let Some(capacity) = req.capacity {
            if capacity < 1 {
                return Err(NazimError::validation("Room capacity must be at least 1"));
            }
            if capacity < existing.occupied {
                return Err(NazimError::validation(format!(
                    "Capacity cannot be less than the {} current occupants",
                    existing.occupied
                )));
            }
        }

        if req.hostel_name.is_some() || req.room_number.is_some() {
            let hostel_name = req.hostel_name.as_deref().unwrap_or(&existing.hostel_name);
            let room_number = req.room_number.as_deref().unwrap_or(&existing.room_number);
            if room_number_taken(&self.db, scope, hostel_name, room_number, Some(id)).await? {
                return Err(NazimError::conflict(format!(
                    "Room {room_number} already exists in {hostel_name}"
                )));
            }
        }

        let mut model = hostel_rooms::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(hostel_name) = req.hostel_name {
            model.hostel_name = Set(hostel_name);
        }
        if let Some(room_number) = req.room_number {
            model.room_number = Set(room_number);
        }
        if let Some(floor) = req.floor {
            model.floor = Set(Some(floor));
        }
        if let Some(capacity) = req.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(room_type) = req.room_type {
            model.room_type = Set(Some(room_type));
        }
        if let Some(monthly_fee) = req.monthly_fee {
            model.monthly_fee = Set(Some(monthly_fee));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新宿舍房间失败: {e}")))?;

        Ok(Some(result.into_room()))
    }

    async fn delete_hostel_room(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        if let Some(room) = find_scoped::<HostelRooms, _>(&self.db, scope, id).await?
            && room.occupied > 0
        {
            return Err(NazimError::conflict(format!(
                "Room still has {} occupant(s)",
                room.occupied
            )));
        }

        delete_scoped::<HostelRooms, _>(&self.db, scope, id).await
    }

    async fn allocate_room(
        &self,
        scope: &TenantScope,
        req: AllocateRoomRequest,
        allocated_on: NaiveDate,
    ) -> Result<HostelAllocation> {
        ensure_scoped::<Students, _>(&self.db, scope, req.student_id, "Student").await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let active = scoped::<HostelAllocations>(scope)
            .filter(hostel_allocations::Column::StudentId.eq(req.student_id))
            .filter(hostel_allocations::Column::Status.eq(AllocationStatus::Active.as_str()))
            .count(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询宿舍分配失败: {e}")))?;
        if active > 0 {
            return Err(NazimError::conflict(
                "Student already has an active hostel allocation",
            ));
        }

        find_scoped::<HostelRooms, _>(&txn, scope, req.room_id)
            .await?
            .ok_or_else(|| {
                NazimError::not_found(format!("Hostel room {} not found", req.room_id))
            })?;

        // 条件更新保证并发下不超员
        let claimed = HostelRooms::update_many()
            .col_expr(
                hostel_rooms::Column::Occupied,
                Expr::col(hostel_rooms::Column::Occupied).add(1),
            )
            .col_expr(hostel_rooms::Column::UpdatedAt, Expr::value(now()))
            .filter(hostel_rooms::Column::Id.eq(req.room_id))
            .filter(
                Expr::col(hostel_rooms::Column::Occupied)
                    .lt(Expr::col(hostel_rooms::Column::Capacity)),
            )
            .exec(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新宿舍入住数失败: {e}")))?;
        if claimed.rows_affected == 0 {
            return Err(NazimError::conflict("Hostel room is full"));
        }

        let now = now();
        let model = hostel_allocations::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            room_id: Set(req.room_id),
            student_id: Set(req.student_id),
            allocated_on: Set(req.allocated_on.unwrap_or(allocated_on)),
            status: Set(AllocationStatus::Active.to_string()),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let allocation = model
            .insert(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建宿舍分配失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(allocation.into_allocation())
    }

    async fn checkout_allocation(
        &self,
        scope: &TenantScope,
        id: i64,
        checkout_on: NaiveDate,
    ) -> Result<HostelAllocation> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let allocation = find_scoped::<HostelAllocations, _>(&txn, scope, id)
            .await?
            .ok_or_else(|| NazimError::not_found(format!("Allocation {id} not found")))?;
        if allocation.status != AllocationStatus::Active.as_str() {
            return Err(NazimError::conflict(format!(
                "Allocation {id} is already checked out"
            )));
        }
        if checkout_on < allocation.allocated_on {
            return Err(NazimError::validation(
                "Checkout date must not be before the allocation date",
            ));
        }

        let model = hostel_allocations::ActiveModel {
            id: Set(id),
            checkout_on: Set(Some(checkout_on)),
            status: Set(AllocationStatus::CheckedOut.to_string()),
            updated_at: Set(now()),
            ..Default::default()
        };
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新宿舍分配失败: {e}")))?;

        HostelRooms::update_many()
            .col_expr(
                hostel_rooms::Column::Occupied,
                Expr::col(hostel_rooms::Column::Occupied).sub(1),
            )
            .col_expr(hostel_rooms::Column::UpdatedAt, Expr::value(now()))
            .filter(hostel_rooms::Column::Id.eq(allocation.room_id))
            .filter(hostel_rooms::Column::Occupied.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新宿舍入住数失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_allocation())
    }

    async fn list_allocations(
        &self,
        scope: &TenantScope,
        params: &AllocationListParams,
    ) -> Result<AllocationListResponse> {
        let select = scoped::<HostelAllocations>(scope)
            .apply_if(params.room_id, |q, id| {
                q.filter(hostel_allocations::Column::RoomId.eq(id))
            })
            .apply_if(params.student_id, |q, id| {
                q.filter(hostel_allocations::Column::StudentId.eq(id))
            })
            .apply_if(params.status, |q, status| {
                q.filter(hostel_allocations::Column::Status.eq(status.as_str()))
            })
            .order_by_desc(hostel_allocations::Column::AllocatedOn)
            .order_by_desc(hostel_allocations::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_allocation()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::storage::sea_orm_storage::test_support::{seed_school, seed_student};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn room(number: &str, capacity: i32) -> CreateHostelRoomRequest {
        CreateHostelRoomRequest {
            hostel_name: "North Block".to_string(),
            room_number: number.to_string(),
            floor: Some(1),
            capacity,
            room_type: None,
            monthly_fee: Some(1500.0),
        }
    }

    fn allocate(room_id: i64, student_id: i64) -> AllocateRoomRequest {
        AllocateRoomRequest {
            room_id,
            student_id,
            allocated_on: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_room_validation() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "hostel-rooms").await;

        let err = storage.create_hostel_room(&scope, room("101", 0)).await.unwrap_err();
        assert_eq!(err.code(), "E007");

        storage.create_hostel_room(&scope, room("101", 2)).await.unwrap();
        let err = storage.create_hostel_room(&scope, room("101", 2)).await.unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_allocation_lifecycle() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "hostel-alloc").await;
        let first = seed_student(&storage, &scope, "H-1", None).await;
        let second = seed_student(&storage, &scope, "H-2", None).await;
        let single = storage.create_hostel_room(&scope, room("201", 1)).await.unwrap();

        let allocation = storage
            .allocate_room(&scope, allocate(single.id, first.id), date("2026-01-10"))
            .await
            .unwrap();
        assert_eq!(allocation.status, AllocationStatus::Active);

        // 同一学生不能重复入住
        let other = storage.create_hostel_room(&scope, room("202", 2)).await.unwrap();
        let err = storage
            .allocate_room(&scope, allocate(other.id, first.id), date("2026-01-10"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        // 房间已满
        let err = storage
            .allocate_room(&scope, allocate(single.id, second.id), date("2026-01-10"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        // 有人入住时不能删除
        assert!(storage.delete_hostel_room(&scope, single.id).await.is_err());

        let checked_out = storage
            .checkout_allocation(&scope, allocation.id, date("2026-02-01"))
            .await
            .unwrap();
        assert_eq!(checked_out.status, AllocationStatus::CheckedOut);
        assert_eq!(checked_out.checkout_on, Some(date("2026-02-01")));

        let rooms = storage.list_all_hostel_rooms(&scope).await.unwrap();
        let single_now = rooms.iter().find(|r| r.id == single.id).unwrap();
        assert_eq!(single_now.occupied, 0);

        let params = AllocationListParams {
            pagination: PaginationQuery::default(),
            room_id: Some(single.id),
            student_id: None,
            status: Some(AllocationStatus::CheckedOut),
        };
        let listed = storage.list_allocations(&scope, &params).await.unwrap();
        assert_eq!(listed.pagination.total, 1);

        assert!(storage.delete_hostel_room(&scope, single.id).await.unwrap());
    }
}
