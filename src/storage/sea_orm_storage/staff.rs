use super::SeaOrmStorage;
use super::scoped::{delete_scoped, fetch_page, find_scoped, now, scoped, search_condition};
use crate::entity::staff::{ActiveModel, Column, Entity as Staff};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::staff::{
    CreateStaffRequest, StaffListParams, StaffListResponse, StaffMember, StaffStatus,
    UpdateStaffRequest,
};
use crate::storage::StaffStorage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Set,
};

impl SeaOrmStorage {
    async fn employee_id_taken(
        &self,
        scope: &TenantScope,
        employee_id: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let count = scoped::<Staff>(scope)
            .filter(Column::EmployeeId.eq(employee_id))
            .apply_if(exclude_id, |q, id| q.filter(Column::Id.ne(id)))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询教职工失败: {e}")))?;
        Ok(count > 0)
    }

    /// 关联账号必须属于同一组织
    async fn ensure_user_in_org(&self, scope: &TenantScope, user_id: i64) -> Result<()> {
        let count = Users::find_by_id(user_id)
            .filter(UserColumn::OrganizationId.eq(scope.organization_id))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询用户失败: {e}")))?;
        if count == 0 {
            return Err(NazimError::validation(format!(
                "User {user_id} does not belong to this organization"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StaffStorage for SeaOrmStorage {
    async fn list_staff(
        &self,
        scope: &TenantScope,
        params: &StaffListParams,
    ) -> Result<StaffListResponse> {
        let select = scoped::<Staff>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[Column::FullName, Column::EmployeeId],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.department.clone(), |q, dept| {
                q.filter(Column::Department.eq(dept))
            })
            .apply_if(params.designation.clone(), |q, designation| {
                q.filter(Column::Designation.eq(designation))
            })
            .apply_if(params.status, |q, status| {
                q.filter(Column::Status.eq(status.as_str()))
            })
            .order_by_asc(Column::FullName);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_staff()).await
    }

    async fn get_staff(&self, scope: &TenantScope, id: i64) -> Result<Option<StaffMember>> {
        let result = find_scoped::<Staff, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_staff()))
    }

    async fn create_staff(
        &self,
        scope: &TenantScope,
        req: CreateStaffRequest,
    ) -> Result<StaffMember> {
        if self.employee_id_taken(scope, &req.employee_id, None).await? {
            return Err(NazimError::conflict(format!(
                "Employee id '{}' already exists",
                req.employee_id
            )));
        }
        if let Some(user_id) = req.user_id {
            self.ensure_user_in_org(scope, user_id).await?;
        }

        let now = now();
        let model = ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            user_id: Set(req.user_id),
            employee_id: Set(req.employee_id),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            department: Set(req.department),
            designation: Set(req.designation),
            hire_date: Set(req.hire_date),
            salary: Set(req.salary),
            status: Set(req.status.unwrap_or(StaffStatus::Active).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建教职工失败: {e}")))?;

        Ok(result.into_staff())
    }

    async fn update_staff(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateStaffRequest,
    ) -> Result<Option<StaffMember>> {
        if find_scoped::<Staff, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(employee_id) = req.employee_id {
            if self.employee_id_taken(scope, &employee_id, Some(id)).await? {
                return Err(NazimError::conflict(format!(
                    "Employee id '{employee_id}' already exists"
                )));
            }
            model.employee_id = Set(employee_id);
        }
        if let Some(user_id) = req.user_id {
            self.ensure_user_in_org(scope, user_id).await?;
            model.user_id = Set(Some(user_id));
        }
        if let Some(full_name) = req.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = req.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(department) = req.department {
            model.department = Set(Some(department));
        }
        if let Some(designation) = req.designation {
            model.designation = Set(Some(designation));
        }
        if let Some(hire_date) = req.hire_date {
            model.hire_date = Set(Some(hire_date));
        }
        if let Some(salary) = req.salary {
            model.salary = Set(Some(salary));
        }
        if let Some(status) = req.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新教职工失败: {e}")))?;

        Ok(Some(result.into_staff()))
    }

    async fn delete_staff(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Staff, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::test_support::{seed_school, seed_staff, seed_user};

    fn staff_request(employee_id: &str, user_id: Option<i64>) -> CreateStaffRequest {
        CreateStaffRequest {
            user_id,
            employee_id: employee_id.to_string(),
            full_name: format!("Staff {employee_id}"),
            email: None,
            phone: None,
            department: Some("Science".to_string()),
            designation: None,
            hire_date: None,
            salary: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_staff_employee_id_and_user_link() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "staffed").await;
        let other = seed_school(&storage, "elsewhere").await;
        let outsider = seed_user(&storage, "outsider", other.organization_id).await;
        let insider = seed_user(&storage, "insider", scope.organization_id).await;

        seed_staff(&storage, &scope, "T-1").await;
        let err = storage
            .create_staff(&scope, staff_request("T-1", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        let err = storage
            .create_staff(&scope, staff_request("T-2", Some(outsider)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let linked = storage
            .create_staff(&scope, staff_request("T-2", Some(insider)))
            .await
            .unwrap();
        assert_eq!(linked.user_id, Some(insider));
        assert_eq!(linked.status, StaffStatus::Active);

        let params = StaffListParams {
            pagination: PaginationQuery::default(),
            search: None,
            department: Some("Science".to_string()),
            designation: None,
            status: None,
        };
        assert_eq!(storage.list_staff(&scope, &params).await.unwrap().pagination.total, 1);
    }
}
