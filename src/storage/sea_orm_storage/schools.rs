use super::SeaOrmStorage;
use super::scoped::{fetch_page, now, search_condition};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{NazimError, Result};
use crate::models::OrgScope;
use crate::models::schools::{
    CreateSchoolRequest, School, SchoolListParams, SchoolListResponse, UpdateSchoolRequest,
};
use crate::models::students::StudentStatus;
use crate::storage::SchoolStorage;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Select, Set,
};

impl SeaOrmStorage {
    fn org_schools(scope: &OrgScope) -> Select<Schools> {
        Schools::find()
            .filter(Column::OrganizationId.eq(scope.organization_id))
            .filter(Column::DeletedAt.is_null())
    }

    /// 组织内学校代码是否已被占用
    async fn school_code_taken(
        &self,
        scope: &OrgScope,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let count = Self::org_schools(scope)
            .filter(Column::Code.eq(code))
            .apply_if(exclude_id, |q, id| q.filter(Column::Id.ne(id)))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学校失败: {e}")))?;
        Ok(count > 0)
    }
}

#[async_trait::async_trait]
impl SchoolStorage for SeaOrmStorage {
    async fn list_schools(
        &self,
        scope: &OrgScope,
        params: &SchoolListParams,
    ) -> Result<SchoolListResponse> {
        let select = Self::org_schools(scope)
            .apply_if(
                search_condition(params.search.as_deref(), &[Column::Name, Column::Code]),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.is_active, |q, active| {
                q.filter(Column::IsActive.eq(active))
            })
            .order_by_asc(Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_school()).await
    }

    async fn get_school(&self, scope: &OrgScope, id: i64) -> Result<Option<School>> {
        let result = Self::org_schools(scope)
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    async fn find_school(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    async fn create_school(&self, scope: &OrgScope, req: CreateSchoolRequest) -> Result<School> {
        if self.school_code_taken(scope, &req.code, None).await? {
            return Err(NazimError::conflict(format!(
                "School code '{}' already exists",
                req.code
            )));
        }

        let now = now();
        let model = ActiveModel {
            organization_id: Set(scope.organization_id),
            name: Set(req.name),
            code: Set(req.code),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            principal_name: Set(req.principal_name),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建学校失败: {e}")))?;

        Ok(result.into_school())
    }

    async fn update_school(
        &self,
        scope: &OrgScope,
        id: i64,
        req: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school(scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(code) = req.code {
            if self.school_code_taken(scope, &code, Some(id)).await? {
                return Err(NazimError::conflict(format!(
                    "School code '{code}' already exists"
                )));
            }
            model.code = Set(code);
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(address) = req.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = req.email {
            model.email = Set(Some(email));
        }
        if let Some(principal_name) = req.principal_name {
            model.principal_name = Set(Some(principal_name));
        }
        if let Some(is_active) = req.is_active {
            model.is_active = Set(is_active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新学校失败: {e}")))?;

        Ok(Some(result.into_school()))
    }

    async fn delete_school(&self, scope: &OrgScope, id: i64) -> Result<bool> {
        let students = Students::find()
            .filter(StudentColumn::OrganizationId.eq(scope.organization_id))
            .filter(StudentColumn::SchoolId.eq(id))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.as_str()))
            .filter(StudentColumn::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学生失败: {e}")))?;
        if students > 0 {
            return Err(NazimError::conflict(format!(
                "School still has {students} active student(s)"
            )));
        }

        let result = Schools::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::OrganizationId.eq(scope.organization_id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除学校失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::seed_org;

    fn school_request(code: &str) -> CreateSchoolRequest {
        CreateSchoolRequest {
            name: format!("School {code}"),
            code: code.to_string(),
            address: None,
            phone: None,
            email: None,
            principal_name: None,
        }
    }

    #[tokio::test]
    async fn test_school_code_unique_within_organization() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = seed_org(&storage, "first").await;
        let second = seed_org(&storage, "second").await;

        storage.create_school(&first, school_request("S1")).await.unwrap();
        let err = storage
            .create_school(&first, school_request("S1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        // 其他组织可以使用相同代码
        storage.create_school(&second, school_request("S1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_school_isolated_by_organization() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = seed_org(&storage, "first").await;
        let second = seed_org(&storage, "second").await;

        let school = storage.create_school(&first, school_request("S1")).await.unwrap();
        assert!(storage.get_school(&second, school.id).await.unwrap().is_none());
        assert!(
            storage
                .update_school(&second, school.id, UpdateSchoolRequest::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_school(&second, school.id).await.unwrap());
        assert!(storage.find_school(school.id).await.unwrap().is_some());
    }
}
