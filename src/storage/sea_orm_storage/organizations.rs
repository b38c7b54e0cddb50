use super::SeaOrmStorage;
use super::scoped::{fetch_page, now, search_condition};
use crate::entity::organizations::{ActiveModel, Column, Entity as Organizations};
use crate::entity::schools::{Column as SchoolColumn, Entity as Schools};
use crate::errors::{NazimError, Result};
use crate::models::organizations::{
    CreateOrganizationRequest, Organization, OrganizationListParams, OrganizationListResponse,
    UpdateOrganizationRequest,
};
use crate::storage::OrganizationStorage;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Set,
};

#[async_trait::async_trait]
impl OrganizationStorage for SeaOrmStorage {
    async fn list_organizations(
        &self,
        params: &OrganizationListParams,
    ) -> Result<OrganizationListResponse> {
        let select = Organizations::find()
            .filter(Column::DeletedAt.is_null())
            .apply_if(
                search_condition(params.search.as_deref(), &[Column::Name, Column::Slug]),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.is_active, |q, active| {
                q.filter(Column::IsActive.eq(active))
            })
            .order_by_asc(Column::Name);

        fetch_page(select, &self.db, &params.pagination, |m| {
            m.into_organization()
        })
        .await
    }

    async fn get_organization(&self, id: i64) -> Result<Option<Organization>> {
        let result = Organizations::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询组织失败: {e}")))?;

        Ok(result.map(|m| m.into_organization()))
    }

    async fn create_organization(&self, req: CreateOrganizationRequest) -> Result<Organization> {
        // slug 全局唯一，软删除的组织同样占用
        let exists = Organizations::find()
            .filter(Column::Slug.eq(&req.slug))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询组织失败: {e}")))?;
        if exists > 0 {
            return Err(NazimError::conflict(format!(
                "Organization slug '{}' already exists",
                req.slug
            )));
        }

        let now = now();
        let model = ActiveModel {
            name: Set(req.name),
            slug: Set(req.slug),
            email: Set(req.email),
            phone: Set(req.phone),
            address: Set(req.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建组织失败: {e}")))?;

        Ok(result.into_organization())
    }

    async fn update_organization(
        &self,
        id: i64,
        req: UpdateOrganizationRequest,
    ) -> Result<Option<Organization>> {
        if self.get_organization(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(email) = req.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = req.address {
            model.address = Set(Some(address));
        }
        if let Some(is_active) = req.is_active {
            model.is_active = Set(is_active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新组织失败: {e}")))?;

        Ok(Some(result.into_organization()))
    }

    async fn delete_organization(&self, id: i64) -> Result<bool> {
        let schools = Schools::find()
            .filter(SchoolColumn::OrganizationId.eq(id))
            .filter(SchoolColumn::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学校失败: {e}")))?;
        if schools > 0 {
            return Err(NazimError::conflict(format!(
                "Organization still has {schools} active school(s)"
            )));
        }

        let result = Organizations::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除组织失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::schools::CreateSchoolRequest;
    use crate::models::OrgScope;
    use crate::storage::SchoolStorage;

    fn org_request(slug: &str) -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            name: format!("Org {slug}"),
            slug: slug.to_string(),
            email: None,
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_organization_slug_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage.create_organization(org_request("alpha")).await.unwrap();

        let err = storage
            .create_organization(org_request("alpha"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_organization_delete_guard_and_visibility() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let org = storage.create_organization(org_request("beta")).await.unwrap();
        let scope = OrgScope {
            organization_id: org.id,
        };
        let school = storage
            .create_school(
                &scope,
                CreateSchoolRequest {
                    name: "Main".to_string(),
                    code: "MAIN".to_string(),
                    address: None,
                    phone: None,
                    email: None,
                    principal_name: None,
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_organization(org.id).await.is_err());

        storage.delete_school(&scope, school.id).await.unwrap();
        assert!(storage.delete_organization(org.id).await.unwrap());
        assert!(storage.get_organization(org.id).await.unwrap().is_none());

        let params = OrganizationListParams {
            pagination: PaginationQuery::default(),
            search: None,
            is_active: None,
        };
        let list = storage.list_organizations(&params).await.unwrap();
        assert_eq!(list.pagination.total, 0);
    }
}
