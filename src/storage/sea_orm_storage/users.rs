use super::SeaOrmStorage;
use super::scoped::{fetch_page, is_unique_violation, now, search_condition};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{NazimError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    responses::UserListResponse,
};
use crate::storage::UserStorage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Set,
};

#[async_trait::async_trait]
impl UserStorage for SeaOrmStorage {
    /// 创建用户
    async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        let now = now();

        let model = ActiveModel {
            organization_id: Set(req.organization_id),
            default_school_id: Set(req.default_school_id),
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            full_name: Set(req.full_name),
            phone: Set(req.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                NazimError::conflict("Username or email already exists")
            } else {
                NazimError::database_operation(format!("创建用户失败: {e}"))
            }
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    async fn list_users(&self, query: UserListQuery) -> Result<UserListResponse> {
        let select = Users::find()
            .apply_if(query.organization_id, |q, org| {
                q.filter(Column::OrganizationId.eq(org))
            })
            .apply_if(
                search_condition(
                    query.search.as_deref(),
                    &[Column::Username, Column::Email, Column::FullName],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(query.role, |q, role| q.filter(Column::Role.eq(role.as_str())))
            .apply_if(query.status, |q, status| {
                q.filter(Column::Status.eq(status.as_str()))
            })
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        fetch_page(select, &self.db, &query.pagination, |m| m.into_user()).await
    }

    /// 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        // 先检查用户是否存在
        if self.get_user_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(full_name) = update.full_name {
            model.full_name = Set(Some(full_name));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        if let Some(school_id) = update.default_school_id {
            model.default_school_id = Set(Some(school_id));
        }

        let result = model.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                NazimError::conflict("Email already exists")
            } else {
                NazimError::database_operation(format!("更新用户失败: {e}"))
            }
        })?;

        Ok(Some(result.into_user()))
    }

    /// 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    async fn count_users(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_org;

    fn user_request(name: &str, organization_id: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hashed".to_string(),
            role: UserRole::Teacher,
            full_name: Some(name.to_uppercase()),
            phone: None,
            organization_id,
            default_school_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage.create_user(user_request("alice", None)).await.unwrap();

        let by_name = storage
            .get_user_by_username_or_email("alice")
            .await
            .unwrap()
            .unwrap();
        let by_email = storage
            .get_user_by_username_or_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_email.id, user.id);
        assert!(user.is_active());

        let err = storage
            .create_user(user_request("alice", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_list_users_filters_by_organization() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let org = seed_org(&storage, "acme").await;
        storage
            .create_user(user_request("bob", Some(org.organization_id)))
            .await
            .unwrap();
        storage.create_user(user_request("carol", None)).await.unwrap();

        let scoped = storage
            .list_users(UserListQuery {
                organization_id: Some(org.organization_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.pagination.total, 1);
        assert_eq!(scoped.items[0].username, "bob");

        let all = storage.list_users(UserListQuery::default()).await.unwrap();
        assert_eq!(all.pagination.total, 2);
        assert_eq!(storage.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_user_and_last_login() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage.create_user(user_request("dave", None)).await.unwrap();

        let updated = storage
            .update_user(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    phone: Some("0300".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active());
        assert_eq!(updated.phone.as_deref(), Some("0300"));

        assert!(storage.update_last_login(user.id).await.unwrap());
        let reloaded = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());

        assert!(storage.delete_user(user.id).await.unwrap());
        assert!(storage.update_user(user.id, UpdateUserRequest::default()).await.unwrap().is_none());
    }
}
