//! 操作日志

use super::SeaOrmStorage;
use super::scoped::{fetch_page, now};
use crate::entity::activity_logs::{ActiveModel, Column, Entity as ActivityLogs};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::activity_logs::{ActivityLogListParams, ActivityLogListResponse, NewActivityLog};
use crate::storage::ActivityLogStorage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QueryTrait, Set,
};

/// 在调用方的连接（或事务）上追加一条日志
pub(super) async fn insert_activity<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    log: NewActivityLog,
) -> Result<()> {
    let properties = log
        .properties
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| NazimError::serialization(format!("操作日志序列化失败: {e}")))?;

    ActiveModel {
        organization_id: Set(scope.organization_id),
        school_id: Set(Some(scope.school_id)),
        user_id: Set(log.user_id),
        event: Set(log.event.to_string()),
        subject_type: Set(log.subject_type.to_string()),
        subject_id: Set(log.subject_id),
        description: Set(log.description.clone()),
        properties: Set(properties),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| NazimError::database_operation(format!("写入操作日志失败: {e}")))?;

    tracing::info!(
        organization_id = scope.organization_id,
        school_id = scope.school_id,
        user_id = ?log.user_id,
        event = %log.event,
        subject_type = log.subject_type,
        subject_id = log.subject_id,
        "{}",
        log.description
    );
    Ok(())
}

#[async_trait::async_trait]
impl ActivityLogStorage for SeaOrmStorage {
    async fn record_activity(&self, scope: &TenantScope, log: NewActivityLog) -> Result<()> {
        insert_activity(&self.db, scope, log).await
    }

    async fn list_activity_logs(
        &self,
        scope: &TenantScope,
        params: &ActivityLogListParams,
    ) -> Result<ActivityLogListResponse> {
        let select = ActivityLogs::find()
            .filter(Column::OrganizationId.eq(scope.organization_id))
            .filter(Column::SchoolId.eq(scope.school_id))
            .apply_if(params.subject_type.as_deref(), |q, kind| {
                q.filter(Column::SubjectType.eq(kind))
            })
            .apply_if(params.subject_id, |q, id| q.filter(Column::SubjectId.eq(id)))
            .apply_if(params.event, |q, event| {
                q.filter(Column::Event.eq(event.as_str()))
            })
            .apply_if(params.user_id, |q, id| q.filter(Column::UserId.eq(id)))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| {
            m.into_activity_log()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity_logs::ActivityEvent;
    use crate::storage::sea_orm_storage::test_support::seed_school;

    fn entry(event: ActivityEvent, subject_id: i64) -> NewActivityLog {
        NewActivityLog {
            user_id: Some(7),
            event,
            subject_type: "fee_exceptions",
            subject_id,
            description: format!("{event} fee exception {subject_id}"),
            properties: Some(serde_json::json!({ "exception_amount": 250.0 })),
        }
    }

    #[tokio::test]
    async fn test_record_and_filter_activity() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "activity").await;
        let other = seed_school(&storage, "activity-other").await;

        storage
            .record_activity(&scope, entry(ActivityEvent::Created, 1))
            .await
            .unwrap();
        storage
            .record_activity(&scope, entry(ActivityEvent::Deleted, 1))
            .await
            .unwrap();
        storage
            .record_activity(&other, entry(ActivityEvent::Created, 2))
            .await
            .unwrap();

        let all = storage
            .list_activity_logs(&scope, &ActivityLogListParams::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
        assert!(all.items.iter().all(|log| log.school_id == Some(scope.school_id)));

        let params = ActivityLogListParams {
            event: Some(ActivityEvent::Deleted),
            ..Default::default()
        };
        let deleted = storage.list_activity_logs(&scope, &params).await.unwrap();
        assert_eq!(deleted.items.len(), 1);
        assert_eq!(deleted.items[0].user_id, Some(7));
        assert_eq!(
            deleted.items[0].properties,
            Some(serde_json::json!({ "exception_amount": 250.0 }))
        );
    }
}
