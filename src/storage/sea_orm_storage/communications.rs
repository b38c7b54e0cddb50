//! 公告、活动与站内消息

use super::SeaOrmStorage;
use super::scoped::{delete_scoped, fetch_page, find_scoped, now, scoped};
use crate::entity::announcements::{self, Entity as Announcements};
use crate::entity::events::{self, Entity as Events};
use crate::entity::messages::{self, Entity as Messages};
use crate::entity::users::{self, Entity as Users};
use crate::errors::{NazimError, Result};
use crate::models::communications::{
    Announcement, AnnouncementListParams, AnnouncementListResponse, CreateAnnouncementRequest,
    CreateEventRequest, Event, EventListParams, EventListResponse, EventStatus, Message,
    MessageFolder, MessageListParams, MessageListResponse, Priority, SendMessageRequest,
    UpdateAnnouncementRequest, UpdateEventRequest,
};
use crate::models::{OrgScope, TenantScope};
use crate::storage::CommunicationStorage;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait, Select, Set,
};

fn check_expiry(publish_date: NaiveDate, expires_on: Option<NaiveDate>) -> Result<()> {
    if let Some(expires_on) = expires_on
        && expires_on < publish_date
    {
        return Err(NazimError::validation(
            "Expiry date must not be before the publish date",
        ));
    }
    Ok(())
}

fn check_event_window(start: i64, end: i64) -> Result<()> {
    if start >= end {
        return Err(NazimError::validation("Event start time must be before its end time"));
    }
    Ok(())
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// 当前用户可见的消息：组织内且自己未删除
fn visible_messages(scope: &OrgScope, user_id: i64) -> Select<Messages> {
    Messages::find()
        .filter(messages::Column::OrganizationId.eq(scope.organization_id))
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(messages::Column::RecipientId.eq(user_id))
                        .add(messages::Column::RecipientDeleted.eq(false)),
                )
                .add(
                    Condition::all()
                        .add(messages::Column::SenderId.eq(user_id))
                        .add(messages::Column::SenderDeleted.eq(false)),
                ),
        )
}

#[async_trait::async_trait]
impl CommunicationStorage for SeaOrmStorage {
    async fn list_announcements(
        &self,
        scope: &TenantScope,
        params: &AnnouncementListParams,
        today: NaiveDate,
    ) -> Result<AnnouncementListResponse> {
        let select = scoped::<Announcements>(scope)
            .apply_if(params.priority, |q, priority| {
                q.filter(announcements::Column::Priority.eq(priority.as_str()))
            })
            .apply_if(params.active.filter(|active| *active), |q, _| {
                q.filter(
                    Condition::any()
                        .add(announcements::Column::ExpiresOn.is_null())
                        .add(announcements::Column::ExpiresOn.gte(today)),
                )
            })
            .order_by_desc(announcements::Column::PublishDate)
            .order_by_desc(announcements::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| {
            m.into_announcement()
        })
        .await
    }

    async fn create_announcement(
        &self,
        scope: &TenantScope,
        published_by: i64,
        req: CreateAnnouncementRequest,
        publish_date: NaiveDate,
    ) -> Result<Announcement> {
        let publish_date = req.publish_date.unwrap_or(publish_date);
        check_expiry(publish_date, req.expires_on)?;
        let audience = serde_json::to_string(&req.target_audience)?;

        let now = now();
        let model = announcements::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            title: Set(req.title),
            content: Set(req.content),
            priority: Set(req.priority.unwrap_or(Priority::Normal).to_string()),
            target_audience: Set(audience),
            publish_date: Set(publish_date),
            expires_on: Set(req.expires_on),
            published_by: Set(Some(published_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    async fn update_announcement(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        let Some(existing) = find_scoped::<Announcements, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        check_expiry(
            req.publish_date.unwrap_or(existing.publish_date),
            req.expires_on.or(existing.expires_on),
        )?;

        let mut model = announcements::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(content) = req.content {
            model.content = Set(content);
        }
        if let Some(priority) = req.priority {
            model.priority = Set(priority.to_string());
        }
        if let Some(audience) = req.target_audience {
            model.target_audience = Set(serde_json::to_string(&audience)?);
        }
        if let Some(publish_date) = req.publish_date {
            model.publish_date = Set(publish_date);
        }
        if let Some(expires_on) = req.expires_on {
            model.expires_on = Set(Some(expires_on));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(Some(result.into_announcement()))
    }

    async fn delete_announcement(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Announcements, _>(&self.db, scope, id).await
    }

    async fn list_events(
        &self,
        scope: &TenantScope,
        params: &EventListParams,
    ) -> Result<EventListResponse> {
        let select = scoped::<Events>(scope)
            .apply_if(params.category.clone(), |q, category| {
                q.filter(events::Column::Category.eq(category))
            })
            .apply_if(params.status, |q, status| {
                q.filter(events::Column::Status.eq(status.as_str()))
            })
            .apply_if(params.date_from, |q, from| {
                q.filter(events::Column::StartTime.gte(day_start(from)))
            })
            .apply_if(params.date_to.and_then(|d| d.succ_opt()), |q, next| {
                q.filter(events::Column::StartTime.lt(day_start(next)))
            })
            .order_by_asc(events::Column::StartTime)
            .order_by_asc(events::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_event()).await
    }

    async fn get_event(&self, scope: &TenantScope, id: i64) -> Result<Option<Event>> {
        let result = find_scoped::<Events, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_event()))
    }

    async fn create_event(
        &self,
        scope: &TenantScope,
        created_by: i64,
        req: CreateEventRequest,
    ) -> Result<Event> {
        let start = req.start_time.timestamp();
        let end = req.end_time.timestamp();
        check_event_window(start, end)?;

        let now = now();
        let model = events::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            title: Set(req.title),
            description: Set(req.description),
            category: Set(req.category),
            location: Set(req.location),
            start_time: Set(start),
            end_time: Set(end),
            status: Set(EventStatus::Scheduled.to_string()),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建活动失败: {e}")))?;

        Ok(result.into_event())
    }

    async fn update_event(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateEventRequest,
    ) -> Result<Option<Event>> {
        let Some(existing) = find_scoped::<Events, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };

        let start = req
            .start_time
            .map(|t| t.timestamp())
            .unwrap_or(existing.start_time);
        let end = req
            .end_time
            .map(|t| t.timestamp())
            .unwrap_or(existing.end_time);
        check_event_window(start, end)?;

        if let Some(next) = req.status {
            let current: EventStatus = existing.status.parse().unwrap_or(EventStatus::Scheduled);
            if !current.can_transition_to(next) {
                return Err(NazimError::validation(format!(
                    "Cannot change event status from {current} to {next}"
                )));
            }
        }

        let mut model = events::ActiveModel {
            id: Set(id),
            start_time: Set(start),
            end_time: Set(end),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(category) = req.category {
            model.category = Set(Some(category));
        }
        if let Some(location) = req.location {
            model.location = Set(Some(location));
        }
        if let Some(status) = req.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新活动失败: {e}")))?;

        Ok(Some(result.into_event()))
    }

    async fn delete_event(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Events, _>(&self.db, scope, id).await
    }

    async fn send_message(
        &self,
        scope: &OrgScope,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<Message> {
        if req.subject.trim().is_empty() || req.body.trim().is_empty() {
            return Err(NazimError::validation("Message subject and body are required"));
        }

        let recipient = Users::find_by_id(req.recipient_id)
            .filter(users::Column::OrganizationId.eq(scope.organization_id))
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询用户失败: {e}")))?;
        if recipient.is_none() {
            return Err(NazimError::validation(format!(
                "User {} does not belong to this organization",
                req.recipient_id
            )));
        }

        let now = now();
        let model = messages::ActiveModel {
            organization_id: Set(scope.organization_id),
            sender_id: Set(sender_id),
            recipient_id: Set(req.recipient_id),
            subject: Set(req.subject),
            body: Set(req.body),
            is_read: Set(false),
            read_at: Set(None),
            sender_deleted: Set(false),
            recipient_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("发送消息失败: {e}")))?;

        Ok(result.into_message())
    }

    async fn list_messages(
        &self,
        scope: &OrgScope,
        user_id: i64,
        params: &MessageListParams,
    ) -> Result<MessageListResponse> {
        let base = Messages::find().filter(messages::Column::OrganizationId.eq(scope.organization_id));
        let select = match params.folder.unwrap_or(MessageFolder::Inbox) {
            MessageFolder::Inbox => base
                .filter(messages::Column::RecipientId.eq(user_id))
                .filter(messages::Column::RecipientDeleted.eq(false))
                .apply_if(params.unread_only.filter(|only| *only), |q, _| {
                    q.filter(messages::Column::IsRead.eq(false))
                }),
            MessageFolder::Sent => base
                .filter(messages::Column::SenderId.eq(user_id))
                .filter(messages::Column::SenderDeleted.eq(false)),
        }
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_message()).await
    }

    async fn mark_message_read(
        &self,
        scope: &OrgScope,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Message>> {
        let message = Messages::find_by_id(id)
            .filter(messages::Column::OrganizationId.eq(scope.organization_id))
            .filter(messages::Column::RecipientId.eq(user_id))
            .filter(messages::Column::RecipientDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询消息失败: {e}")))?;
        let Some(message) = message else {
            return Ok(None);
        };
        if message.is_read {
            return Ok(Some(message.into_message()));
        }

        let now = now();
        let model = messages::ActiveModel {
            id: Set(id),
            is_read: Set(true),
            read_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新消息失败: {e}")))?;

        Ok(Some(result.into_message()))
    }

    async fn count_unread_messages(&self, scope: &OrgScope, user_id: i64) -> Result<i64> {
        let count = Messages::find()
            .filter(messages::Column::OrganizationId.eq(scope.organization_id))
            .filter(messages::Column::RecipientId.eq(user_id))
            .filter(messages::Column::RecipientDeleted.eq(false))
            .filter(messages::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("统计未读消息失败: {e}")))?;
        Ok(count as i64)
    }

    async fn delete_message(&self, scope: &OrgScope, user_id: i64, id: i64) -> Result<bool> {
        let Some(message) = visible_messages(scope, user_id)
            .filter(messages::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询消息失败: {e}")))?
        else {
            return Ok(false);
        };

        let sender_deleted = message.sender_deleted || message.sender_id == user_id;
        let recipient_deleted = message.recipient_deleted || message.recipient_id == user_id;

        // 双方都删除后物理删除
        if sender_deleted && recipient_deleted {
            Messages::delete_by_id(id)
                .exec(&self.db)
                .await
                .map_err(|e| NazimError::database_operation(format!("删除消息失败: {e}")))?;
            return Ok(true);
        }

        let model = messages::ActiveModel {
            id: Set(id),
            sender_deleted: Set(sender_deleted),
            recipient_deleted: Set(recipient_deleted),
            updated_at: Set(now()),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("删除消息失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::storage::sea_orm_storage::test_support::{seed_org, seed_school, seed_user};
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn inbox(unread_only: bool) -> MessageListParams {
        MessageListParams {
            pagination: PaginationQuery::default(),
            folder: Some(MessageFolder::Inbox),
            unread_only: Some(unread_only),
        }
    }

    #[tokio::test]
    async fn test_announcement_expiry_filter() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "notices").await;

        for (title, expires) in [("Old", Some("2026-02-01")), ("Open", None)] {
            storage
                .create_announcement(
                    &scope,
                    1,
                    CreateAnnouncementRequest {
                        title: title.to_string(),
                        content: "Body".to_string(),
                        priority: None,
                        target_audience: vec!["teachers".to_string()],
                        publish_date: Some(date("2026-01-15")),
                        expires_on: expires.map(date),
                    },
                    date("2026-01-15"),
                )
                .await
                .unwrap();
        }

        let params = AnnouncementListParams {
            pagination: PaginationQuery::default(),
            priority: None,
            active: Some(true),
        };
        let active = storage
            .list_announcements(&scope, &params, date("2026-03-01"))
            .await
            .unwrap();
        assert_eq!(active.pagination.total, 1);
        assert_eq!(active.items[0].title, "Open");
        assert_eq!(active.items[0].target_audience, vec!["teachers".to_string()]);
        assert_eq!(active.items[0].priority, Priority::Normal);
    }

    #[tokio::test]
    async fn test_event_window_and_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "events").await;
        let start = chrono::Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let end = chrono::Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let err = storage
            .create_event(
                &scope,
                1,
                CreateEventRequest {
                    title: "Backwards".to_string(),
                    description: None,
                    category: None,
                    location: None,
                    start_time: end,
                    end_time: start,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let event = storage
            .create_event(
                &scope,
                1,
                CreateEventRequest {
                    title: "Sports day".to_string(),
                    description: None,
                    category: Some("sports".to_string()),
                    location: None,
                    start_time: start,
                    end_time: end,
                },
            )
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::Scheduled);

        let params = EventListParams {
            pagination: PaginationQuery::default(),
            category: None,
            status: None,
            date_from: Some(date("2026-05-01")),
            date_to: Some(date("2026-05-01")),
        };
        assert_eq!(storage.list_events(&scope, &params).await.unwrap().pagination.total, 1);

        let completed = UpdateEventRequest {
            status: Some(EventStatus::Completed),
            ..Default::default()
        };
        storage.update_event(&scope, event.id, completed).await.unwrap();

        let reopen = UpdateEventRequest {
            status: Some(EventStatus::Scheduled),
            ..Default::default()
        };
        assert!(storage.update_event(&scope, event.id, reopen).await.is_err());
    }

    #[tokio::test]
    async fn test_messages_between_users() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let org = seed_org(&storage, "messaging").await;
        let other_org = seed_org(&storage, "elsewhere").await;
        let alice = seed_user(&storage, "alice", org.organization_id).await;
        let bob = seed_user(&storage, "bob", org.organization_id).await;
        let outsider = seed_user(&storage, "carol", other_org.organization_id).await;

        let send = |recipient_id| SendMessageRequest {
            recipient_id,
            subject: "Staff meeting".to_string(),
            body: "Friday at 2pm".to_string(),
        };

        assert!(storage.send_message(&org, alice, send(outsider)).await.is_err());

        let message = storage.send_message(&org, alice, send(bob)).await.unwrap();
        assert_eq!(storage.count_unread_messages(&org, bob).await.unwrap(), 1);
        assert_eq!(
            storage.list_messages(&org, bob, &inbox(true)).await.unwrap().pagination.total,
            1
        );

        // 只有收件人能标记已读
        assert!(storage
            .mark_message_read(&org, alice, message.id)
            .await
            .unwrap()
            .is_none());
        let read = storage
            .mark_message_read(&org, bob, message.id)
            .await
            .unwrap()
            .unwrap();
        assert!(read.is_read);
        assert!(read.read_at.is_some());
        assert_eq!(storage.count_unread_messages(&org, bob).await.unwrap(), 0);

        // 收件人删除后发件人仍能在已发送中看到
        assert!(storage.delete_message(&org, bob, message.id).await.unwrap());
        assert_eq!(
            storage.list_messages(&org, bob, &inbox(false)).await.unwrap().pagination.total,
            0
        );
        let sent = MessageListParams {
            pagination: PaginationQuery::default(),
            folder: Some(MessageFolder::Sent),
            unread_only: None,
        };
        assert_eq!(
            storage.list_messages(&org, alice, &sent).await.unwrap().pagination.total,
            1
        );
        assert!(!storage.delete_message(&org, bob, message.id).await.unwrap());
    }
}
