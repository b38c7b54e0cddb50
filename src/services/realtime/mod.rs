/*!
 * 实时变更推送
 *
 * 客户端通过 `ws://host/api/v1/realtime?token=<access_token>` 连接。
 * 每个组织一个广播通道，任何成功的写操作都会推送一条 `change` 消息，
 * 客户端据此刷新本地数据。
 *
 * ```json
 * {"type": "change", "event": {"table": "students", "action": "insert", "id": 12, "school_id": 3, "at": "..."}}
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use actix_ws::Message;
use dashmap::DashMap;
use serde::Deserialize;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::middlewares::require_tenant::resolve_organization;
use crate::models::realtime::{ChangeAction, ChangeEvent, ClientMessage, ServerMessage};
use crate::models::users::entities::User;
use crate::models::{ErrorCode, TenantScope};
use crate::services::{error_response, reject, storage_from_request};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

static CONNECTION_MANAGER: Lazy<ConnectionManager> =
    Lazy::new(|| ConnectionManager::new(AppConfig::get().realtime.channel_capacity));

/// 连接管理器
pub struct ConnectionManager {
    /// 组织 ID -> 广播发送器
    channels: DashMap<i64, broadcast::Sender<ServerMessage>>,
    capacity: usize,
}

impl ConnectionManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    pub fn subscribe(&self, organization_id: i64) -> broadcast::Receiver<ServerMessage> {
        self.channels
            .entry(organization_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 组织内已无订阅者时回收通道
    pub fn release(&self, organization_id: i64) {
        self.channels
            .remove_if(&organization_id, |_, tx| tx.receiver_count() == 0);
    }

    /// 推送变更，返回收到消息的连接数
    pub fn publish(&self, organization_id: i64, event: ChangeEvent) -> usize {
        match self.channels.get(&organization_id) {
            Some(tx) => tx.send(ServerMessage::Change { event }).unwrap_or(0),
            None => 0,
        }
    }

    pub fn online_count(&self, organization_id: i64) -> usize {
        self.channels
            .get(&organization_id)
            .map_or(0, |tx| tx.receiver_count())
    }
}

/// 写操作成功后推送变更
pub fn publish_change(
    organization_id: i64,
    school_id: Option<i64>,
    table: &str,
    action: ChangeAction,
    id: i64,
) {
    let event = ChangeEvent {
        table: table.to_string(),
        action,
        id,
        school_id,
        at: chrono::Utc::now(),
    };
    let delivered = ConnectionManager::get().publish(organization_id, event);
    debug!(
        "变更推送 {} {} #{} -> {} 个连接",
        table, action, id, delivered
    );
}

/// 学校级数据的变更推送
pub fn publish_school_change(scope: &TenantScope, table: &str, action: ChangeAction, id: i64) {
    publish_change(scope.organization_id, Some(scope.school_id), table, action, id);
}

fn encode(message: &ServerMessage) -> Option<String> {
    serde_json::to_string(message).ok()
}

/// 握手参数：浏览器 WebSocket 无法携带请求头，令牌放在查询串
#[derive(Debug, Deserialize)]
pub struct RealtimeQuery {
    pub token: String,
    /// 平台管理员需指定要订阅的组织
    pub organization_id: Option<i64>,
}

fn unauthorized(message: &str) -> actix_web::Error {
    reject(HttpResponse::Unauthorized, ErrorCode::Unauthorized, message)
}

/// 校验令牌并解析订阅的组织
fn subscription_organization(user: &User, requested: Option<i64>) -> ActixResult<i64> {
    let header = requested.map(|id| id.to_string());
    match resolve_organization(user, header.as_deref()) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(reject(
            HttpResponse::BadRequest,
            ErrorCode::OrganizationRequired,
            "organization_id is required",
        )),
        Err(failure) => Err(reject(
            || HttpResponse::build(failure.status),
            failure.code,
            &failure.message,
        )),
    }
}

/// 心跳时复查用户：已删除、被停用或换了组织的连接需要断开
///
/// 存储暂时不可用时保留连接，等下一次心跳再查。
async fn still_subscribed(storage: &dyn Storage, user_id: i64, organization_id: i64) -> bool {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => {
            subscription_organization(&user, Some(organization_id))
                .is_ok_and(|id| id == organization_id)
        }
        Ok(_) => false,
        Err(e) => {
            warn!("Realtime user check failed for user {}: {}", user_id, e);
            true
        }
    }
}

pub struct RealtimeService;

impl RealtimeService {
    /// 完成鉴权后升级为 WebSocket
    pub async fn connect(
        request: &HttpRequest,
        body: web::Payload,
        query: RealtimeQuery,
    ) -> ActixResult<HttpResponse> {
        let claims = JwtUtils::verify_access_token(&query.token).map_err(|e| {
            info!("Realtime token rejected: {}", e);
            unauthorized("Invalid access token")
        })?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| unauthorized("Invalid user ID in token"))?;

        let storage = storage_from_request(request)?;
        let user = match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) if user.is_active() => user,
            Ok(_) => return Err(unauthorized("User not found or inactive")),
            Err(e) => return Ok(error_response(&e)),
        };
        let organization_id = subscription_organization(&user, query.organization_id)?;

        let (response, session, stream) = actix_ws::handle(request, body)?;
        actix_web::rt::spawn(Self::handle_connection(
            storage,
            organization_id,
            user.id,
            session,
            stream,
        ));
        Ok(response)
    }

    pub async fn handle_connection(
        storage: Arc<dyn Storage>,
        organization_id: i64,
        user_id: i64,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        info!(
            "Realtime connected: user {} organization {}",
            user_id, organization_id
        );
        let manager = ConnectionManager::get();
        let mut rx = manager.subscribe(organization_id);

        if let Some(json) = encode(&ServerMessage::Connected {
            organization_id,
            user_id,
        }) {
            let _ = session.text(json).await;
        }

        let heartbeat_secs = AppConfig::get().realtime.heartbeat_secs.max(1);
        let mut heartbeat = tokio::time::interval(std::time::Duration::from_secs(heartbeat_secs));

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let reply = match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(ClientMessage::Ping) => ServerMessage::Pong,
                                Err(e) => ServerMessage::Error {
                                    message: format!("Unsupported message: {e}"),
                                },
                            };
                            if let Some(json) = encode(&reply)
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!("Realtime error for user {}: {:?}", user_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                msg = rx.recv() => {
                    match msg {
                        Ok(message) => {
                            if let Some(json) = encode(&message)
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Realtime connection of user {} lagged by {} messages", user_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if !still_subscribed(storage.as_ref(), user_id, organization_id).await {
                        info!("Realtime user {} is no longer allowed, closing", user_id);
                        if let Some(json) = encode(&ServerMessage::Error {
                            message: "User not found or inactive".to_string(),
                        }) {
                            let _ = session.text(json).await;
                        }
                        break;
                    }
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        manager.release(organization_id);
        let _ = session.close(None).await;
        info!("Realtime disconnected: user {}", user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(role: UserRole, organization_id: Option<i64>) -> User {
        User {
            id: 4,
            organization_id,
            default_school_id: None,
            username: "watcher".into(),
            email: "watcher@example.com".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: None,
            phone: None,
            avatar_url: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_subscription_organization() {
        let member = user(UserRole::Teacher, Some(2));
        assert_eq!(subscription_organization(&member, Some(9)).unwrap(), 2);

        let admin = user(UserRole::SuperAdmin, None);
        assert_eq!(subscription_organization(&admin, Some(9)).unwrap(), 9);
        assert!(subscription_organization(&admin, None).is_err());

        let orphan = user(UserRole::Staff, None);
        assert!(subscription_organization(&orphan, None).is_err());
    }

    fn event(id: i64) -> ChangeEvent {
        ChangeEvent {
            table: "students".into(),
            action: ChangeAction::Insert,
            id,
            school_id: Some(1),
            at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_only_same_organization() {
        let manager = ConnectionManager::new(8);
        let mut org1 = manager.subscribe(1);
        let mut org2 = manager.subscribe(2);

        assert_eq!(manager.publish(1, event(7)), 1);

        match org1.recv().await.unwrap() {
            ServerMessage::Change { event } => assert_eq!(event.id, 7),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(org2.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let manager = ConnectionManager::new(8);
        assert_eq!(manager.publish(9, event(1)), 0);
    }

    #[tokio::test]
    async fn test_deactivated_user_loses_subscription() {
        use crate::models::users::requests::UpdateUserRequest;
        use crate::storage::UserStorage;
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use crate::storage::sea_orm_storage::test_support::{seed_org, seed_user};

        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let org = seed_org(&storage, "realtime").await;
        let user_id = seed_user(&storage, "listener", org.organization_id).await;

        assert!(still_subscribed(&storage, user_id, org.organization_id).await);
        // 普通用户不能订阅别的组织
        assert!(!still_subscribed(&storage, user_id, org.organization_id + 1).await);
        assert!(!still_subscribed(&storage, user_id + 100, org.organization_id).await);

        storage
            .update_user(
                user_id,
                UpdateUserRequest {
                    status: Some(UserStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!still_subscribed(&storage, user_id, org.organization_id).await);
    }

    #[test]
    fn test_release_drops_idle_channel() {
        let manager = ConnectionManager::new(8);
        let rx = manager.subscribe(3);
        manager.release(3);
        assert_eq!(manager.online_count(3), 1);

        drop(rx);
        manager.release(3);
        assert_eq!(manager.online_count(3), 0);
        assert!(manager.channels.get(&3).is_none());
    }
}
