//! 实时变更推送消息

use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    #[ts(export, export_to = "realtime.ts")]
    pub enum ChangeAction {
        Insert => "insert",
        Update => "update",
        Delete => "delete",
    }
}

/// 一次成功写操作对应的变更通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "realtime.ts")]
pub struct ChangeEvent {
    pub table: String,
    pub action: ChangeAction,
    pub id: i64,
    pub school_id: Option<i64>,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// 服务端 → 客户端消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "realtime.ts")]
pub enum ServerMessage {
    Connected { organization_id: i64, user_id: i64 },
    Change { event: ChangeEvent },
    Pong,
    Error { message: String },
}

/// 客户端 → 服务端消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "realtime.ts")]
pub enum ClientMessage {
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_tagging() {
        let json = serde_json::to_value(ServerMessage::Pong).unwrap();
        assert_eq!(json["type"], "pong");

        let json = serde_json::to_value(ServerMessage::Error {
            message: "bad".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "bad");
    }

    #[test]
    fn test_client_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }
}
