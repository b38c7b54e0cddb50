//! 站内消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<i64>,
    /// 发件人已删除
    pub sender_deleted: bool,
    /// 收件人已删除
    pub recipient_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::communications::Message {
        use super::timestamp_to_datetime as ts;

        crate::models::communications::Message {
            id: self.id,
            organization_id: self.organization_id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            subject: self.subject,
            body: self.body,
            is_read: self.is_read,
            read_at: self.read_at.map(ts),
            created_at: ts(self.created_at),
        }
    }
}
