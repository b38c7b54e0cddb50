//! 捐赠实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: f64,
    pub donation_type: String,
    pub purpose: Option<String>,
    pub donation_date: Date,
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub receipt_generated: bool,
    pub notes: Option<String>,
    pub received_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_donation(self) -> crate::models::donations::Donation {
        use super::timestamp_to_datetime as ts;
        use crate::models::donations::{Donation, DonationType};

        Donation {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            donor_name: self.donor_name,
            donor_email: self.donor_email,
            donor_phone: self.donor_phone,
            amount: self.amount,
            donation_type: self.donation_type.parse().unwrap_or(DonationType::Cash),
            purpose: self.purpose,
            donation_date: self.donation_date,
            transaction_id: self.transaction_id,
            receipt_generated: self.receipt_generated,
            notes: self.notes,
            received_by: self.received_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
