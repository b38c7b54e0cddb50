use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "donation.ts")]
    pub enum DonationType {
        Cash => "cash",
        Online => "online",
        Cheque => "cheque",
        InKind => "in_kind",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct Donation {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: f64,
    pub donation_type: DonationType,
    pub purpose: Option<String>,
    pub donation_date: NaiveDate,
    /// DON-yyyymmdd-XXXXXX
    pub transaction_id: String,
    pub receipt_generated: bool,
    pub notes: Option<String>,
    pub received_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct DonationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 按捐赠人姓名、邮箱、电话搜索
    pub search: Option<String>,
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub donation_type: Option<DonationType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct CreateDonationRequest {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: f64,
    pub donation_type: DonationType,
    pub purpose: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct UpdateDonationRequest {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Option<f64>,
    pub donation_type: Option<DonationType>,
    pub purpose: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct AmountBucket {
    pub key: String,
    pub count: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "donation.ts")]
pub struct DonationSummary {
    pub total_amount: f64,
    pub total_count: i64,
    pub this_month_amount: f64,
    pub by_type: Vec<AmountBucket>,
    pub by_purpose: Vec<AmountBucket>,
}

pub type DonationListResponse = PaginatedResponse<Donation>;
