use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct HostelRoom {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub hostel_name: String,
    pub room_number: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub occupied: i32,
    pub room_type: Option<String>,
    pub monthly_fee: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl HostelRoom {
    pub fn free_beds(&self) -> i32 {
        (self.capacity - self.occupied).max(0)
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct HostelRoomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub hostel_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub available_only: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct CreateHostelRoomRequest {
    pub hostel_name: String,
    pub room_number: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub room_type: Option<String>,
    pub monthly_fee: Option<f64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct UpdateHostelRoomRequest {
    pub hostel_name: Option<String>,
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    pub capacity: Option<i32>,
    pub room_type: Option<String>,
    pub monthly_fee: Option<f64>,
}

string_enum! {
    #[ts(export, export_to = "hostel.ts")]
    pub enum AllocationStatus {
        Active => "active",
        CheckedOut => "checked_out",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct HostelAllocation {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub room_id: i64,
    pub student_id: i64,
    pub allocated_on: NaiveDate,
    pub checkout_on: Option<NaiveDate>,
    pub status: AllocationStatus,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct AllocateRoomRequest {
    pub room_id: i64,
    pub student_id: i64,
    pub allocated_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct CheckoutRequest {
    pub checkout_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct AllocationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub room_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<AllocationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "hostel.ts")]
pub struct HostelStats {
    pub total_rooms: i64,
    pub full_rooms: i64,
    pub total_beds: i64,
    pub occupied_beds: i64,
    pub free_beds: i64,
    pub occupancy_rate: f64,
}

pub type HostelRoomListResponse = PaginatedResponse<HostelRoom>;
pub type AllocationListResponse = PaginatedResponse<HostelAllocation>;
