use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HostelService;
use crate::models::ApiResponse;
use crate::models::common::round2;
use crate::models::hostel::{HostelRoom, HostelStats};
use crate::services::{error_response, tenant_scope};

/// 入住率为百分比，保留两位小数
pub(crate) fn hostel_stats(rooms: &[HostelRoom]) -> HostelStats {
    let total_beds: i64 = rooms.iter().map(|r| r.capacity as i64).sum();
    let occupied_beds: i64 = rooms.iter().map(|r| r.occupied as i64).sum();
    let occupancy_rate = if total_beds > 0 {
        round2(occupied_beds as f64 * 100.0 / total_beds as f64)
    } else {
        0.0
    };

    HostelStats {
        total_rooms: rooms.len() as i64,
        full_rooms: rooms.iter().filter(|r| r.free_beds() == 0).count() as i64,
        total_beds,
        occupied_beds,
        free_beds: rooms.iter().map(|r| r.free_beds() as i64).sum(),
        occupancy_rate,
    }
}

impl HostelService {
    pub async fn hostel_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_all_hostel_rooms(&scope).await {
            Ok(rooms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                hostel_stats(&rooms),
                "Hostel statistics retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn room(capacity: i32, occupied: i32) -> HostelRoom {
        HostelRoom {
            id: 1,
            organization_id: 1,
            school_id: 1,
            hostel_name: "North".into(),
            room_number: "101".into(),
            floor: None,
            capacity,
            occupied,
            room_type: None,
            monthly_fee: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hostel_stats() {
        let stats = hostel_stats(&[room(4, 4), room(2, 1), room(2, 0)]);
        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.full_rooms, 1);
        assert_eq!(stats.total_beds, 8);
        assert_eq!(stats.occupied_beds, 5);
        assert_eq!(stats.free_beds, 3);
        assert_eq!(stats.occupancy_rate, 62.5);
    }

    #[test]
    fn test_hostel_stats_empty() {
        assert_eq!(hostel_stats(&[]), HostelStats::default());
    }
}
