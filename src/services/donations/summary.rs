use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use super::DonationService;
use crate::models::ApiResponse;
use crate::models::common::round2;
use crate::models::donations::{AmountBucket, Donation, DonationSummary, DonationType};
use crate::services::{error_response, tenant_scope, today};

const NO_PURPOSE: &str = "general";

fn sorted_buckets(groups: HashMap<String, (i64, f64)>) -> Vec<AmountBucket> {
    let mut buckets: Vec<AmountBucket> = groups
        .into_iter()
        .map(|(key, (count, amount))| AmountBucket {
            key,
            count,
            amount: round2(amount),
        })
        .collect();
    buckets.sort_by(|a, b| b.amount.total_cmp(&a.amount).then(a.key.cmp(&b.key)));
    buckets
}

/// 按类型（全部类型都列出）和用途汇总，金额降序
pub(crate) fn summarize(donations: &[Donation], today: NaiveDate) -> DonationSummary {
    let mut by_type: HashMap<String, (i64, f64)> = DonationType::ALL
        .iter()
        .map(|t| (t.to_string(), (0, 0.0)))
        .collect();
    let mut by_purpose: HashMap<String, (i64, f64)> = HashMap::new();
    let mut this_month = 0.0;

    for d in donations {
        let entry = by_type.entry(d.donation_type.to_string()).or_default();
        entry.0 += 1;
        entry.1 += d.amount;

        let purpose = d
            .purpose
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(NO_PURPOSE);
        let entry = by_purpose.entry(purpose.to_string()).or_default();
        entry.0 += 1;
        entry.1 += d.amount;

        if d.donation_date.year() == today.year() && d.donation_date.month() == today.month() {
            this_month += d.amount;
        }
    }

    DonationSummary {
        total_amount: round2(donations.iter().map(|d| d.amount).sum()),
        total_count: donations.len() as i64,
        this_month_amount: round2(this_month),
        by_type: sorted_buckets(by_type),
        by_purpose: sorted_buckets(by_purpose),
    }
}

impl DonationService {
    pub async fn donation_summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_all_donations(&scope).await {
            Ok(donations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                summarize(&donations, today()),
                "Donation summary retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn donation(amount: f64, kind: DonationType, purpose: Option<&str>, on: NaiveDate) -> Donation {
        Donation {
            id: 1,
            organization_id: 1,
            school_id: 1,
            donor_name: "Donor".into(),
            donor_email: None,
            donor_phone: None,
            amount,
            donation_type: kind,
            purpose: purpose.map(str::to_string),
            donation_date: on,
            transaction_id: "DON-20260301-AAAAAA".into(),
            receipt_generated: false,
            notes: None,
            received_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let last_month = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let donations = vec![
            donation(500.0, DonationType::Cash, Some("Library"), today),
            donation(250.0, DonationType::Online, None, last_month),
            donation(100.0, DonationType::Cash, Some(" "), today),
        ];

        let summary = summarize(&donations, today);
        assert_eq!(summary.total_amount, 850.0);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.this_month_amount, 600.0);

        assert_eq!(summary.by_type.len(), DonationType::ALL.len());
        assert_eq!(
            summary.by_type[0],
            AmountBucket {
                key: "cash".into(),
                count: 2,
                amount: 600.0,
            }
        );
        assert_eq!(summary.by_type.last().map(|b| b.amount), Some(0.0));

        let purposes: Vec<_> = summary
            .by_purpose
            .iter()
            .map(|b| (b.key.as_str(), b.amount))
            .collect();
        assert_eq!(purposes, vec![("Library", 500.0), ("general", 350.0)]);
    }
}
