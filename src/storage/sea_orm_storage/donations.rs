//! 捐赠记录

use super::SeaOrmStorage;
use super::scoped::{
    delete_scoped, fetch_page, find_scoped, is_unique_violation, now, scoped, search_condition,
};
use crate::entity::donations::{self, Entity as Donations};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::donations::{
    CreateDonationRequest, Donation, DonationListParams, DonationListResponse,
    UpdateDonationRequest,
};
use crate::storage::DonationStorage;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, QueryOrder, QueryTrait, Set};

fn check_donation_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(NazimError::validation(
            "Donation amount must be greater than zero",
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl DonationStorage for SeaOrmStorage {
    async fn list_donations(
        &self,
        scope: &TenantScope,
        params: &DonationListParams,
    ) -> Result<DonationListResponse> {
        let select = scoped::<Donations>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[
                        donations::Column::DonorName,
                        donations::Column::DonorEmail,
                        donations::Column::DonorPhone,
                    ],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.purpose.clone(), |q, purpose| {
                q.filter(donations::Column::Purpose.eq(purpose))
            })
            .apply_if(params.donation_type, |q, kind| {
                q.filter(donations::Column::DonationType.eq(kind.as_str()))
            })
            .apply_if(params.date_from, |q, from| {
                q.filter(donations::Column::DonationDate.gte(from))
            })
            .apply_if(params.date_to, |q, to| {
                q.filter(donations::Column::DonationDate.lte(to))
            })
            .order_by_desc(donations::Column::DonationDate)
            .order_by_desc(donations::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_donation()).await
    }

    async fn list_all_donations(&self, scope: &TenantScope) -> Result<Vec<Donation>> {
        let rows = scoped::<Donations>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询捐赠失败: {e}")))?;
        Ok(rows.into_iter().map(|m| m.into_donation()).collect())
    }

    async fn get_donation(&self, scope: &TenantScope, id: i64) -> Result<Option<Donation>> {
        let result = find_scoped::<Donations, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_donation()))
    }

    async fn create_donation(
        &self,
        scope: &TenantScope,
        received_by: i64,
        req: CreateDonationRequest,
        transaction_id: String,
        donation_date: NaiveDate,
    ) -> Result<Donation> {
        check_donation_amount(req.amount)?;

        let now = now();
        let model = donations::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            donor_name: Set(req.donor_name),
            donor_email: Set(req.donor_email),
            donor_phone: Set(req.donor_phone),
            amount: Set(req.amount),
            donation_type: Set(req.donation_type.to_string()),
            purpose: Set(req.purpose),
            donation_date: Set(donation_date),
            transaction_id: Set(transaction_id.clone()),
            receipt_generated: Set(false),
            notes: Set(req.notes),
            received_by: Set(Some(received_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                NazimError::conflict(format!("Transaction id {transaction_id} already exists"))
            } else {
                NazimError::database_operation(format!("创建捐赠记录失败: {e}"))
            }
        })?;

        Ok(result.into_donation())
    }

    async fn update_donation(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateDonationRequest,
    ) -> Result<Option<Donation>> {
        if find_scoped::<Donations, _>(&self.db, scope, id)
            .await?
            .is_none()
        {
            return Ok(None);
        }
        if let Some(amount) = req.amount {
            check_donation_amount(amount)?;
        }

        let mut model = donations::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(donor_name) = req.donor_name {
            model.donor_name = Set(donor_name);
        }
        if let Some(donor_email) = req.donor_email {
            model.donor_email = Set(Some(donor_email));
        }
        if let Some(donor_phone) = req.donor_phone {
            model.donor_phone = Set(Some(donor_phone));
        }
        if let Some(amount) = req.amount {
            model.amount = Set(amount);
        }
        if let Some(kind) = req.donation_type {
            model.donation_type = Set(kind.to_string());
        }
        if let Some(purpose) = req.purpose {
            model.purpose = Set(Some(purpose));
        }
        if let Some(donation_date) = req.donation_date {
            model.donation_date = Set(donation_date);
        }
        if let Some(notes) = req.notes {
            model.notes = Set(Some(notes));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新捐赠记录失败: {e}")))?;

        Ok(Some(result.into_donation()))
    }

    async fn mark_receipt_generated(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<Donation>> {
        let Some(existing) = find_scoped::<Donations, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        if existing.receipt_generated {
            return Ok(Some(existing.into_donation()));
        }

        let model = donations::ActiveModel {
            id: Set(id),
            receipt_generated: Set(true),
            updated_at: Set(now()),
            ..Default::default()
        };
        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新捐赠记录失败: {e}")))?;

        Ok(Some(result.into_donation()))
    }

    async fn delete_donation(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Donations, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::donations::DonationType;
    use crate::storage::sea_orm_storage::test_support::seed_school;

    fn donation(donor: &str, amount: f64) -> CreateDonationRequest {
        CreateDonationRequest {
            donor_name: donor.to_string(),
            donor_email: None,
            donor_phone: Some("0300-1234567".to_string()),
            amount,
            donation_type: DonationType::Cash,
            purpose: Some("Library".to_string()),
            donation_date: None,
            transaction_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_donation_rules() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "donations").await;
        let day: NaiveDate = "2026-03-01".parse().unwrap();

        let err = storage
            .create_donation(&scope, 1, donation("Zero", 0.0), "DON-1".to_string(), day)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let created = storage
            .create_donation(&scope, 1, donation("Amina", 500.0), "DON-1".to_string(), day)
            .await
            .unwrap();
        assert!(!created.receipt_generated);

        let err = storage
            .create_donation(&scope, 1, donation("Bilal", 100.0), "DON-1".to_string(), day)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        let marked = storage
            .mark_receipt_generated(&scope, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(marked.receipt_generated);
        let again = storage
            .mark_receipt_generated(&scope, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(again.receipt_generated);

        let params = DonationListParams {
            pagination: PaginationQuery::default(),
            search: Some("ami".to_string()),
            purpose: None,
            donation_type: None,
            date_from: None,
            date_to: None,
        };
        let listed = storage.list_donations(&scope, &params).await.unwrap();
        assert_eq!(listed.pagination.total, 1);

        assert!(storage.delete_donation(&scope, created.id).await.unwrap());
        assert!(storage.get_donation(&scope, created.id).await.unwrap().is_none());
    }
}
