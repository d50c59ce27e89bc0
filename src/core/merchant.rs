//! Merchant business logic - creating, reading, updating and deleting merchants.
//!
//! Every read attaches the backing user and the merchant's transactions and
//! recomputes the approved-charge total. Merchant emails are stored lower-cased
//! and compared that way.

use crate::{
    core::{
        aggregate::compute_total,
        currency::Currency,
        transaction::{LinkedTransaction, link_parents},
        user::create_user,
        validation::normalize_email,
    },
    entities::{Merchant, Transaction, User, UserRole, UserStatus, merchant, transaction, user},
    errors::{Error, Result},
    models::MerchantRequest,
};
use sea_orm::{LoaderTrait, QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A merchant with its user, transactions and computed total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantRecord {
    /// The stored merchant row
    pub merchant: merchant::Model,
    /// The backing user (carries role, status and timestamps)
    pub user: user::Model,
    /// All of the merchant's transactions, ordered by id, parents linked
    pub transactions: Vec<LinkedTransaction>,
    /// Sum of approved charges, recomputed on every read
    pub total_transaction_sum: Currency,
}

impl MerchantRecord {
    fn assemble(
        merchant: merchant::Model,
        user: user::Model,
        transactions: Vec<transaction::Model>,
    ) -> Self {
        let total_transaction_sum = compute_total(&transactions);
        Self {
            merchant,
            user,
            transactions: link_parents(transactions),
            total_transaction_sum,
        }
    }
}

struct ValidMerchant {
    name: String,
    description: String,
    email: String,
    status: UserStatus,
}

fn validate_request(request: &MerchantRequest) -> Result<ValidMerchant> {
    Ok(ValidMerchant {
        name: request.name.clone(),
        description: request.description.clone(),
        email: normalize_email(&request.email)?,
        status: request.status.parse()?,
    })
}

async fn insert_merchant<C>(db: &C, valid: ValidMerchant) -> Result<merchant::Model>
where
    C: ConnectionTrait,
{
    let user = create_user(db, UserRole::Merchant, valid.status).await?;
    let merchant = merchant::ActiveModel {
        user_id: Set(user.id),
        name: Set(valid.name),
        description: Set(valid.description),
        email: Set(valid.email.clone()),
    };

    merchant
        .insert(db)
        .await
        .map_err(|e| Error::from_insert(e, "merchant", &valid.email))
}

async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<merchant::Model>>
where
    C: ConnectionTrait,
{
    Merchant::find()
        .filter(merchant::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a merchant and its backing `MERCHANT` user in one store transaction.
///
/// # Errors
/// * `Validation` - malformed email
/// * `InvalidEnumValue` - unknown status
/// * `Duplicate` - another merchant already uses the email
#[instrument(skip_all, fields(email = %request.email))]
pub async fn create_merchant(
    db: &DatabaseConnection,
    request: &MerchantRequest,
) -> Result<merchant::Model> {
    let valid = validate_request(request)?;

    let txn = db.begin().await?;
    let merchant = insert_merchant(&txn, valid).await?;
    txn.commit().await?;

    info!("Created merchant {} ({})", merchant.email, merchant.user_id);
    Ok(merchant)
}

/// Creates a batch of merchants; either all of them are stored or none.
#[instrument(skip_all, fields(count = requests.len()))]
pub async fn create_merchants(
    db: &DatabaseConnection,
    requests: &[MerchantRequest],
) -> Result<Vec<merchant::Model>> {
    let valid = requests
        .iter()
        .map(validate_request)
        .collect::<Result<Vec<_>>>()?;

    let txn = db.begin().await?;
    let mut created = Vec::with_capacity(valid.len());
    for merchant in valid {
        created.push(insert_merchant(&txn, merchant).await?);
    }
    txn.commit().await?;

    info!("Created {} merchants", created.len());
    Ok(created)
}

async fn load_record(db: &DatabaseConnection, merchant: merchant::Model) -> Result<MerchantRecord> {
    let user = merchant
        .find_related(User)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            key: merchant.user_id.to_string(),
        })?;
    let transactions = merchant
        .find_related(Transaction)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    Ok(MerchantRecord::assemble(merchant, user, transactions))
}

/// Looks up a merchant by email, case-insensitively.
pub async fn get_merchant_by_email(db: &DatabaseConnection, email: &str) -> Result<MerchantRecord> {
    let merchant = find_by_email(db, email)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "merchant",
            key: email.to_string(),
        })?;

    load_record(db, merchant).await
}

/// Looks up a merchant by its user id.
pub async fn get_merchant_by_id(db: &DatabaseConnection, user_id: i64) -> Result<MerchantRecord> {
    let merchant = Merchant::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "merchant",
            key: user_id.to_string(),
        })?;

    load_record(db, merchant).await
}

/// Retrieves every merchant with user, transactions and total, ordered by id.
///
/// Users and transactions are batch-loaded, one query each, rather than per merchant.
pub async fn get_all_merchants(db: &DatabaseConnection) -> Result<Vec<MerchantRecord>> {
    let merchants = Merchant::find()
        .order_by_asc(merchant::Column::UserId)
        .all(db)
        .await?;
    let users = merchants.load_one(User, db).await?;
    let transactions = merchants.load_many(Transaction, db).await?;

    merchants
        .into_iter()
        .zip(users)
        .zip(transactions)
        .map(|((merchant, user), mut transactions)| -> Result<MerchantRecord> {
            let user = user.ok_or_else(|| Error::NotFound {
                entity: "user",
                key: merchant.user_id.to_string(),
            })?;
            transactions.sort_by_key(|t| t.id);
            Ok(MerchantRecord::assemble(merchant, user, transactions))
        })
        .collect()
}

/// Updates a merchant's profile and its user's status.
///
/// The merchant is found by the request's email. The user status and the
/// merchant's name, description and email are then written as two separate
/// updates inside one store transaction.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn update_merchant(db: &DatabaseConnection, request: &MerchantRequest) -> Result<()> {
    let valid = validate_request(request)?;

    let txn = db.begin().await?;

    let existing = find_by_email(&txn, &valid.email)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "merchant",
            key: valid.email.clone(),
        })?;

    let mut user: user::ActiveModel = User::find_by_id(existing.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            key: existing.user_id.to_string(),
        })?
        .into();
    user.status = Set(valid.status);
    user.updated_at = Set(chrono::Utc::now());
    user.update(&txn).await?;

    let mut merchant: merchant::ActiveModel = existing.into();
    merchant.name = Set(valid.name);
    merchant.description = Set(valid.description);
    merchant.email = Set(valid.email);
    let merchant = merchant.update(&txn).await?;

    txn.commit().await?;

    info!("Updated merchant {}", merchant.email);
    Ok(())
}

/// Deletes the merchant with the given email.
///
/// The backing user row is kept.
///
/// # Errors
/// * `NotFound` - no merchant has that email
/// * `ReferentialConflict` - transactions still reference the merchant
#[instrument(skip(db))]
pub async fn delete_merchant(db: &DatabaseConnection, email: &str) -> Result<()> {
    let email = email.trim().to_lowercase();

    let result = Merchant::delete_many()
        .filter(merchant::Column::Email.eq(email.as_str()))
        .exec(db)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Error::ReferentialConflict {
                entity: "merchant",
                key: email.clone(),
            },
            _ => Error::Store(err),
        })?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "merchant",
            key: email,
        });
    }

    info!("Deleted merchant {}", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::transaction::{create_transaction, delete_transaction};
    use crate::entities::TransactionType;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_merchant_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let merchant =
            create_merchant(&db, &merchant_request("Shop", "Shop@Example.com", "ACTIVE")).await?;
        assert_eq!(merchant.email, "shop@example.com");
        assert_eq!(merchant.name, "Shop");

        let record = get_merchant_by_id(&db, merchant.user_id).await?;
        assert_eq!(record.user.id, merchant.user_id);
        assert_eq!(record.user.role, UserRole::Merchant);
        assert_eq!(record.user.status, UserStatus::Active);
        assert!(record.transactions.is_empty());
        assert_eq!(record.total_transaction_sum, Currency::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_merchant_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_merchant(&db, &merchant_request("Shop", "not-mail", "ACTIVE")).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result =
            create_merchant(&db, &merchant_request("Shop", "shop@example.com", "active")).await;
        assert!(matches!(result, Err(Error::InvalidEnumValue { .. })));

        assert!(get_all_merchants(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_case_insensitively() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_merchant(&db, "shop@example.com").await?;

        let result =
            create_merchant(&db, &merchant_request("Other", "SHOP@example.com", "ACTIVE")).await;
        assert!(matches!(result, Err(Error::Duplicate { .. })));

        // The user created for the rejected merchant was rolled back too
        assert_eq!(crate::core::user::get_all_users(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_merchants_is_all_or_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_merchants(
            &db,
            &[
                merchant_request("A", "a@example.com", "ACTIVE"),
                merchant_request("B", "b@example.com", "INACTIVE"),
            ],
        )
        .await?;
        assert_eq!(created.len(), 2);

        let result = create_merchants(
            &db,
            &[
                merchant_request("C", "c@example.com", "ACTIVE"),
                merchant_request("A again", "a@example.com", "ACTIVE"),
            ],
        )
        .await;
        assert!(matches!(result, Err(Error::Duplicate { .. })));

        let all = get_all_merchants(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].user.status, UserStatus::Inactive);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_merchant_by_email_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_merchant_by_email(&db, "missing@example.com").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_merchant_reads_compute_total() -> Result<()> {
        let (db, merchant) = setup_with_merchant().await?;
        let other = create_test_merchant(&db, "other@example.com").await?;

        let first = create_test_authorization(&db, &merchant.email, 5.0).await?;
        let second = create_test_authorization(&db, &merchant.email, 3.0).await?;
        create_transaction(
            &db,
            &dependent_request(
                TransactionType::Charge,
                &merchant.email,
                &first.external_id.to_string(),
            ),
        )
        .await?;
        let mut failed = dependent_request(
            TransactionType::Charge,
            &merchant.email,
            &second.external_id.to_string(),
        );
        failed.status = "ERROR".to_string();
        create_transaction(&db, &failed).await?;
        create_test_authorization(&db, &other.email, 9.0).await?;

        let record = get_merchant_by_email(&db, "MERCHANT@example.com").await?;
        assert_eq!(record.transactions.len(), 4);
        assert_eq!(record.total_transaction_sum, Currency::from_minor_units(500));
        assert_eq!(
            record.transactions[2].belongs_to.as_ref().map(|p| p.id),
            Some(first.id)
        );

        let all = get_all_merchants(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], record);
        assert_eq!(all[1].transactions.len(), 1);
        assert_eq!(all[1].total_transaction_sum, Currency::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_merchant_updates_profile_and_user_status() -> Result<()> {
        let (db, merchant) = setup_with_merchant().await?;

        update_merchant(
            &db,
            &merchant_request("Renamed", "Merchant@Example.com", "INACTIVE"),
        )
        .await?;

        let record = get_merchant_by_email(&db, &merchant.email).await?;
        assert_eq!(record.merchant.name, "Renamed");
        assert_eq!(record.merchant.description, "Renamed description");
        assert_eq!(record.user.status, UserStatus::Inactive);

        // Deactivation now blocks new transactions
        let result = create_transaction(&db, &authorize_request(&merchant.email, 1.0)).await;
        assert!(matches!(result, Err(Error::InactiveMerchant { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_merchant() -> Result<()> {
        let db = setup_test_db().await?;
        let result =
            update_merchant(&db, &merchant_request("X", "ghost@example.com", "ACTIVE")).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_merchant_blocked_by_transactions() -> Result<()> {
        let (db, merchant) = setup_with_merchant().await?;
        let authorize = create_test_authorization(&db, &merchant.email, 10.0).await?;

        let result = delete_merchant(&db, &merchant.email).await;
        assert!(matches!(result, Err(Error::ReferentialConflict { .. })));
        assert!(get_merchant_by_email(&db, &merchant.email).await.is_ok());

        delete_transaction(&db, authorize.id).await?;
        delete_merchant(&db, &merchant.email).await?;

        let result = get_merchant_by_email(&db, &merchant.email).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_merchant() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_merchant(&db, "ghost@example.com").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }
}
