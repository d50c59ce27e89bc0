//! Transaction business logic - recording, reading and deleting transactions.
//!
//! Recording a transaction resolves the merchant and optional parent, checks the
//! merchant is active, derives the status through [`crate::core::chain`], inserts
//! the row and, for refunds and reversals, overwrites the parent's status. The
//! insert and the parent update share one store transaction, so a reader never
//! sees the child without the updated parent or the other way round.
//!
//! Parent links are resolved in memory from the fetched rows (one index per
//! read) instead of following `belongs_to_id` query by query. A parent that has
//! been deleted resolves to `None`.

use crate::{
    core::{
        chain,
        validation::{normalize_email, parse_amount, parse_external_id},
    },
    entities::{Merchant, Transaction, TransactionType, User, UserStatus, merchant, transaction},
    errors::{Error, Result},
    models::TransactionRequest,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A transaction together with its resolved parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTransaction {
    /// The stored row
    pub transaction: transaction::Model,
    /// The parent row, `None` for root transactions and dangling references
    pub belongs_to: Option<transaction::Model>,
}

/// A transaction with its parent and owning merchant attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// The stored row
    pub transaction: transaction::Model,
    /// The parent row, `None` for root transactions and dangling references
    pub belongs_to: Option<transaction::Model>,
    /// Merchant the transaction was recorded against
    pub merchant: merchant::Model,
}

/// Attaches each transaction's parent from within the same set, in one pass.
///
/// Parents outside the set (deleted or pruned) resolve to `None`.
pub fn link_parents(transactions: Vec<transaction::Model>) -> Vec<LinkedTransaction> {
    let parents: Vec<Option<transaction::Model>> = {
        let by_id: HashMap<i64, &transaction::Model> =
            transactions.iter().map(|t| (t.id, t)).collect();
        transactions
            .iter()
            .map(|t| {
                t.belongs_to_id
                    .and_then(|id| by_id.get(&id))
                    .map(|parent| (*parent).clone())
            })
            .collect()
    };

    transactions
        .into_iter()
        .zip(parents)
        .map(|(transaction, belongs_to)| LinkedTransaction {
            transaction,
            belongs_to,
        })
        .collect()
}

async fn find_by_external_id<C>(db: &C, external_id: Uuid) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::ExternalId.eq(external_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records a new transaction and applies its effect on the parent.
///
/// # Errors
/// * `InvalidEnumValue` - unknown type or status
/// * `Validation` - malformed uuid, customer email or amount
/// * `NotFound` - no merchant with that email, or no parent with that uuid
/// * `InactiveMerchant` - the merchant's user is not `ACTIVE`; nothing is stored
/// * `ChainViolation` - the type cannot reference the given parent
/// * `Duplicate` - the uuid is already recorded
#[instrument(skip_all, fields(uuid = %request.uuid, kind = %request.transaction_type))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    request: &TransactionRequest,
) -> Result<transaction::Model> {
    let kind: TransactionType = request.transaction_type.parse()?;
    let external_id = parse_external_id(&request.uuid)?;
    let parent_id = request
        .belongs_to_uuid
        .as_deref()
        .map(parse_external_id)
        .transpose()?;
    let merchant_email = request.merchant_email.trim().to_lowercase();

    // Use a transaction so the insert and the parent update commit together
    let txn = db.begin().await?;

    let merchant = Merchant::find()
        .filter(merchant::Column::Email.eq(merchant_email.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "merchant",
            key: merchant_email.clone(),
        })?;

    let parent = match parent_id {
        Some(id) => Some(
            find_by_external_id(&txn, id)
                .await?
                .ok_or_else(|| Error::NotFound {
                    entity: "transaction",
                    key: id.to_string(),
                })?,
        ),
        None => None,
    };

    let owner = User::find_by_id(merchant.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            key: merchant.user_id.to_string(),
        })?;
    if owner.status != UserStatus::Active {
        return Err(Error::InactiveMerchant {
            email: merchant.email,
        });
    }

    let status = chain::derive_status(kind, &request.status, parent.as_ref())?;

    // A dependent transaction inherits the financial identity of its parent
    let (amount, customer_email, customer_phone) = match &parent {
        Some(parent) => (
            parent.amount,
            parent.customer_email.clone(),
            parent.customer_phone.clone(),
        ),
        None => (
            parse_amount(request.amount)?,
            request.customer_email.clone(),
            request.customer_phone.clone(),
        ),
    };

    let now = chrono::Utc::now();
    let transaction_model = transaction::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        external_id: Set(external_id),
        transaction_type: Set(kind),
        amount: Set(amount),
        status: Set(status),
        customer_email: Set(normalize_email(&customer_email)?),
        customer_phone: Set(customer_phone),
        merchant_id: Set(merchant.user_id),
        belongs_to_id: Set(parent.as_ref().map(|p| p.id)),
        ..Default::default()
    };

    let created = transaction_model
        .insert(&txn)
        .await
        .map_err(|e| Error::from_insert(e, "transaction", &request.uuid))?;

    if let (Some(parent), Some(parent_status)) = (parent, chain::propagated_parent_status(kind)) {
        debug!(
            "Setting parent transaction {} to {}",
            parent.external_id, parent_status
        );
        let mut parent: transaction::ActiveModel = parent.into();
        parent.status = Set(parent_status);
        parent.updated_at = Set(now);
        parent.update(&txn).await?;
    }

    txn.commit().await?;

    info!(
        "Recorded {} transaction {} for {} with status {}",
        created.transaction_type, created.external_id, merchant.email, created.status
    );
    Ok(created)
}

/// Retrieves all transactions with merchant and parent attached, ordered by id.
pub async fn get_all_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionRecord>> {
    let rows = Transaction::find()
        .find_also_related(Merchant)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    let (transactions, merchants): (Vec<_>, Vec<_>) = rows.into_iter().unzip();

    link_parents(transactions)
        .into_iter()
        .zip(merchants)
        .map(|(linked, merchant)| {
            let merchant = merchant.ok_or_else(|| Error::NotFound {
                entity: "merchant",
                key: linked.transaction.merchant_id.to_string(),
            })?;
            Ok(TransactionRecord {
                transaction: linked.transaction,
                belongs_to: linked.belongs_to,
                merchant,
            })
        })
        .collect()
}

/// Looks up one transaction by its external id, with parent and merchant.
pub async fn get_transaction_by_external_id(
    db: &DatabaseConnection,
    external_id: &str,
) -> Result<TransactionRecord> {
    let id = parse_external_id(external_id)?;

    let (transaction, merchant) = Transaction::find()
        .filter(transaction::Column::ExternalId.eq(id))
        .find_also_related(Merchant)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "transaction",
            key: id.to_string(),
        })?;

    let merchant = merchant.ok_or_else(|| Error::NotFound {
        entity: "merchant",
        key: transaction.merchant_id.to_string(),
    })?;

    let belongs_to = match transaction.belongs_to_id {
        Some(parent_id) => Transaction::find_by_id(parent_id).one(db).await?,
        None => None,
    };

    Ok(TransactionRecord {
        transaction,
        belongs_to,
        merchant,
    })
}

/// Deletes a transaction by primary key.
///
/// Children referencing it are left untouched; their parent then reads as `None`.
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "transaction",
            key: transaction_id.to_string(),
        });
    }

    info!("Deleted transaction {}", transaction_id);
    Ok(())
}
