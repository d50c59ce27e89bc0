//! Request and view shapes exchanged with the request and import layers.
//!
//! Requests carry raw field values (enum names as strings, amounts as floats);
//! the core validates them. Views flatten stored records back to the same
//! representation.

use crate::core::{merchant::MerchantRecord, transaction::TransactionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields for creating an administrative user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    /// `MERCHANT` or `ADMIN`
    pub role: String,
    /// `ACTIVE` or `INACTIVE`
    pub status: String,
}

/// Fields for creating or updating a merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantRequest {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Identifies the merchant on update; compared case-insensitively
    pub email: String,
    /// Status of the backing user, `ACTIVE` or `INACTIVE`
    pub status: String,
}

/// Fields for recording a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Caller-chosen external id
    pub uuid: String,
    /// External id of the transaction this one acts on
    #[serde(default)]
    pub belongs_to_uuid: Option<String>,
    /// `AUTHORIZE`, `CHARGE`, `REFUND` or `REVERSAL`
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Requested status; overridden with `ERROR` when the parent is not approved
    pub status: String,
    /// Major units; ignored when a parent is given
    pub amount: f64,
    /// Merchant the transaction is recorded against
    pub merchant_email: String,
    /// Ignored when a parent is given
    pub customer_email: String,
    /// Ignored when a parent is given
    pub customer_phone: String,
}

/// Flattened merchant with its computed total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantView {
    /// When the backing user was created
    pub created_at: DateTime<Utc>,
    /// When the backing user was last modified
    pub updated_at: DateTime<Utc>,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Lower-cased email
    pub email: String,
    /// Status of the backing user
    pub status: String,
    /// Sum of approved charges in major units
    pub total_transaction_sum: f64,
}

impl From<&MerchantRecord> for MerchantView {
    fn from(record: &MerchantRecord) -> Self {
        Self {
            created_at: record.user.created_at,
            updated_at: record.user.updated_at,
            name: record.merchant.name.clone(),
            description: record.merchant.description.clone(),
            email: record.merchant.email.clone(),
            status: record.user.status.to_string(),
            total_transaction_sum: record.total_transaction_sum.to_float(),
        }
    }
}

/// Flattened transaction with merchant email and parent external id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
    /// External id
    pub uuid: String,
    /// `None` for root transactions and for parents that no longer exist
    pub belongs_to_uuid: Option<String>,
    /// Transaction type name
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Current status name
    pub status: String,
    /// Amount in major units
    pub amount: f64,
    /// Email of the owning merchant
    pub merchant_email: String,
    /// Lower-cased customer email
    pub customer_email: String,
    /// Customer phone as supplied
    pub customer_phone: String,
}

impl From<&TransactionRecord> for TransactionView {
    fn from(record: &TransactionRecord) -> Self {
        let transaction = &record.transaction;
        Self {
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
            uuid: transaction.external_id.to_string(),
            belongs_to_uuid: record
                .belongs_to
                .as_ref()
                .map(|parent| parent.external_id.to_string()),
            transaction_type: transaction.transaction_type.to_string(),
            status: transaction.status.to_string(),
            amount: transaction.amount.to_float(),
            merchant_email: record.merchant.email.clone(),
            customer_email: transaction.customer_email.clone(),
            customer_phone: transaction.customer_phone.clone(),
        }
    }
}
