//! Transaction entity - one recorded payment operation.
//!
//! `belongs_to_id` points at the earlier transaction this one acts on (a charge
//! or reversal points at an authorization, a refund at a charge). It is a plain
//! nullable column without a database foreign key: deleting or pruning a parent
//! leaves the child's id dangling, and readers resolve it to `None`.
use crate::core::currency::Currency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of payment operation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Reserve funds; never references a parent
    #[sea_orm(string_value = "AUTHORIZE")]
    Authorize,
    /// Capture an authorization
    #[sea_orm(string_value = "CHARGE")]
    Charge,
    /// Return a captured charge
    #[sea_orm(string_value = "REFUND")]
    Refund,
    /// Release an authorization
    #[sea_orm(string_value = "REVERSAL")]
    Reversal,
}

/// Outcome of a transaction, possibly overwritten by a later dependent one
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Accepted and still in effect
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Authorization released by a reversal
    #[sea_orm(string_value = "REVERSED")]
    Reversed,
    /// Charge returned by a refund
    #[sea_orm(string_value = "REFUNDED")]
    Refunded,
    /// Rejected
    #[sea_orm(string_value = "ERROR")]
    Error,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Internal identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the transaction was recorded; drives retention
    pub created_at: DateTimeUtc,
    /// When the row was last modified (status propagation included)
    pub updated_at: DateTimeUtc,
    /// Caller-supplied identifier, unique across all transactions
    #[sea_orm(unique)]
    pub external_id: Uuid,
    /// `AUTHORIZE`, `CHARGE`, `REFUND` or `REVERSAL`
    pub transaction_type: TransactionType,
    /// Amount in minor units
    pub amount: Currency,
    /// `APPROVED`, `REVERSED`, `REFUNDED` or `ERROR`
    pub status: TransactionStatus,
    /// Lower-cased customer email
    pub customer_email: String,
    /// Customer phone as supplied
    pub customer_phone: String,
    /// Owning merchant (`merchants.user_id`)
    pub merchant_id: i64,
    /// Parent transaction, if any
    pub belongs_to_id: Option<i64>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one merchant
    #[sea_orm(
        belongs_to = "super::merchant::Entity",
        from = "Column::MerchantId",
        to = "super::merchant::Column::UserId"
    )]
    Merchant,
}

impl Related<super::merchant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Merchant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
