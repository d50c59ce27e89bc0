//! User entity - the identity behind every merchant and administrator.
//!
//! A user carries a role and an activity status. Merchants share the user's
//! primary key, so deactivating the user blocks new transactions for the merchant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role a user plays in the system
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Owner of a merchant account
    #[sea_orm(string_value = "MERCHANT")]
    Merchant,
    /// Back-office administrator
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// Whether a user may currently transact
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Allowed to record transactions
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Blocked from recording transactions
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_system_user")]
pub struct Model {
    /// Unique identifier, shared with the merchant row when one exists
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the user was created
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
    /// `MERCHANT` or `ADMIN`
    pub role: UserRole,
    /// `ACTIVE` or `INACTIVE`
    pub status: UserStatus,
}

/// Users are referenced by merchants; the relation is declared on the merchant side
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
