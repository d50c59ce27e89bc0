//! Merchant entity - a named business account embedding exactly one user.
//!
//! The merchant's primary key is the backing user's id. Email is unique and
//! always stored lower-cased so lookups are case-insensitive. The running total
//! of approved charges is never persisted; see [`crate::core::aggregate`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Merchant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "merchants")]
pub struct Model {
    /// Primary key, equal to the backing `payment_system_user.id`
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Lower-cased contact email, unique across merchants
    #[sea_orm(unique)]
    pub email: String,
}

/// Defines relationships between Merchant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each merchant is backed by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One merchant has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
