//! Entity module - SeaORM definitions for the ledger tables.
//! Users back merchants one-to-one; merchants own transactions; a transaction
//! may point at an earlier transaction through `belongs_to_id`.

pub mod merchant;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use merchant::{Column as MerchantColumn, Entity as Merchant, Model as MerchantModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    TransactionStatus, TransactionType,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole, UserStatus};
