/// Approved-charge totals
pub mod aggregate;
/// Transaction chain rules and status derivation
pub mod chain;
/// Fixed-point money type
pub mod currency;
/// Closed-set validation for the stored enums
pub mod enums;
/// Merchant operations
pub mod merchant;
/// Background pruning of old transactions
pub mod retention;
/// Transaction recording, reads and deletion
pub mod transaction;
/// User operations
pub mod user;
/// Email, uuid and amount checks
pub mod validation;
