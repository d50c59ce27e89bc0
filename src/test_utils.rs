//! Shared test utilities for the payment ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{merchant, transaction},
    entities::{self, TransactionType},
    errors::Result,
    models::{MerchantRequest, TransactionRequest},
};
use sea_orm::{DatabaseConnection, prelude::Uuid};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a merchant request; the description is derived from the name.
pub fn merchant_request(name: &str, email: &str, status: &str) -> MerchantRequest {
    MerchantRequest {
        name: name.to_string(),
        description: format!("{name} description"),
        email: email.to_string(),
        status: status.to_string(),
    }
}

/// Creates an active test merchant named "Test Merchant".
pub async fn create_test_merchant(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::merchant::Model> {
    create_custom_merchant(db, email, "ACTIVE").await
}

/// Creates a test merchant with a custom user status.
pub async fn create_custom_merchant(
    db: &DatabaseConnection,
    email: &str,
    status: &str,
) -> Result<entities::merchant::Model> {
    merchant::create_merchant(db, &merchant_request("Test Merchant", email, status)).await
}

/// Builds an approved AUTHORIZE request with a fresh uuid.
///
/// # Defaults
/// * `customer_email`: `"customer@example.com"`
/// * `customer_phone`: `"+359888000000"`
pub fn authorize_request(merchant_email: &str, amount: f64) -> TransactionRequest {
    TransactionRequest {
        uuid: Uuid::new_v4().to_string(),
        belongs_to_uuid: None,
        transaction_type: TransactionType::Authorize.to_string(),
        status: "APPROVED".to_string(),
        amount,
        merchant_email: merchant_email.to_string(),
        customer_email: "customer@example.com".to_string(),
        customer_phone: "+359888000000".to_string(),
    }
}

/// Builds an approved request of `kind` acting on `parent_uuid`.
///
/// Amount and customer fields are placeholders; the parent's values win.
pub fn dependent_request(
    kind: TransactionType,
    merchant_email: &str,
    parent_uuid: &str,
) -> TransactionRequest {
    TransactionRequest {
        uuid: Uuid::new_v4().to_string(),
        belongs_to_uuid: Some(parent_uuid.to_string()),
        transaction_type: kind.to_string(),
        status: "APPROVED".to_string(),
        amount: 0.0,
        merchant_email: merchant_email.to_string(),
        customer_email: "customer@example.com".to_string(),
        customer_phone: "+359888000000".to_string(),
    }
}

/// Records an approved authorization for the merchant.
pub async fn create_test_authorization(
    db: &DatabaseConnection,
    merchant_email: &str,
    amount: f64,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(db, &authorize_request(merchant_email, amount)).await
}

/// Sets up a complete test environment with an active merchant.
/// Returns (db, merchant) with the merchant email `merchant@example.com`.
pub async fn setup_with_merchant() -> Result<(DatabaseConnection, entities::merchant::Model)> {
    let db = setup_test_db().await?;
    let merchant = create_test_merchant(&db, "merchant@example.com").await?;
    Ok((db, merchant))
}
