//! Database configuration for the payment ledger.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. They are created in dependency order and only if missing.

use crate::entities::{Merchant, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Default `SQLite` file used when neither the environment nor ledger.toml names one
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/payment_ledger.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, if set.
#[must_use]
pub fn get_database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Establishes a connection to the given database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    info!("Connected to {}", database_url);
    Ok(db)
}

/// Creates the user, merchant and transaction tables.
///
/// Existing tables are left alone, so this is safe to run on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Referenced tables first
    let mut user_table = schema.create_table_from_entity(User);
    let mut merchant_table = schema.create_table_from_entity(Merchant);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    user_table.if_not_exists();
    merchant_table.if_not_exists();
    transaction_table.if_not_exists();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&merchant_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}
