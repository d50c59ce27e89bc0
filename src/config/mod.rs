/// Database connection and schema creation
pub mod database;

/// Daemon settings loaded from ledger.toml
pub mod settings;
