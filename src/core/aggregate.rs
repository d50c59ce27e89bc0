//! Merchant-level totals.
//!
//! The total is recomputed from the merchant's transactions on every read and
//! never stored, so it cannot drift from the rows it summarises.

use crate::{
    core::currency::Currency,
    entities::{TransactionStatus, TransactionType, transaction},
};

/// Sums the amounts of approved charges.
///
/// Authorizations, refunds, reversals and any charge that is no longer
/// `APPROVED` (refunded, errored) contribute nothing.
pub fn compute_total<'a, I>(transactions: I) -> Currency
where
    I: IntoIterator<Item = &'a transaction::Model>,
{
    transactions
        .into_iter()
        .filter(|t| {
            t.status == TransactionStatus::Approved && t.transaction_type == TransactionType::Charge
        })
        .map(|t| t.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::prelude::Uuid;

    fn tx(kind: TransactionType, status: TransactionStatus, cents: i64) -> transaction::Model {
        let now = chrono::Utc::now();
        transaction::Model {
            id: 0,
            created_at: now,
            updated_at: now,
            external_id: Uuid::new_v4(),
            transaction_type: kind,
            amount: Currency::from_minor_units(cents),
            status,
            customer_email: "c@example.com".to_string(),
            customer_phone: "0".to_string(),
            merchant_id: 1,
            belongs_to_id: None,
        }
    }

    #[test]
    fn test_compute_total_counts_only_approved_charges() {
        let transactions = [
            tx(TransactionType::Charge, TransactionStatus::Approved, 500),
            tx(TransactionType::Charge, TransactionStatus::Error, 300),
            tx(TransactionType::Authorize, TransactionStatus::Approved, 900),
        ];
        assert_eq!(compute_total(&transactions).minor_units(), 500);
    }

    #[test]
    fn test_compute_total_ignores_refunded_charges_and_refunds() {
        let transactions = vec![
            tx(TransactionType::Charge, TransactionStatus::Refunded, 800),
            tx(TransactionType::Refund, TransactionStatus::Approved, 800),
            tx(TransactionType::Reversal, TransactionStatus::Approved, 100),
            tx(TransactionType::Charge, TransactionStatus::Approved, 250),
            tx(TransactionType::Charge, TransactionStatus::Approved, 250),
        ];
        assert_eq!(compute_total(&transactions).minor_units(), 500);
    }

    #[test]
    fn test_compute_total_saturates_instead_of_overflowing() {
        let transactions = [
            tx(TransactionType::Charge, TransactionStatus::Approved, i64::MAX),
            tx(TransactionType::Charge, TransactionStatus::Approved, i64::MAX),
        ];
        assert_eq!(compute_total(&transactions).minor_units(), i64::MAX);
    }

    #[test]
    fn test_compute_total_empty() {
        assert_eq!(compute_total(&[]), Currency::ZERO);
    }
}
