//! Transaction chain rules.
//!
//! A transaction may act on an earlier one: charges and reversals act on an
//! authorization, refunds act on a charge, and an authorization never does.
//! The pairing is only checked when a parent is given.
//! [`derive_status`] decides the status a new transaction is recorded with, and
//! [`propagated_parent_status`] says what happens to the parent once the child
//! has been stored.

use crate::{
    entities::{TransactionStatus, TransactionType, transaction},
    errors::{Error, Result},
};

/// Computes the status a new transaction must carry.
///
/// Without a parent the requested status is parsed as-is, for any type.
/// Against a parent that is no longer `APPROVED` the result is always `ERROR`,
/// whatever was requested. Otherwise the type/parent pairing is checked and
/// the requested status is parsed.
pub fn derive_status(
    kind: TransactionType,
    requested: &str,
    parent: Option<&transaction::Model>,
) -> Result<TransactionStatus> {
    let Some(parent) = parent else {
        return requested.parse();
    };

    if parent.status != TransactionStatus::Approved {
        return Ok(TransactionStatus::Error);
    }

    let required = match kind {
        TransactionType::Authorize => {
            return Err(Error::ChainViolation {
                reason: "authorize cannot reference a parent".to_string(),
            });
        }
        TransactionType::Charge | TransactionType::Reversal => TransactionType::Authorize,
        TransactionType::Refund => TransactionType::Charge,
    };

    if parent.transaction_type != required {
        return Err(Error::ChainViolation {
            reason: format!(
                "{kind} can only reference a parent of type {required}, got {}",
                parent.transaction_type
            ),
        });
    }

    requested.parse()
}

/// Status the parent takes once a child of `kind` is stored, if it changes.
#[must_use]
pub const fn propagated_parent_status(kind: TransactionType) -> Option<TransactionStatus> {
    match kind {
        TransactionType::Refund => Some(TransactionStatus::Refunded),
        TransactionType::Reversal => Some(TransactionStatus::Reversed),
        TransactionType::Authorize | TransactionType::Charge => None,
    }
}
