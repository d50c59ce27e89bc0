//! Closed-set validation for the string-valued enums.
//!
//! Every enum stored as text (`UserRole`, `UserStatus`, `TransactionType`,
//! `TransactionStatus`) implements [`ClosedSet`], and all parsing goes through
//! the one [`validate`] routine.

use crate::{
    entities::{TransactionStatus, TransactionType, UserRole, UserStatus},
    errors::{Error, Result},
};
use std::fmt;
use std::str::FromStr;

/// An enum whose string form is drawn from a fixed list of names.
pub trait ClosedSet: Copy + 'static {
    /// Type name used in error messages
    const TYPE_NAME: &'static str;
    /// Every member, in declaration order
    const ALLOWED: &'static [Self];

    /// The member's persisted name
    fn name(self) -> &'static str;
}

/// Returns the member of `allowed` whose name equals `candidate` exactly.
///
/// # Panics
///
/// Panics if `allowed` is empty: such a set can never be satisfied, so calling
/// this with one is a programming error rather than bad input.
pub fn validate<T: ClosedSet>(candidate: &str, allowed: &[T]) -> Result<T> {
    assert!(
        !allowed.is_empty(),
        "closed set {} constructed without possible values",
        T::TYPE_NAME
    );

    allowed
        .iter()
        .copied()
        .find(|member| member.name() == candidate)
        .ok_or_else(|| Error::InvalidEnumValue {
            type_name: T::TYPE_NAME,
            value: candidate.to_string(),
            allowed: allowed
                .iter()
                .map(|member| member.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

macro_rules! closed_set {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl ClosedSet for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            const ALLOWED: &'static [Self] = &[$($ty::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                validate(s, Self::ALLOWED)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

closed_set!(UserRole {
    Merchant => "MERCHANT",
    Admin => "ADMIN",
});

closed_set!(UserStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

closed_set!(TransactionType {
    Authorize => "AUTHORIZE",
    Charge => "CHARGE",
    Refund => "REFUND",
    Reversal => "REVERSAL",
});

closed_set!(TransactionStatus {
    Approved => "APPROVED",
    Reversed => "REVERSED",
    Refunded => "REFUNDED",
    Error => "ERROR",
});
