//! Identifiers for ledger entities.
//!
//! Every entity a tenant owns (accounts, vouchers, lines, budgets, bank
//! accounts, statement lines) gets its own id type, so a line id can never
//! be used to look up an account. Ids are UUID v7: they sort in creation
//! order, which the store relies on for stable listings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! ledger_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Allocates a fresh, time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID, e.g. a fixed demo tenant.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            /// Parses a hyphenated or simple UUID, ignoring surrounding blanks.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

ledger_id!(
    /// A tenant (company). Every other entity belongs to exactly one.
    TenantId
);
ledger_id!(
    /// An entry in a tenant's chart of accounts.
    AccountId
);
ledger_id!(
    /// A voucher, draft or posted.
    TransactionId
);
ledger_id!(
    /// One debit or credit line of a voucher.
    LineId
);
ledger_id!(
    /// An annual budget.
    BudgetId
);
ledger_id!(
    /// A bank account mirrored onto a GL account.
    BankAccountId
);
ledger_id!(
    /// A line of an imported bank statement.
    StatementLineId
);
