//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CustomerId` where a
//! `SupplierId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
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
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant.");
typed_id!(CompanyId, "Unique identifier for a company within a tenant.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(JournalId, "Unique identifier for a journal posting.");
typed_id!(JournalLineId, "Unique identifier for a journal line.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(SupplierId, "Unique identifier for a supplier.");
typed_id!(BankAccountId, "Unique identifier for a bank account.");
typed_id!(DimensionValueId, "Unique identifier for a dimension value.");
typed_id!(
    EntityId,
    "Unique identifier for a consolidation entity (a company in a group)."
);
typed_id!(
    ConsolidationGroupId,
    "Unique identifier for a consolidation group."
);
typed_id!(
    ConsolidationRunId,
    "Unique identifier for a consolidation run."
);
typed_id!(
    EliminationEntryId,
    "Unique identifier for an elimination entry."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        let tenant = TenantId::new();
        let company = CompanyId::new();
        // Different wrappers around the same UUID compare by inner value only
        // within their own type; the type system keeps them apart.
        assert_ne!(tenant.into_inner(), company.into_inner());
    }

    #[test]
    fn test_id_roundtrip_through_string() {
        let id = AccountId::new();
        let parsed = AccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let uuid = Uuid::now_v7();
        let id = JournalId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let a = JournalLineId::new();
        let b = JournalLineId::new();
        // UUID v7 encodes a timestamp prefix; later IDs sort after earlier ones.
        assert!(a.into_inner() <= b.into_inner());
    }
}
