//! Advance balance bookkeeping.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{AccountId, CompanyId, CustomerId, SupplierId, TenantId};

use super::error::AdvanceError;

/// The kind of party an advance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// A customer advance is a liability: money received ahead of an
    /// allocated invoice.
    Customer,
    /// A supplier advance is an asset: money paid ahead of an allocated
    /// bill.
    Supplier,
}

impl PartyType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

/// A typed reference to the advance-holding party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// Customer party.
    Customer(CustomerId),
    /// Supplier party.
    Supplier(SupplierId),
}

impl Party {
    /// Returns the party type.
    #[must_use]
    pub const fn party_type(&self) -> PartyType {
        match self {
            Self::Customer(_) => PartyType::Customer,
            Self::Supplier(_) => PartyType::Supplier,
        }
    }
}

/// Key of one advance balance: (tenant, company, party, currency).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvanceKey {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The party holding the advance.
    pub party: Party,
    /// Currency of the advance (ISO 4217).
    pub currency: String,
}

/// A running advance balance and the GL account carrying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceBalance {
    /// The advance account in the chart of accounts.
    pub account_id: AccountId,
    /// Current balance. Never negative beyond the configured tolerance.
    pub balance: Decimal,
}

/// In-memory advance sub-ledger.
///
/// Entries are keyed by (tenant, company, party, currency) and updated
/// through the per-key serialized map entries, so concurrent settlements
/// against different keys never contend and updates to one key are applied
/// one at a time. Durable storage must provide the same serialization
/// (row lock or compare-and-set) and commit the balance together with its
/// triggering journal.
#[derive(Debug)]
pub struct AdvanceLedger {
    balances: DashMap<AdvanceKey, AdvanceBalance>,
    tolerance: Decimal,
}

impl AdvanceLedger {
    /// Creates an empty ledger with the given negative-balance tolerance.
    #[must_use]
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            balances: DashMap::new(),
            tolerance,
        }
    }

    /// Resolves the advance account for `key`, creating a zero balance on
    /// first use.
    ///
    /// `account_resolver` maps the key to the configured advance account
    /// (chart of accounts lookup by configured code); it is only consulted
    /// when no balance exists yet.
    ///
    /// # Errors
    ///
    /// Returns `AccountUnresolved` if no account can be resolved.
    pub fn resolve_or_create<R>(
        &self,
        key: &AdvanceKey,
        account_resolver: R,
    ) -> Result<AccountId, AdvanceError>
    where
        R: Fn(&AdvanceKey) -> Option<AccountId>,
    {
        if let Some(existing) = self.balances.get(key) {
            return Ok(existing.account_id);
        }
        let account_id =
            account_resolver(key).ok_or_else(|| AdvanceError::AccountUnresolved {
                party_type: key.party.party_type(),
                currency: key.currency.clone(),
            })?;
        let entry = self
            .balances
            .entry(key.clone())
            .or_insert_with(|| AdvanceBalance {
                account_id,
                balance: Decimal::ZERO,
            });
        Ok(entry.account_id)
    }

    /// Increases the advance balance for `key` by `amount` and returns the
    /// new balance. The key must have been resolved first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive amounts, `NotFound` for an
    /// unresolved key.
    pub fn credit(&self, key: &AdvanceKey, amount: Decimal) -> Result<Decimal, AdvanceError> {
        if amount <= Decimal::ZERO {
            return Err(AdvanceError::InvalidAmount(amount));
        }
        let mut entry = self.balances.get_mut(key).ok_or(AdvanceError::NotFound)?;
        entry.balance += amount;
        Ok(entry.balance)
    }

    /// Consumes `amount` of the advance for `key` and returns the new
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive amounts, `NotFound` for an
    /// unresolved key, and `InsufficientAdvance` if the consumption would
    /// drive the balance below the tolerance floor.
    pub fn debit(&self, key: &AdvanceKey, amount: Decimal) -> Result<Decimal, AdvanceError> {
        if amount <= Decimal::ZERO {
            return Err(AdvanceError::InvalidAmount(amount));
        }
        let mut entry = self.balances.get_mut(key).ok_or(AdvanceError::NotFound)?;
        if entry.balance - amount < -self.tolerance {
            return Err(AdvanceError::InsufficientAdvance {
                available: entry.balance,
                requested: amount,
            });
        }
        entry.balance -= amount;
        Ok(entry.balance)
    }

    /// Returns the current balance for `key`, if any.
    #[must_use]
    pub fn balance(&self, key: &AdvanceKey) -> Option<Decimal> {
        self.balances.get(key).map(|entry| entry.balance)
    }

    /// Returns the advance account for `key`, if resolved.
    #[must_use]
    pub fn account(&self, key: &AdvanceKey) -> Option<AccountId> {
        self.balances.get(key).map(|entry| entry.account_id)
    }
}
