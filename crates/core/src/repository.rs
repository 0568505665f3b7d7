//! Persistence port consumed by the engine.
//!
//! The core reads master data through this interface and never writes:
//! committing a validated journal together with its advance balance update
//! is the surrounding service's job, and the store it uses must expose a
//! transactional commit-all-or-none operation for that pair. Concurrent
//! updates to the same advance balance key must be serialized by that store
//! (row-level lock or compare-and-set with retry); the core relies on the
//! guarantee but does not prescribe the mechanism.

use std::collections::HashMap;

use saldo_shared::types::{
    AccountId, BankAccountId, CompanyId, CustomerId, SupplierId, TenantId,
};

use crate::account::Account;

/// A settlement bank account as seen by the engine.
#[derive(Debug, Clone)]
pub struct BankAccountInfo {
    /// Bank account identifier.
    pub id: BankAccountId,
    /// The GL account the bank balance is carried on.
    pub gl_account_id: AccountId,
    /// The bank account's currency (ISO 4217).
    pub currency: String,
}

/// A customer or supplier as seen by the engine: only the stored currency
/// matters for settlement validation.
#[derive(Debug, Clone)]
pub struct PartyRecord {
    /// The party's stored currency (ISO 4217).
    pub currency: String,
}

/// Read access to master data. Implemented by the persistence layer;
/// implemented in memory for tests.
pub trait LedgerRepository {
    /// Looks up an account by id.
    fn account(&self, id: AccountId) -> Option<Account>;

    /// Looks up an account by (tenant, company, code).
    fn account_by_code(
        &self,
        tenant_id: TenantId,
        company_id: CompanyId,
        code: &str,
    ) -> Option<Account>;

    /// Looks up a settlement bank account by id.
    fn bank_account(&self, id: BankAccountId) -> Option<BankAccountInfo>;

    /// Looks up a customer by id.
    fn customer(&self, id: CustomerId) -> Option<PartyRecord>;

    /// Looks up a supplier by id.
    fn supplier(&self, id: SupplierId) -> Option<PartyRecord>;
}

/// In-memory repository fake for tests and examples.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    accounts: HashMap<AccountId, Account>,
    bank_accounts: HashMap<BankAccountId, BankAccountInfo>,
    customers: HashMap<CustomerId, PartyRecord>,
    suppliers: HashMap<SupplierId, PartyRecord>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account.
    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Adds a bank account.
    pub fn insert_bank_account(&mut self, bank_account: BankAccountInfo) {
        self.bank_accounts.insert(bank_account.id, bank_account);
    }

    /// Adds a customer.
    pub fn insert_customer(&mut self, id: CustomerId, record: PartyRecord) {
        self.customers.insert(id, record);
    }

    /// Adds a supplier.
    pub fn insert_supplier(&mut self, id: SupplierId, record: PartyRecord) {
        self.suppliers.insert(id, record);
    }
}

impl LedgerRepository for InMemoryRepository {
    fn account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }

    fn account_by_code(
        &self,
        tenant_id: TenantId,
        company_id: CompanyId,
        code: &str,
    ) -> Option<Account> {
        self.accounts
            .values()
            .find(|a| a.tenant_id == tenant_id && a.company_id == company_id && a.code == code)
            .cloned()
    }

    fn bank_account(&self, id: BankAccountId) -> Option<BankAccountInfo> {
        self.bank_accounts.get(&id).cloned()
    }

    fn customer(&self, id: CustomerId) -> Option<PartyRecord> {
        self.customers.get(&id).cloned()
    }

    fn supplier(&self, id: SupplierId) -> Option<PartyRecord> {
        self.suppliers.get(&id).cloned()
    }
}
