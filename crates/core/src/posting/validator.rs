//! Journal posting validator.
//!
//! Pure validation: the only collaborators are the injected account lookup
//! and the segregation-of-duties oracle. No persistence happens here.

use rust_decimal::Decimal;

use saldo_shared::types::{balance_tolerance, round_minor, AccountId};

use super::error::PostingError;
use super::types::{Journal, JournalLine, PostingContext, ValidatedPosting, VoucherType};
use crate::account::Account;

/// Stateless journal posting validator.
pub struct PostingValidator;

impl PostingValidator {
    /// Validates a journal against the default balance tolerance.
    ///
    /// See [`Self::validate_with_tolerance`] for the check order.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` naming the first failed rule.
    pub fn validate<A, S>(
        journal: &Journal,
        ctx: &PostingContext,
        account_lookup: A,
        sod_oracle: S,
    ) -> Result<ValidatedPosting, PostingError>
    where
        A: Fn(AccountId) -> Option<Account>,
        S: Fn(&PostingContext, VoucherType) -> bool,
    {
        Self::validate_with_tolerance(journal, ctx, account_lookup, sod_oracle, balance_tolerance())
    }

    /// Validates a journal and returns the normalized posting.
    ///
    /// Checks run in order:
    /// 1. At least one line
    /// 2. Every line has exactly one of debit/credit > 0, the other exactly 0
    /// 3. sum(debit) equals sum(credit) within `tolerance`
    /// 4. Every referenced account exists, is active, and belongs to the
    ///    posting (tenant, company)
    /// 5. The acting role is authorized for the voucher type (delegated to
    ///    the SoD oracle; the verdict is propagated, not interpreted)
    ///
    /// Any failed check aborts the whole posting.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` naming the first failed rule.
    pub fn validate_with_tolerance<A, S>(
        journal: &Journal,
        ctx: &PostingContext,
        account_lookup: A,
        sod_oracle: S,
        tolerance: Decimal,
    ) -> Result<ValidatedPosting, PostingError>
    where
        A: Fn(AccountId) -> Option<Account>,
        S: Fn(&PostingContext, VoucherType) -> bool,
    {
        // 1. At least one line
        if journal.lines.is_empty() {
            return Err(PostingError::EmptyJournal);
        }

        // 2. Exactly one side per line, no negative amounts
        for line in &journal.lines {
            Self::validate_line(line)?;
        }

        // 3. Balance within tolerance
        let total_debits: Decimal = journal.lines.iter().map(|l| round_minor(l.debit)).sum();
        let total_credits: Decimal = journal.lines.iter().map(|l| round_minor(l.credit)).sum();
        if (total_debits - total_credits).abs() > tolerance {
            return Err(PostingError::Unbalanced {
                debits: total_debits,
                credits: total_credits,
            });
        }

        // 4. Accounts exist, are active, and belong to the posting scope
        for line in &journal.lines {
            let account = account_lookup(line.account_id)
                .ok_or(PostingError::AccountNotFound(line.account_id))?;
            if !account.is_active {
                return Err(PostingError::AccountInactive(line.account_id));
            }
            if account.tenant_id != ctx.tenant_id || account.company_id != ctx.company_id {
                return Err(PostingError::AccountOwnershipMismatch(line.account_id));
            }
        }

        // 5. Segregation of duties
        if !sod_oracle(ctx, journal.voucher_type) {
            return Err(PostingError::NotAuthorized {
                role: ctx.role,
                voucher_type: journal.voucher_type,
            });
        }

        Ok(ValidatedPosting {
            journal: Self::normalize(journal),
            total_debits,
            total_credits,
        })
    }

    /// Validates a single line: exactly one of debit/credit > 0, the other
    /// exactly 0, and no negative amounts.
    fn validate_line(line: &JournalLine) -> Result<(), PostingError> {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(PostingError::NegativeAmount(line.id));
        }
        match (line.debit.is_zero(), line.credit.is_zero()) {
            (false, false) => Err(PostingError::BothSidesSet(line.id)),
            (true, true) => Err(PostingError::NoSideSet(line.id)),
            _ => Ok(()),
        }
    }

    /// Returns the journal with every amount rounded to the minor unit.
    fn normalize(journal: &Journal) -> Journal {
        let mut normalized = journal.clone();
        for line in &mut normalized.lines {
            line.debit = round_minor(line.debit);
            line.credit = round_minor(line.credit);
        }
        normalized
    }
}
