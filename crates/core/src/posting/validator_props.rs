//! Property-based tests for the posting validator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use saldo_shared::types::{AccountId, CompanyId, JournalId, TenantId, UserId};

use crate::account::{Account, AccountType};
use crate::posting::error::PostingError;
use crate::posting::types::{
    Journal, JournalLine, PostingContext, UserRole, VoucherType,
};
use crate::posting::validator::PostingValidator;

fn make_account(tenant_id: TenantId, company_id: CompanyId) -> Account {
    Account {
        id: AccountId::new(),
        tenant_id,
        company_id,
        code: "1100".to_string(),
        name: "Test account".to_string(),
        account_type: AccountType::Asset,
        subtype: None,
        parent_id: None,
        is_active: true,
        currency: "MYR".to_string(),
    }
}

/// Strategy for positive minor-unit amounts up to 1,000,000.00.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of amounts, a journal mirroring every debit with an
    /// equal credit validates, and its totals match.
    #[test]
    fn prop_mirrored_journals_always_balance(
        amounts in prop::collection::vec(amount_strategy(), 1..20),
    ) {
        let tenant_id = TenantId::new();
        let company_id = CompanyId::new();
        let account = make_account(tenant_id, company_id);
        let ctx = PostingContext {
            tenant_id,
            company_id,
            user_id: UserId::new(),
            role: UserRole::Accountant,
        };

        let mut lines = Vec::with_capacity(amounts.len() * 2);
        for amount in &amounts {
            lines.push(JournalLine::debit(account.id, *amount, "debit"));
            lines.push(JournalLine::credit(account.id, *amount, "credit"));
        }
        let journal = Journal {
            id: JournalId::new(),
            tenant_id,
            company_id,
            journal_number: "JNL-P".to_string(),
            posting_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            currency: "MYR".to_string(),
            voucher_type: VoucherType::Journal,
            description: "prop".to_string(),
            lines,
        };

        let result = PostingValidator::validate(
            &journal,
            &ctx,
            |_| Some(account.clone()),
            |_, _| true,
        );
        prop_assert!(result.is_ok());
        let validated = result.unwrap();
        prop_assert_eq!(validated.total_debits, validated.total_credits);
        let expected: Decimal = amounts.iter().copied().sum();
        prop_assert_eq!(validated.total_debits, expected);
    }

    /// Perturbing one side beyond the tolerance always yields Unbalanced.
    #[test]
    fn prop_perturbed_journals_rejected(
        amount in amount_strategy(),
        skew_cents in 2i64..10_000,
    ) {
        let tenant_id = TenantId::new();
        let company_id = CompanyId::new();
        let account = make_account(tenant_id, company_id);
        let ctx = PostingContext {
            tenant_id,
            company_id,
            user_id: UserId::new(),
            role: UserRole::Accountant,
        };

        let skew = Decimal::new(skew_cents, 2);
        let journal = Journal {
            id: JournalId::new(),
            tenant_id,
            company_id,
            journal_number: "JNL-P".to_string(),
            posting_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            currency: "MYR".to_string(),
            voucher_type: VoucherType::Journal,
            description: "prop".to_string(),
            lines: vec![
                JournalLine::debit(account.id, amount + skew, "debit"),
                JournalLine::credit(account.id, amount, "credit"),
            ],
        };

        let result = PostingValidator::validate(
            &journal,
            &ctx,
            |_| Some(account.clone()),
            |_, _| true,
        );
        prop_assert!(
            matches!(result, Err(PostingError::Unbalanced { .. })),
            "expected an Unbalanced posting error"
        );
    }
}
