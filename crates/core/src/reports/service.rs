//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use saldo_shared::types::within_tolerance;

use super::error::ReportError;
use super::types::{
    BalanceSheetReport, CashFlowItem, CashFlowReport, CashFlowSection, PostedJournalLine,
    ProfitLossReport, ReportOptions, ReportPeriod, SectionAccount, StatementSection,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};
use crate::account::{Account, AccountSubtype, AccountType, CashFlowActivity, NormalBalance};

/// Per-account aggregation over a period.
struct AccountAggregate<'a> {
    account: &'a Account,
    /// Signed balance before the period (debit-positive).
    opening: Decimal,
    period_debit: Decimal,
    period_credit: Decimal,
}

impl AccountAggregate<'_> {
    /// Signed period movement (debit-positive).
    fn movement(&self) -> Decimal {
        self.period_debit - self.period_credit
    }

    /// Signed closing balance (debit-positive).
    fn closing(&self) -> Decimal {
        self.opening + self.movement()
    }
}

/// Service for generating financial reports from posted journal lines.
///
/// All generators are pure: the same accounts, lines, and period always
/// yield the same report.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance for the period.
    ///
    /// Rows are ordered by account code. `totals.is_balanced` reports
    /// whether the closing debit and credit columns agree within tolerance;
    /// a failing balance is reported, never corrected.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if a line references an account missing
    /// from `accounts`.
    pub fn generate_trial_balance(
        accounts: &[Account],
        lines: &[PostedJournalLine],
        period: ReportPeriod,
        currency: &str,
        options: &ReportOptions,
    ) -> Result<TrialBalanceReport, ReportError> {
        let aggregates = Self::aggregate(accounts, lines, period, options)?;

        let mut rows = Vec::with_capacity(aggregates.len());
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for aggregate in &aggregates {
            let closing = aggregate.closing();
            let (closing_debit, closing_credit) = if closing >= Decimal::ZERO {
                (closing, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -closing)
            };
            total_debit += closing_debit;
            total_credit += closing_credit;
            rows.push(TrialBalanceRow {
                account_id: aggregate.account.id,
                code: aggregate.account.code.clone(),
                name: aggregate.account.name.clone(),
                account_type: aggregate.account.account_type,
                opening_balance: aggregate.opening,
                period_debit: aggregate.period_debit,
                period_credit: aggregate.period_credit,
                closing_debit,
                closing_credit,
            });
        }

        Ok(TrialBalanceReport {
            period,
            currency: currency.to_string(),
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: within_tolerance(total_debit, total_credit),
                difference: total_debit - total_credit,
            },
        })
    }

    /// Generates a balance sheet as of `as_of`.
    ///
    /// Equity includes a derived "Net income to date" row so the statement
    /// closes; `difference` reports the signed violation of
    /// assets = liabilities + equity and is never suppressed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if a line references an account missing
    /// from `accounts`.
    pub fn generate_balance_sheet(
        accounts: &[Account],
        lines: &[PostedJournalLine],
        as_of: NaiveDate,
        currency: &str,
        options: &ReportOptions,
    ) -> Result<BalanceSheetReport, ReportError> {
        let period = ReportPeriod {
            start: NaiveDate::MIN,
            end: as_of,
        };
        let aggregates = Self::aggregate(accounts, lines, period, options)?;

        let mut current_assets = StatementSection::default();
        let mut non_current_assets = StatementSection::default();
        let mut current_liabilities = StatementSection::default();
        let mut non_current_liabilities = StatementSection::default();
        let mut equity = StatementSection::default();
        let mut net_income_to_date = Decimal::ZERO;

        for aggregate in &aggregates {
            let account = aggregate.account;
            let closing = aggregate.closing();
            // Present each balance on the account's normal side.
            let presented = match account.normal_balance() {
                NormalBalance::Debit => closing,
                NormalBalance::Credit => -closing,
            };
            match account.account_type {
                AccountType::Asset | AccountType::Liability => {
                    if presented.is_zero() {
                        continue;
                    }
                    let is_current = account.subtype.is_none_or(AccountSubtype::is_current);
                    let section = match (account.account_type, is_current) {
                        (AccountType::Asset, true) => &mut current_assets,
                        (AccountType::Asset, false) => &mut non_current_assets,
                        (_, true) => &mut current_liabilities,
                        (_, false) => &mut non_current_liabilities,
                    };
                    section.push(Self::section_account(account, presented));
                }
                AccountType::Equity => {
                    if !presented.is_zero() {
                        equity.push(Self::section_account(account, presented));
                    }
                }
                AccountType::Revenue | AccountType::Expense => {
                    // P&L balances roll into equity as earnings to date.
                    net_income_to_date -= closing;
                }
            }
        }

        if !net_income_to_date.is_zero() {
            equity.push(SectionAccount {
                account_id: None,
                code: String::new(),
                name: "Net income to date".to_string(),
                amount: net_income_to_date,
            });
        }

        let total_assets = current_assets.total + non_current_assets.total;
        let total_liabilities = current_liabilities.total + non_current_liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;
        let difference = total_assets - liabilities_and_equity;

        Ok(BalanceSheetReport {
            as_of,
            currency: currency.to_string(),
            current_assets,
            non_current_assets,
            total_assets,
            current_liabilities,
            non_current_liabilities,
            total_liabilities,
            equity,
            total_equity,
            liabilities_and_equity,
            is_balanced: within_tolerance(difference, Decimal::ZERO),
            difference,
        })
    }

    /// Generates a profit & loss statement for the period.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if a line references an account missing
    /// from `accounts`.
    pub fn generate_profit_loss(
        accounts: &[Account],
        lines: &[PostedJournalLine],
        period: ReportPeriod,
        currency: &str,
        options: &ReportOptions,
    ) -> Result<ProfitLossReport, ReportError> {
        let aggregates = Self::aggregate(accounts, lines, period, options)?;

        let mut revenue = StatementSection::default();
        let mut cost_of_goods_sold = StatementSection::default();
        let mut operating_expenses = StatementSection::default();
        let mut other_income_expense = StatementSection::default();

        for aggregate in &aggregates {
            let account = aggregate.account;
            let movement = aggregate.movement();
            if movement.is_zero() {
                continue;
            }
            match account.account_type {
                AccountType::Revenue => {
                    let amount = -movement; // credit-positive
                    match account.subtype {
                        Some(AccountSubtype::OtherIncome) => other_income_expense
                            .push(Self::section_account(account, amount)),
                        _ => revenue.push(Self::section_account(account, amount)),
                    }
                }
                AccountType::Expense => {
                    let amount = movement; // debit-positive
                    match account.subtype {
                        Some(AccountSubtype::CostOfGoodsSold) => {
                            cost_of_goods_sold.push(Self::section_account(account, amount));
                        }
                        Some(AccountSubtype::OtherExpense) => {
                            // Signed as income reduction in the other section.
                            other_income_expense
                                .push(Self::section_account(account, -amount));
                        }
                        _ => operating_expenses.push(Self::section_account(account, amount)),
                    }
                }
                _ => {}
            }
        }

        let gross_profit = revenue.total - cost_of_goods_sold.total;
        let operating_income = gross_profit - operating_expenses.total;
        let net_income = operating_income + other_income_expense.total;

        Ok(ProfitLossReport {
            period,
            currency: currency.to_string(),
            revenue,
            cost_of_goods_sold,
            gross_profit,
            operating_expenses,
            operating_income,
            other_income_expense,
            net_income,
        })
    }

    /// Generates a cash flow statement for the period (indirect method).
    ///
    /// Operating cash starts from net income and adjusts for working
    /// capital movements; investing and financing carry the movements of
    /// non-current assets and funding accounts. The derived net change is
    /// reconciled against the actual cash-account movement and the signed
    /// difference is reported.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if a line references an account missing
    /// from `accounts`.
    pub fn generate_cash_flow(
        accounts: &[Account],
        lines: &[PostedJournalLine],
        period: ReportPeriod,
        currency: &str,
        options: &ReportOptions,
    ) -> Result<CashFlowReport, ReportError> {
        let profit_loss =
            Self::generate_profit_loss(accounts, lines, period, currency, options)?;
        let aggregates = Self::aggregate(accounts, lines, period, options)?;

        let mut operating = CashFlowSection::default();
        let mut investing = CashFlowSection::default();
        let mut financing = CashFlowSection::default();
        operating.push(CashFlowItem {
            label: "Net income".to_string(),
            amount: profit_loss.net_income,
        });

        let mut opening_cash = Decimal::ZERO;
        let mut cash_movement = Decimal::ZERO;

        for aggregate in &aggregates {
            let account = aggregate.account;
            if account.subtype == Some(AccountSubtype::CashAndBank) {
                opening_cash += aggregate.opening;
                cash_movement += aggregate.movement();
                continue;
            }
            if !account.account_type.is_balance_sheet() {
                continue;
            }
            let movement = aggregate.movement();
            if movement.is_zero() {
                continue;
            }
            let activity = account
                .subtype
                .and_then(AccountSubtype::cash_flow_activity)
                .unwrap_or(match account.account_type {
                    AccountType::Equity => CashFlowActivity::Financing,
                    _ => CashFlowActivity::Operating,
                });
            let section = match activity {
                CashFlowActivity::Operating => &mut operating,
                CashFlowActivity::Investing => &mut investing,
                CashFlowActivity::Financing => &mut financing,
            };
            // A debit-positive increase in a non-cash account consumes cash.
            section.push(CashFlowItem {
                label: account.name.clone(),
                amount: -movement,
            });
        }

        let net_change = operating.total + investing.total + financing.total;
        let difference = net_change - cash_movement;

        Ok(CashFlowReport {
            period,
            currency: currency.to_string(),
            operating,
            investing,
            financing,
            net_change,
            opening_cash,
            closing_cash: opening_cash + cash_movement,
            is_reconciled: within_tolerance(difference, Decimal::ZERO),
            difference,
        })
    }

    /// Aggregates lines per account, ordered by account code.
    fn aggregate<'a>(
        accounts: &'a [Account],
        lines: &[PostedJournalLine],
        period: ReportPeriod,
        options: &ReportOptions,
    ) -> Result<Vec<AccountAggregate<'a>>, ReportError> {
        let mut order: Vec<&Account> = accounts.iter().collect();
        order.sort_by(|a, b| a.code.cmp(&b.code));

        let index: HashMap<_, _> = order
            .iter()
            .enumerate()
            .map(|(position, account)| (account.id, position))
            .collect();
        let mut aggregates: Vec<AccountAggregate<'a>> = order
            .iter()
            .map(|account| AccountAggregate {
                account,
                opening: Decimal::ZERO,
                period_debit: Decimal::ZERO,
                period_credit: Decimal::ZERO,
            })
            .collect();

        for line in lines {
            if !options.includes(line) {
                continue;
            }
            let position = *index
                .get(&line.account_id)
                .ok_or(ReportError::UnknownAccount(line.account_id))?;
            let aggregate = &mut aggregates[position];
            if line.posting_date < period.start {
                aggregate.opening += line.signed_amount();
            } else if period.contains(line.posting_date) {
                aggregate.period_debit += line.debit;
                aggregate.period_credit += line.credit;
            }
        }

        Ok(aggregates)
    }

    fn section_account(account: &Account, amount: Decimal) -> SectionAccount {
        SectionAccount {
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        }
    }
}
