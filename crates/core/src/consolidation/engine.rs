//! Consolidation engine execution.

use std::collections::BTreeMap;
use std::sync::RwLockWriteGuard;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use saldo_shared::types::{round_minor, within_tolerance, EliminationEntryId};

use super::error::{ConsolidationError, EntityDataError};
use super::run::{ConsolidationRun, RunStatus};
use super::tracker::RunHandle;
use super::types::{
    ApprovalStatus, ConsolidatedRow, ConsolidationEntity, ConsolidationGroup,
    ConsolidationMethod, ConsolidationResult, EliminationEntry, EliminationType,
    EntityContribution, EntityTrialBalance, IntercompanyRecord, IntercompanyRole,
    TranslationMethod, TranslationRates,
};
use crate::audit::{AuditEvent, AuditSink};
use crate::reports::ReportPeriod;

/// Stateless consolidation engine. Works on a tracked run handle so pollers
/// observe progress while the run executes.
pub struct ConsolidationEngine;

impl ConsolidationEngine {
    /// Executes a consolidation run.
    ///
    /// Per entity: reads the trial balance through `trial_balance_provider`,
    /// translates into the group reporting currency per the entity's
    /// translation method, scales per the consolidation method, and
    /// accumulates into the pre-elimination trial balance. Entities with
    /// missing or invalid data are counted and skipped; the run still
    /// completes. Structural errors (empty group, unknown entity, invalid
    /// ownership) fail the run.
    ///
    /// Automatic eliminations are generated from matched intercompany
    /// pairs; manual eliminations are included only when approved.
    ///
    /// # Errors
    ///
    /// Returns the structural `ConsolidationError` that failed the run.
    pub fn execute<P, F>(
        handle: &RunHandle,
        group: &ConsolidationGroup,
        trial_balance_provider: P,
        translation_rates: F,
        intercompany: &[IntercompanyRecord],
        manual_eliminations: &[EliminationEntry],
        audit: &dyn AuditSink,
    ) -> Result<ConsolidationResult, ConsolidationError>
    where
        P: Fn(&ConsolidationEntity, ReportPeriod) -> Result<EntityTrialBalance, EntityDataError>,
        F: Fn(&str) -> Option<TranslationRates>,
    {
        let period = Self::transition(handle, audit, ConsolidationRun::start)?;

        if let Err(err) = Self::check_structure(group, intercompany, manual_eliminations) {
            return Self::fail(handle, audit, err);
        }

        let mut rows: BTreeMap<String, ConsolidatedRow> = BTreeMap::new();
        let mut contributions: Vec<EntityContribution> = Vec::new();
        let mut complete_entities: u32 = 0;
        let entity_count = group.entities.len();

        for (index, entity) in group.entities.iter().enumerate() {
            if entity.method == ConsolidationMethod::Equity {
                // Carried at equity: no line-by-line aggregation.
                debug!(entity = %entity.name, "equity-method entity excluded from aggregation");
                Self::write(handle).record_entity_success(0, Decimal::ZERO);
                complete_entities += 1;
                Self::bump_progress(handle, index + 1, entity_count);
                continue;
            }

            let outcome = Self::consolidate_entity(
                entity,
                group,
                period,
                &trial_balance_provider,
                &translation_rates,
                &mut rows,
            );
            match outcome {
                Ok((accounts, amount)) => {
                    Self::write(handle).record_entity_success(accounts, amount);
                    complete_entities += 1;
                    contributions.push(EntityContribution {
                        entity_id: entity.entity_id,
                        amount,
                        percent: Decimal::ZERO,
                    });
                }
                Err(err) => {
                    warn!(entity = %entity.name, error = %err, "entity skipped");
                    Self::write(handle).record_entity_error(format!("{}: {err}", entity.name));
                }
            }
            Self::bump_progress(handle, index + 1, entity_count);
        }

        // Eliminations
        let (auto_entries, unmatched_intercompany) = Self::match_intercompany(intercompany);
        let mut eliminations_applied = Vec::new();
        for entry in auto_entries.iter().chain(
            manual_eliminations
                .iter()
                .filter(|entry| entry.approval_status == ApprovalStatus::Approved),
        ) {
            if Self::apply_elimination(entry, &mut rows) {
                eliminations_applied.push(entry.id);
                Self::write(handle).eliminations_applied += 1;
            } else {
                let mut run = Self::write(handle);
                run.error_count += 1;
                run.errors.push(format!(
                    "elimination {} targets unknown account {}/{}",
                    entry.id, entry.debit_account, entry.credit_account
                ));
            }
        }
        Self::write(handle).advance_progress(95);

        // Finalize rows and contribution percentages
        let mut finalized: Vec<ConsolidatedRow> = rows.into_values().collect();
        for row in &mut finalized {
            row.post_elimination_balance = (row.pre_elimination_debit + row.elimination_debit)
                - (row.pre_elimination_credit + row.elimination_credit);
        }
        let consolidated_total: Decimal = contributions.iter().map(|c| c.amount).sum();
        if consolidated_total > Decimal::ZERO {
            for contribution in &mut contributions {
                contribution.percent = round_minor(
                    contribution.amount * Decimal::ONE_HUNDRED / consolidated_total,
                );
            }
        }
        let completeness_score = if entity_count == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(complete_entities) / Decimal::from(entity_count as u32)
        };

        Self::transition(handle, audit, ConsolidationRun::complete)?;
        let run = Self::write(handle).clone();
        info!(
            run_id = %run.id,
            entities = run.entities_processed,
            errors = run.error_count,
            eliminations = run.eliminations_applied,
            "consolidation run completed"
        );

        Ok(ConsolidationResult {
            run,
            rows: finalized,
            contributions,
            eliminations_applied,
            unmatched_intercompany,
            completeness_score,
        })
    }

    /// Generates elimination entries from matched intercompany pairs: a
    /// receivable declared by A against B matches a payable declared by B
    /// against A for the same amount. Returns the entries and the count of
    /// declarations left unmatched.
    #[must_use]
    pub fn match_intercompany(
        records: &[IntercompanyRecord],
    ) -> (Vec<EliminationEntry>, u32) {
        let mut entries = Vec::new();
        let mut used = vec![false; records.len()];

        for (i, receivable) in records.iter().enumerate() {
            if used[i] || receivable.role != IntercompanyRole::Receivable {
                continue;
            }
            let matching = records.iter().enumerate().find(|(j, candidate)| {
                !used[*j]
                    && candidate.role == IntercompanyRole::Payable
                    && candidate.entity_id == receivable.counterparty_id
                    && candidate.counterparty_id == receivable.entity_id
                    && within_tolerance(candidate.amount, receivable.amount)
            });
            if let Some((j, payable)) = matching {
                used[i] = true;
                used[j] = true;
                entries.push(EliminationEntry {
                    id: EliminationEntryId::new(),
                    elimination_type: EliminationType::IntercompanyReceivables,
                    description: format!(
                        "Eliminate intercompany balance {} / {}",
                        receivable.account_code, payable.account_code
                    ),
                    debit_account: payable.account_code.clone(),
                    credit_account: receivable.account_code.clone(),
                    amount: receivable.amount,
                    source_entity: receivable.entity_id,
                    counterparty_entity: payable.entity_id,
                    approval_status: ApprovalStatus::Approved,
                    auto_generated: true,
                });
            }
        }

        let unmatched = used.iter().filter(|flag| !**flag).count();
        (entries, unmatched as u32)
    }

    fn consolidate_entity<P, F>(
        entity: &ConsolidationEntity,
        group: &ConsolidationGroup,
        period: ReportPeriod,
        trial_balance_provider: &P,
        translation_rates: &F,
        rows: &mut BTreeMap<String, ConsolidatedRow>,
    ) -> Result<(u32, Decimal), EntityDataError>
    where
        P: Fn(&ConsolidationEntity, ReportPeriod) -> Result<EntityTrialBalance, EntityDataError>,
        F: Fn(&str) -> Option<TranslationRates>,
    {
        let trial_balance = trial_balance_provider(entity, period)?;
        for row in &trial_balance.rows {
            if row.debit < Decimal::ZERO || row.credit < Decimal::ZERO {
                return Err(EntityDataError::MissingData);
            }
        }

        let rate = if entity.functional_currency == group.reporting_currency {
            Decimal::ONE
        } else {
            let rates = translation_rates(&entity.functional_currency).ok_or_else(|| {
                EntityDataError::MissingRates(entity.functional_currency.clone())
            })?;
            match entity.translation_method {
                TranslationMethod::ClosingRate => rates.closing,
                TranslationMethod::AverageRate => rates.average,
            }
        };
        let factor = match entity.method {
            ConsolidationMethod::Proportional => {
                entity.ownership_percent / Decimal::ONE_HUNDRED
            }
            _ => Decimal::ONE,
        };

        let mut amount_consolidated = Decimal::ZERO;
        let mut accounts: u32 = 0;
        for row in &trial_balance.rows {
            let debit = round_minor(row.debit * rate * factor);
            let credit = round_minor(row.credit * rate * factor);
            let consolidated =
                rows.entry(row.account_code.clone())
                    .or_insert_with(|| ConsolidatedRow {
                        account_code: row.account_code.clone(),
                        account_name: row.account_name.clone(),
                        account_type: row.account_type,
                        pre_elimination_debit: Decimal::ZERO,
                        pre_elimination_credit: Decimal::ZERO,
                        elimination_debit: Decimal::ZERO,
                        elimination_credit: Decimal::ZERO,
                        post_elimination_balance: Decimal::ZERO,
                        contributing_entities: Vec::new(),
                    });
            consolidated.pre_elimination_debit += debit;
            consolidated.pre_elimination_credit += credit;
            if !consolidated.contributing_entities.contains(&entity.entity_id) {
                consolidated.contributing_entities.push(entity.entity_id);
            }
            amount_consolidated += debit;
            accounts += 1;
        }
        Ok((accounts, amount_consolidated))
    }

    /// Applies one elimination entry. Both target accounts must exist in
    /// the consolidated rows; otherwise nothing is applied.
    fn apply_elimination(
        entry: &EliminationEntry,
        rows: &mut BTreeMap<String, ConsolidatedRow>,
    ) -> bool {
        if !rows.contains_key(&entry.debit_account) || !rows.contains_key(&entry.credit_account) {
            return false;
        }
        if let Some(debit_row) = rows.get_mut(&entry.debit_account) {
            debit_row.elimination_debit += entry.amount;
        }
        if let Some(credit_row) = rows.get_mut(&entry.credit_account) {
            credit_row.elimination_credit += entry.amount;
        }
        true
    }

    fn check_structure(
        group: &ConsolidationGroup,
        intercompany: &[IntercompanyRecord],
        manual_eliminations: &[EliminationEntry],
    ) -> Result<(), ConsolidationError> {
        if group.entities.is_empty() {
            return Err(ConsolidationError::EmptyGroup);
        }
        for entity in &group.entities {
            if entity.ownership_percent <= Decimal::ZERO
                || entity.ownership_percent > Decimal::ONE_HUNDRED
            {
                return Err(ConsolidationError::InvalidOwnership {
                    entity: entity.entity_id,
                    percent: entity.ownership_percent,
                });
            }
        }
        for record in intercompany {
            for entity_id in [record.entity_id, record.counterparty_id] {
                if !group.contains(entity_id) {
                    return Err(ConsolidationError::UnknownEntity(entity_id));
                }
            }
        }
        for entry in manual_eliminations {
            for entity_id in [entry.source_entity, entry.counterparty_entity] {
                if !group.contains(entity_id) {
                    return Err(ConsolidationError::UnknownEntity(entity_id));
                }
            }
        }
        Ok(())
    }

    /// Applies a run transition and emits the audit event.
    fn transition(
        handle: &RunHandle,
        audit: &dyn AuditSink,
        apply: impl FnOnce(&mut ConsolidationRun) -> Result<(), ConsolidationError>,
    ) -> Result<ReportPeriod, ConsolidationError> {
        let mut run = Self::write(handle);
        let from = run.status;
        apply(&mut run)?;
        audit.record(AuditEvent::ConsolidationRunTransitioned {
            run_id: run.id,
            from: from.as_str().to_string(),
            to: run.status.as_str().to_string(),
        });
        Ok(run.period)
    }

    fn fail(
        handle: &RunHandle,
        audit: &dyn AuditSink,
        err: ConsolidationError,
    ) -> Result<ConsolidationResult, ConsolidationError> {
        let mut run = Self::write(handle);
        let from = run.status;
        if run.fail(err.to_string()).is_ok() {
            audit.record(AuditEvent::ConsolidationRunTransitioned {
                run_id: run.id,
                from: from.as_str().to_string(),
                to: RunStatus::Failed.as_str().to_string(),
            });
        }
        warn!(run_id = %run.id, error = %err, "consolidation run failed");
        Err(err)
    }

    fn bump_progress(handle: &RunHandle, processed: usize, total: usize) {
        if total == 0 {
            return;
        }
        let percent = 5 + (processed * 85) / total;
        Self::write(handle).advance_progress(u8::try_from(percent).unwrap_or(90));
    }

    /// Writes through lock poisoning so a panicked poller cannot wedge the
    /// engine.
    fn write(handle: &RunHandle) -> RwLockWriteGuard<'_, ConsolidationRun> {
        match handle.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, RwLock};

    use saldo_shared::types::{CompanyId, ConsolidationGroupId, EntityId};

    use crate::account::AccountType;
    use crate::audit::MemorySink;
    use crate::consolidation::tracker::RunTracker;
    use crate::consolidation::types::{ControlType, EntityTbRow};

    fn period() -> ReportPeriod {
        ReportPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn entity(name: &str, currency: &str) -> ConsolidationEntity {
        ConsolidationEntity {
            entity_id: EntityId::new(),
            company_id: CompanyId::new(),
            name: name.to_string(),
            ownership_percent: dec!(100),
            method: ConsolidationMethod::Full,
            functional_currency: currency.to_string(),
            translation_method: TranslationMethod::ClosingRate,
            control_type: ControlType::Subsidiary,
        }
    }

    fn row(code: &str, account_type: AccountType, debit: Decimal, credit: Decimal) -> EntityTbRow {
        EntityTbRow {
            account_code: code.to_string(),
            account_name: format!("Account {code}"),
            account_type,
            debit,
            credit,
        }
    }

    /// Entity A holds a 100.00 receivable from B; B owes the matching
    /// payable. Both books balance.
    fn two_entity_group() -> (ConsolidationGroup, Vec<EntityTrialBalance>) {
        let a = entity("Alpha Sdn Bhd", "MYR");
        let b = entity("Beta Sdn Bhd", "MYR");
        let tb_a = EntityTrialBalance {
            entity_id: a.entity_id,
            currency: "MYR".to_string(),
            rows: vec![
                row("1100", AccountType::Asset, dec!(600.00), Decimal::ZERO),
                row("1250", AccountType::Asset, dec!(100.00), Decimal::ZERO),
                row("3100", AccountType::Equity, Decimal::ZERO, dec!(400.00)),
                row("4100", AccountType::Revenue, Decimal::ZERO, dec!(300.00)),
            ],
        };
        let tb_b = EntityTrialBalance {
            entity_id: b.entity_id,
            currency: "MYR".to_string(),
            rows: vec![
                row("1100", AccountType::Asset, dec!(300.00), Decimal::ZERO),
                row("2150", AccountType::Liability, Decimal::ZERO, dec!(100.00)),
                row("3100", AccountType::Equity, Decimal::ZERO, dec!(200.00)),
            ],
        };
        let group = ConsolidationGroup {
            id: ConsolidationGroupId::new(),
            name: "Test Group".to_string(),
            reporting_currency: "MYR".to_string(),
            entities: vec![a, b],
        };
        (group, vec![tb_a, tb_b])
    }

    fn intercompany_pair(group: &ConsolidationGroup) -> Vec<IntercompanyRecord> {
        let a = group.entities[0].entity_id;
        let b = group.entities[1].entity_id;
        vec![
            IntercompanyRecord {
                entity_id: a,
                counterparty_id: b,
                role: IntercompanyRole::Receivable,
                account_code: "1250".to_string(),
                amount: dec!(100.00),
            },
            IntercompanyRecord {
                entity_id: b,
                counterparty_id: a,
                role: IntercompanyRole::Payable,
                account_code: "2150".to_string(),
                amount: dec!(100.00),
            },
        ]
    }

    fn provider(
        balances: Vec<EntityTrialBalance>,
    ) -> impl Fn(&ConsolidationEntity, ReportPeriod) -> Result<EntityTrialBalance, EntityDataError>
    {
        move |entity, _| {
            balances
                .iter()
                .find(|tb| tb.entity_id == entity.entity_id)
                .cloned()
                .ok_or(EntityDataError::MissingData)
        }
    }

    fn no_rates(_currency: &str) -> Option<TranslationRates> {
        None
    }

    fn handle_for(group: &ConsolidationGroup) -> RunHandle {
        Arc::new(RwLock::new(ConsolidationRun::new(
            group.id,
            period(),
            group.entities.len() as u32,
        )))
    }

    #[test]
    fn test_intercompany_elimination_nets_to_zero() {
        let (group, balances) = two_entity_group();
        let records = intercompany_pair(&group);
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &records,
            &[],
            &audit,
        )
        .unwrap();

        assert_eq!(result.run.status, RunStatus::Completed);
        assert_eq!(result.run.error_count, 0);
        assert_eq!(result.eliminations_applied.len(), 1);
        assert_eq!(result.unmatched_intercompany, 0);

        let receivable = result.rows.iter().find(|r| r.account_code == "1250").unwrap();
        assert_eq!(receivable.pre_elimination_debit, dec!(100.00));
        assert_eq!(receivable.elimination_credit, dec!(100.00));
        assert_eq!(receivable.post_elimination_balance, Decimal::ZERO);

        let payable = result.rows.iter().find(|r| r.account_code == "2150").unwrap();
        assert_eq!(payable.pre_elimination_credit, dec!(100.00));
        assert_eq!(payable.elimination_debit, dec!(100.00));
        assert_eq!(payable.post_elimination_balance, Decimal::ZERO);

        // Contribution percentages sum to 100.
        let percent_total: Decimal = result.contributions.iter().map(|c| c.percent).sum();
        assert_eq!(percent_total, dec!(100.00));
        assert_eq!(result.contributions[0].percent, dec!(70.00));
        assert_eq!(result.contributions[1].percent, dec!(30.00));
        assert_eq!(result.completeness_score, Decimal::ONE);
    }

    #[test]
    fn test_missing_entity_data_degrades_not_fails() {
        let (group, mut balances) = two_entity_group();
        balances.pop(); // Beta has no data
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        assert_eq!(result.run.status, RunStatus::Completed);
        assert_eq!(result.run.error_count, 1);
        assert_eq!(result.run.entities_processed, 2);
        assert!(result.run.errors[0].contains("Beta"));
        // One of two entities had complete data.
        assert_eq!(result.completeness_score, dec!(0.5));
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        let (group, balances) = two_entity_group();
        let stranger = EntityId::new();
        let records = vec![IntercompanyRecord {
            entity_id: stranger,
            counterparty_id: group.entities[0].entity_id,
            role: IntercompanyRole::Payable,
            account_code: "2150".to_string(),
            amount: dec!(50.00),
        }];
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let err = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &records,
            &[],
            &audit,
        )
        .unwrap_err();

        assert!(matches!(err, ConsolidationError::UnknownEntity(id) if id == stranger));
        let run = handle.read().unwrap().clone();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.failure_reason.is_some());
    }

    #[test]
    fn test_proportional_entity_scaled_by_ownership() {
        let (mut group, balances) = two_entity_group();
        group.entities[1].method = ConsolidationMethod::Proportional;
        group.entities[1].ownership_percent = dec!(50);
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        // Beta's cash of 300 enters at 150; Alpha's 600 in full.
        let cash = result.rows.iter().find(|r| r.account_code == "1100").unwrap();
        assert_eq!(cash.pre_elimination_debit, dec!(750.00));
        assert_eq!(cash.contributing_entities.len(), 2);
    }

    #[test]
    fn test_equity_method_entity_excluded_from_rows() {
        let (mut group, balances) = two_entity_group();
        group.entities[1].method = ConsolidationMethod::Equity;
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        // Only Alpha's accounts appear.
        assert!(result.rows.iter().all(|r| r.contributing_entities.len() == 1));
        assert!(!result.rows.iter().any(|r| r.account_code == "2150"));
        // Equity entities still count as complete.
        assert_eq!(result.completeness_score, Decimal::ONE);
    }

    #[test]
    fn test_foreign_entity_translated_at_closing_rate() {
        let (mut group, balances) = two_entity_group();
        group.entities[1].functional_currency = "USD".to_string();
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let rates = |currency: &str| {
            (currency == "USD").then_some(TranslationRates {
                closing: dec!(4.20),
                average: dec!(4.00),
            })
        };
        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        // Beta's 300.00 USD cash lands as 1260.00 MYR next to Alpha's 600.
        let cash = result.rows.iter().find(|r| r.account_code == "1100").unwrap();
        assert_eq!(cash.pre_elimination_debit, dec!(1860.00));
    }

    #[test]
    fn test_missing_rates_counted_as_entity_error() {
        let (mut group, balances) = two_entity_group();
        group.entities[1].functional_currency = "USD".to_string();
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        assert_eq!(result.run.status, RunStatus::Completed);
        assert_eq!(result.run.error_count, 1);
    }

    #[test]
    fn test_manual_elimination_requires_approval() {
        let (group, balances) = two_entity_group();
        let manual = EliminationEntry {
            id: EliminationEntryId::new(),
            elimination_type: EliminationType::IntercompanyReceivables,
            description: "Manual adjustment".to_string(),
            debit_account: "2150".to_string(),
            credit_account: "1250".to_string(),
            amount: dec!(100.00),
            source_entity: group.entities[0].entity_id,
            counterparty_entity: group.entities[1].entity_id,
            approval_status: ApprovalStatus::Pending,
            auto_generated: false,
        };

        let handle = handle_for(&group);
        let audit = MemorySink::new();
        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances.clone()),
            no_rates,
            &[],
            std::slice::from_ref(&manual),
            &audit,
        )
        .unwrap();
        // Pending entry is not included.
        assert!(result.eliminations_applied.is_empty());

        let approved = EliminationEntry {
            approval_status: ApprovalStatus::Approved,
            id: EliminationEntryId::new(),
            ..manual
        };
        let handle = handle_for(&group);
        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            std::slice::from_ref(&approved),
            &audit,
        )
        .unwrap();
        assert_eq!(result.eliminations_applied, vec![approved.id]);
    }

    #[test]
    fn test_unmatched_intercompany_counted() {
        let (group, balances) = two_entity_group();
        let lonely = vec![IntercompanyRecord {
            entity_id: group.entities[0].entity_id,
            counterparty_id: group.entities[1].entity_id,
            role: IntercompanyRole::Receivable,
            account_code: "1250".to_string(),
            amount: dec!(100.00),
        }];
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        let result = ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &lonely,
            &[],
            &audit,
        )
        .unwrap();

        assert_eq!(result.unmatched_intercompany, 1);
        assert!(result.eliminations_applied.is_empty());
    }

    #[test]
    fn test_audit_records_run_transitions() {
        let (group, balances) = two_entity_group();
        let handle = handle_for(&group);
        let audit = MemorySink::new();

        ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        let events = audit.recorded();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (
                AuditEvent::ConsolidationRunTransitioned { from, to, .. },
                AuditEvent::ConsolidationRunTransitioned {
                    from: from2,
                    to: to2,
                    ..
                },
            ) => {
                assert_eq!((from.as_str(), to.as_str()), ("pending", "running"));
                assert_eq!((from2.as_str(), to2.as_str()), ("running", "completed"));
            }
            other => panic!("expected two run transitions, got {other:?}"),
        }
    }

    #[test]
    fn test_tracked_run_reaches_full_progress() {
        let (group, balances) = two_entity_group();
        let tracker = RunTracker::new();
        let handle = tracker
            .register(ConsolidationRun::new(
                group.id,
                period(),
                group.entities.len() as u32,
            ))
            .unwrap();
        let audit = MemorySink::new();

        ConsolidationEngine::execute(
            &handle,
            &group,
            provider(balances),
            no_rates,
            &[],
            &[],
            &audit,
        )
        .unwrap();

        let snapshot = tracker.snapshot(group.id, period()).unwrap();
        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(snapshot.progress_percent, 100);
        assert_eq!(snapshot.entities_processed, 2);
    }
}
