use chrono::NaiveDate;

use crate::models::Transaction;

/// Inclusive date-proximity window for the duplicate heuristic, in days.
pub const DUPLICATE_WINDOW_DAYS: i64 = 4;

/// One candidate paired with the ledger entry it may duplicate.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub candidate: Transaction,
    pub existing: Transaction,
}

/// Partition of an import's candidates against the ledger.
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Importable without confirmation.
    pub clean: Vec<Transaction>,
    /// Need a user decision.
    pub conflicts: Vec<Conflict>,
    /// Exact duplicates, dropped silently.
    pub duplicates: usize,
}

fn days_apart(a: &str, b: &str) -> Option<i64> {
    let a = NaiveDate::parse_from_str(a, "%Y-%m-%d").ok()?;
    let b = NaiveDate::parse_from_str(b, "%Y-%m-%d").ok()?;
    Some((a - b).num_days().abs())
}

fn window_match<'l>(candidate: &Transaction, ledger: &'l [Transaction]) -> Option<&'l Transaction> {
    ledger.iter().find(|existing| {
        existing.amount == candidate.amount
            && days_apart(&candidate.date, &existing.date)
                .map(|d| d <= DUPLICATE_WINDOW_DAYS)
                .unwrap_or(false)
    })
}

/// Compare candidates against the ledger snapshot. An entry with the exact
/// same signed amount within the window is a potential duplicate: identical
/// description and date drop the candidate outright, anything else becomes a
/// conflict against the first such entry. Partition order follows input order.
pub fn reconcile(candidates: Vec<Transaction>, ledger: &[Transaction]) -> Reconciliation {
    let mut result = Reconciliation::default();

    for candidate in candidates {
        match window_match(&candidate, ledger) {
            None => result.clean.push(candidate),
            Some(existing) => {
                if existing.description == candidate.description && existing.date == candidate.date {
                    result.duplicates += 1;
                } else {
                    result.conflicts.push(Conflict {
                        candidate,
                        existing: existing.clone(),
                    });
                }
            }
        }
    }

    result
}
