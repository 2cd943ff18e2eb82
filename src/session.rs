use rusqlite::Connection;

use crate::error::{DineroError, Result};
use crate::ledger::{self, CommitSummary};
use crate::models::{ImportRecord, Transaction};
use crate::reconciler::{Conflict, Reconciliation};

/// What to do with one conflicting candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Discard the candidate; the ledger entry stays as-is.
    KeepOld,
    /// Overwrite the ledger entry's fields, keeping its identifier.
    Replace,
    /// Append the candidate as a new entry; the ledger entry stays as-is.
    KeepBoth,
}

/// A decision applied to every remaining conflict at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkDecision {
    KeepOld,
    Replace,
}

impl std::str::FromStr for BulkDecision {
    type Err = DineroError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "keep-old" => Ok(BulkDecision::KeepOld),
            "replace" => Ok(BulkDecision::Replace),
            other => Err(DineroError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingDecisions,
    Committed,
    Abandoned,
}

/// User-driven resolution of an import's conflicts. The session holds the
/// clean queue and the pending mutations; nothing touches the ledger until
/// every conflict is decided, and then everything lands in one batch.
///
/// The session keeps the exclusive connection borrow for its whole lifetime,
/// so a second import cannot start while one is open. Dropping the session
/// without committing leaves the ledger untouched.
pub struct ResolutionSession<'c> {
    conn: &'c mut Connection,
    record: ImportRecord,
    clean: Vec<Transaction>,
    conflicts: Vec<Conflict>,
    extras: Vec<Transaction>,
    replacements: Vec<(i64, Transaction)>,
    state: SessionState,
}

impl<'c> ResolutionSession<'c> {
    pub(crate) fn new(conn: &'c mut Connection, record: ImportRecord, outcome: Reconciliation) -> Self {
        Self {
            conn,
            record,
            clean: outcome.clean,
            conflicts: outcome.conflicts,
            extras: Vec::new(),
            replacements: Vec::new(),
            state: SessionState::AwaitingDecisions,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn clean_count(&self) -> usize {
        self.clean.len()
    }

    /// Apply one decision. Resolving the final conflict commits the batch,
    /// clean queue included, and returns the summary.
    pub fn resolve(&mut self, index: usize, decision: Decision) -> Result<Option<CommitSummary>> {
        if self.state != SessionState::AwaitingDecisions {
            return Err(DineroError::SessionClosed);
        }
        if index >= self.conflicts.len() {
            return Err(DineroError::UnknownConflict(index));
        }

        let existing_id = self.conflicts[index]
            .existing
            .id
            .ok_or_else(|| DineroError::Other("conflict partner has no ledger id".to_string()))?;
        let conflict = self.conflicts.remove(index);

        match decision {
            Decision::KeepOld => {}
            Decision::Replace => self.replacements.push((existing_id, conflict.candidate)),
            Decision::KeepBoth => self.extras.push(conflict.candidate),
        }

        if self.conflicts.is_empty() {
            return self.commit().map(Some);
        }
        Ok(None)
    }

    /// Apply one decision to all remaining conflicts and commit immediately,
    /// clean queue included.
    pub fn resolve_all(&mut self, decision: BulkDecision) -> Result<CommitSummary> {
        if self.state != SessionState::AwaitingDecisions {
            return Err(DineroError::SessionClosed);
        }

        for conflict in std::mem::take(&mut self.conflicts) {
            if decision == BulkDecision::Replace {
                let existing_id = conflict
                    .existing
                    .id
                    .ok_or_else(|| DineroError::Other("conflict partner has no ledger id".to_string()))?;
                self.replacements.push((existing_id, conflict.candidate));
            }
        }

        self.commit()
    }

    /// Walk away: no ledger mutation, clean queue discarded. Re-importing the
    /// file later re-derives everything.
    pub fn abandon(&mut self) {
        if self.state == SessionState::AwaitingDecisions {
            self.state = SessionState::Abandoned;
            self.clean.clear();
            self.conflicts.clear();
            self.extras.clear();
            self.replacements.clear();
        }
    }

    fn commit(&mut self) -> Result<CommitSummary> {
        // Keep-both appends precede the clean queue, matching decision order.
        let mut appends = std::mem::take(&mut self.extras);
        appends.append(&mut self.clean);

        let summary = ledger::commit_batch(self.conn, &self.record, &appends, &self.replacements)?;
        self.replacements.clear();
        self.state = SessionState::Committed;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::Category;
    use crate::reconciler::reconcile;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn txn(date: &str, description: &str, amount: f64) -> Transaction {
        Transaction {
            id: None,
            date: date.to_string(),
            description: description.to_string(),
            amount,
            category: Category::Other,
        }
    }

    fn record() -> ImportRecord {
        ImportRecord {
            filename: "stmt.csv".to_string(),
            record_count: 0,
            date_range_start: None,
            date_range_end: None,
            checksum: "feed".to_string(),
        }
    }

    /// Seed the ledger, reconcile candidates against it, and open a session.
    fn session_with<'c>(
        conn: &'c mut Connection,
        seed: &[Transaction],
        candidates: Vec<Transaction>,
    ) -> ResolutionSession<'c> {
        for t in seed {
            ledger::insert_transaction(conn, t).unwrap();
        }
        let snapshot = ledger::all_transactions(conn).unwrap();
        let outcome = reconcile(candidates, &snapshot);
        assert!(!outcome.conflicts.is_empty(), "fixture must produce conflicts");
        ResolutionSession::new(conn, record(), outcome)
    }

    #[test]
    fn test_keep_old_discards_candidate() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![txn("2026-01-12", "INCOMING", -400.0)],
        );
        let summary = session.resolve(0, Decision::KeepOld).unwrap().unwrap();
        assert_eq!(summary, CommitSummary { appended: 0, replaced: 0 });
        assert_eq!(session.state(), SessionState::Committed);

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "ORIGINAL");
    }

    #[test]
    fn test_replace_preserves_id() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![txn("2026-01-12", "INCOMING", -400.0)],
        );
        let original_id = session.conflicts()[0].existing.id;
        session.resolve(0, Decision::Replace).unwrap().unwrap();

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, original_id);
        assert_eq!(all[0].description, "INCOMING");
        assert_eq!(all[0].date, "2026-01-12");
    }

    #[test]
    fn test_keep_both_appends_new_entry() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![txn("2026-01-12", "INCOMING", -400.0)],
        );
        session.resolve(0, Decision::KeepBoth).unwrap().unwrap();

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|t| t.description == "ORIGINAL"));
        assert!(all.iter().any(|t| t.description == "INCOMING" && t.id.is_some()));
    }

    #[test]
    fn test_last_resolution_commits_clean_queue() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![
                txn("2026-01-12", "INCOMING", -400.0),
                txn("2026-02-01", "CLEAN ONE", -5.75),
            ],
        );
        assert_eq!(session.clean_count(), 1);
        let summary = session.resolve(0, Decision::KeepOld).unwrap().unwrap();
        assert_eq!(summary.appended, 1);

        let all = ledger::all_transactions(&conn).unwrap();
        assert!(all.iter().any(|t| t.description == "CLEAN ONE"));
    }

    #[test]
    fn test_partial_resolution_does_not_commit() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[
                txn("2026-01-10", "A", -400.0),
                txn("2026-02-10", "B", -60.0),
            ],
            vec![
                txn("2026-01-12", "A NEW", -400.0),
                txn("2026-02-12", "B NEW", -60.0),
                txn("2026-03-01", "CLEAN", -5.0),
            ],
        );
        assert_eq!(session.conflicts().len(), 2);
        assert!(session.resolve(0, Decision::Replace).unwrap().is_none());
        assert_eq!(session.state(), SessionState::AwaitingDecisions);

        // Nothing lands until the final conflict is decided.
        let all = ledger::all_transactions(session_conn(&session)).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|t| t.description == "A" || t.description == "B"));

        let summary = session.resolve(0, Decision::KeepOld).unwrap().unwrap();
        assert_eq!(summary, CommitSummary { appended: 1, replaced: 1 });
    }

    // Read-only peek at the session's connection for mid-session assertions.
    fn session_conn<'a>(session: &'a ResolutionSession<'_>) -> &'a Connection {
        session.conn
    }

    #[test]
    fn test_bulk_keep_old_still_commits_clean_queue() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[
                txn("2026-01-10", "A", -400.0),
                txn("2026-02-10", "B", -60.0),
            ],
            vec![
                txn("2026-01-12", "A NEW", -400.0),
                txn("2026-02-12", "B NEW", -60.0),
                txn("2026-03-01", "CLEAN", -5.0),
            ],
        );
        let summary = session.resolve_all(BulkDecision::KeepOld).unwrap();
        assert_eq!(summary, CommitSummary { appended: 1, replaced: 0 });

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 3);
        // Matched entries stay byte-for-byte as they were.
        let a = all.iter().find(|t| t.description == "A").unwrap();
        assert_eq!((a.date.as_str(), a.amount), ("2026-01-10", -400.0));
        assert!(all.iter().any(|t| t.description == "CLEAN"));
    }

    #[test]
    fn test_bulk_replace_overwrites_all_matches() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[
                txn("2026-01-10", "A", -400.0),
                txn("2026-02-10", "B", -60.0),
            ],
            vec![
                txn("2026-01-12", "A NEW", -400.0),
                txn("2026-02-12", "B NEW", -60.0),
            ],
        );
        let summary = session.resolve_all(BulkDecision::Replace).unwrap();
        assert_eq!(summary, CommitSummary { appended: 0, replaced: 2 });

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|t| t.description.ends_with("NEW")));
    }

    #[test]
    fn test_abandon_leaves_ledger_untouched() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[
                txn("2026-01-10", "ORIGINAL A", -400.0),
                txn("2026-02-10", "ORIGINAL B", -60.0),
            ],
            vec![
                txn("2026-01-12", "INCOMING A", -400.0),
                txn("2026-02-12", "INCOMING B", -60.0),
                txn("2026-03-01", "CLEAN", -5.0),
            ],
        );
        // One pending replace decision, then the user walks away.
        assert!(session.resolve(0, Decision::Replace).unwrap().is_none());
        session.abandon();
        assert_eq!(session.state(), SessionState::Abandoned);
        drop(session);

        let all = ledger::all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|t| t.description.starts_with("ORIGINAL")));
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0)).unwrap();
        assert_eq!(imports, 0);
    }

    #[test]
    fn test_decisions_rejected_after_terminal_state() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![txn("2026-01-12", "INCOMING", -400.0)],
        );
        session.resolve(0, Decision::KeepOld).unwrap();
        assert!(matches!(
            session.resolve(0, Decision::KeepOld),
            Err(DineroError::SessionClosed)
        ));
        assert!(matches!(
            session.resolve_all(BulkDecision::Replace),
            Err(DineroError::SessionClosed)
        ));
    }

    #[test]
    fn test_unknown_conflict_index_is_an_error() {
        let (_dir, mut conn) = test_db();
        let mut session = session_with(
            &mut conn,
            &[txn("2026-01-10", "ORIGINAL", -400.0)],
            vec![txn("2026-01-12", "INCOMING", -400.0)],
        );
        assert!(matches!(
            session.resolve(5, Decision::KeepOld),
            Err(DineroError::UnknownConflict(5))
        ));
        // The session is still usable after the bad index.
        assert_eq!(session.state(), SessionState::AwaitingDecisions);
    }

    #[test]
    fn test_bulk_decision_parsing() {
        assert_eq!("keep-old".parse::<BulkDecision>().unwrap(), BulkDecision::KeepOld);
        assert_eq!("replace".parse::<BulkDecision>().unwrap(), BulkDecision::Replace);
        assert!("merge".parse::<BulkDecision>().is_err());
    }
}
