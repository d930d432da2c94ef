//! Mutation pipeline: plan the statements for a diff run and execute them
//! in order.
//!
//! Phase order is fixed: history append, then latest-view deletes, then
//! latest-view inserts. Execution is sequential and stops at the first
//! failing statement.

use crate::diff::DiffOperation;
use crate::errors::{Result, VtError, VtErrorKind};
use crate::history::{encode_history, history_statement};
use crate::intern::Interner;
use crate::latest::{materialize_latest, FIRST_ORDER};
use crate::model::Version;
use crate::statement::{Phase, Statement};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Applies a single statement to the backing store
pub trait StatementExecutor {
    /// Execute `statement`, returning the number of rows it touched.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the store rejects the statement.
    fn execute(&mut self, statement: &Statement) -> Result<usize>;
}

impl<E: StatementExecutor + ?Sized> StatementExecutor for &mut E {
    fn execute(&mut self, statement: &Statement) -> Result<usize> {
        (**self).execute(statement)
    }
}

/// Ordered statements for one diff run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationPlan {
    pub version: Version,
    pub ops_len: usize,
    pub history: Vec<Statement>,
    pub latest_deletes: Vec<Statement>,
    pub latest_inserts: Vec<Statement>,
}

impl MutationPlan {
    pub fn statement_count(&self) -> usize {
        self.history.len() + self.latest_deletes.len() + self.latest_inserts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statement_count() == 0
    }

    pub fn history_rows(&self) -> usize {
        self.history.iter().map(Statement::row_count).sum()
    }

    pub fn latest_insert_rows(&self) -> usize {
        self.latest_inserts.iter().map(Statement::row_count).sum()
    }

    /// All statements in execution order
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.history
            .iter()
            .chain(&self.latest_deletes)
            .chain(&self.latest_inserts)
    }

    fn phases(&self) -> [(Phase, &[Statement]); 3] {
        [
            (Phase::History, self.history.as_slice()),
            (Phase::LatestDelete, self.latest_deletes.as_slice()),
            (Phase::LatestInsert, self.latest_inserts.as_slice()),
        ]
    }
}

/// Intern everything `ops` needs and build the run's statements.
///
/// An empty `ops` yields an empty plan.
///
/// # Errors
///
/// Propagates the interner's failure with the offending operation's context.
pub fn plan_mutations<I: Interner + ?Sized>(
    ops: &[DiffOperation],
    version: Version,
    interner: &mut I,
) -> Result<MutationPlan> {
    let history_rows = encode_history(ops, version, interner)?;
    let latest = materialize_latest(ops, interner, FIRST_ORDER)?;
    let (latest_deletes, latest_inserts) = latest.into_statements();

    Ok(MutationPlan {
        version,
        ops_len: ops.len(),
        history: history_statement(history_rows).into_iter().collect(),
        latest_deletes,
        latest_inserts,
    })
}

/// Outcome of a completed pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub statements_executed: usize,
    pub rows_affected: usize,
}

/// Execute `plan` phase by phase.
///
/// A failure on the very first statement is returned as-is. A failure after
/// at least one statement has run is wrapped in `PartialApplication`, with
/// the store's error as its source, so callers know to roll back.
///
/// # Errors
///
/// See above; both cases carry `statements_applied` and the failing
/// statement's diff type, subject and predicate where known.
pub fn run_pipeline<E: StatementExecutor + ?Sized>(
    executor: &mut E,
    plan: &MutationPlan,
) -> Result<PipelineReport> {
    let mut report = PipelineReport::default();

    for (phase, statements) in plan.phases() {
        if statements.is_empty() {
            continue;
        }
        let op = phase.as_str();
        let rows: usize = statements.iter().map(Statement::row_count).sum();
        let start = Instant::now();
        log_op_start!(
            op,
            version = plan.version,
            statements = statements.len(),
            rows = rows
        );

        for statement in statements {
            match executor.execute(statement) {
                Ok(affected) => {
                    report.statements_executed += 1;
                    report.rows_affected += affected;
                }
                Err(err) => {
                    let err = failure(err, phase, statement, report.statements_executed);
                    log_op_error!(
                        op,
                        err,
                        duration_ms = start.elapsed().as_millis() as u64,
                        version = plan.version,
                        statements_applied = report.statements_executed
                    );
                    return Err(err);
                }
            }
        }

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            version = plan.version,
            statements = statements.len()
        );
    }

    Ok(report)
}

fn failure(err: VtError, phase: Phase, statement: &Statement, applied: usize) -> VtError {
    let ctx = statement.context();
    let with_context = |mut e: VtError| {
        if let Some(diff_type) = ctx.diff_type {
            e = e.with_diff_type(diff_type.as_str());
        }
        if let Some(subject) = &ctx.subject {
            e = e.with_subject(subject.clone());
        }
        if let Some(predicate) = &ctx.predicate {
            e = e.with_predicate(predicate.clone());
        }
        e.with_op(phase.as_str()).with_statements_applied(applied)
    };

    if applied == 0 {
        with_context(err)
    } else {
        with_context(
            VtError::new(VtErrorKind::PartialApplication)
                .with_message(format!(
                    "{} statement(s) applied before failure; roll back the enclosing transaction",
                    applied
                ))
                .with_source(err),
        )
    }
}
