//! Versioned apply orchestration.
//!
//! ## Pipeline (in order):
//! 1. Open a transaction (skipped for dry runs)
//! 2. Resolve the old snapshot (given, or the stored latest view)
//! 3. Diff old against new
//! 4. Intern and plan history rows, latest deletes and latest inserts
//! 5. dry_run short-circuit (plan built on an in-memory interner, no writes)
//! 6. Run the pipeline and commit
//!
//! Any error drops the transaction, so a failed run leaves the store as it
//! was before the run started.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;
use vtriple_core::diff::{diff_snapshots, render_human_summary, DiffOperation, DiffStats};
use vtriple_core::errors::VtError;
use vtriple_core::intern::MemoryInterner;
use vtriple_core::model::{Snapshot, Version};
use vtriple_core::pipeline::{plan_mutations, run_pipeline, MutationPlan};
use vtriple_core::{log_op_end, log_op_error, log_op_start};
use vtriple_core_types::RequestContext;
use vtriple_store::errors::{from_rusqlite, Result};
use vtriple_store::query::load_latest;
use vtriple_store::{SqliteExecutor, SqliteInterner};

/// Options for an apply or commit run.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// If true, compute the diff and plan but don't write anything
    pub dry_run: bool,
    /// Correlation ids attached to logs and errors; a fresh context is
    /// created when absent
    pub context: Option<RequestContext>,
}

/// Result of an apply or commit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub version: Version,
    pub dry_run: bool,
    pub stats: DiffStats,
    pub ops: Vec<DiffOperation>,
    /// History log rows written (or planned, in a dry run)
    pub history_rows: usize,
    /// Latest-view delete statements
    pub latest_deletes: usize,
    /// Latest-view rows queued for insertion
    pub latest_inserts: usize,
    /// Statements executed; always 0 in a dry run
    pub statements_executed: usize,
}

impl ApplyOutcome {
    fn new(
        version: Version,
        dry_run: bool,
        ops: Vec<DiffOperation>,
        plan: &MutationPlan,
        statements_executed: usize,
    ) -> Self {
        Self {
            version,
            dry_run,
            stats: DiffStats::from_ops(&ops),
            history_rows: plan.history_rows(),
            latest_deletes: plan.latest_deletes.len(),
            latest_inserts: plan.latest_insert_rows(),
            ops,
            statements_executed,
        }
    }
}

/// Store-free diff output for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffPreview {
    pub ops: Vec<DiffOperation>,
    pub stats: DiffStats,
    pub summary: String,
}

/// Diff two snapshots without touching a store.
pub fn preview_diff(old: &Snapshot, new: &Snapshot) -> DiffPreview {
    let ops = diff_snapshots(old, new);
    DiffPreview {
        stats: DiffStats::from_ops(&ops),
        summary: render_human_summary(&ops),
        ops,
    }
}

/// Apply the diff between two caller-supplied snapshots as `version`.
///
/// # Errors
///
/// - `StorageUnavailable`: interning or a statement failed on the first
///   statement, or the transaction could not be opened or committed
/// - `PartialApplication`: a statement failed after others had run; the
///   transaction is rolled back so none of them persist
pub fn apply_version(
    conn: &mut Connection,
    old: &Snapshot,
    new: &Snapshot,
    version: Version,
    options: &ApplyOptions,
) -> Result<ApplyOutcome> {
    run_logged("apply_version", conn, new, version, options, |_| {
        Ok(old.clone())
    })
}

/// Apply `new` as `version`, diffing against the stored latest view.
///
/// The latest view is read inside the same transaction that writes the
/// changes.
///
/// # Errors
///
/// As [`apply_version`], plus any failure reading the latest view.
pub fn commit_version(
    conn: &mut Connection,
    new: &Snapshot,
    version: Version,
    options: &ApplyOptions,
) -> Result<ApplyOutcome> {
    run_logged("commit_version", conn, new, version, options, load_latest)
}

fn run_logged<F>(
    op: &str,
    conn: &mut Connection,
    new: &Snapshot,
    version: Version,
    options: &ApplyOptions,
    load_old: F,
) -> Result<ApplyOutcome>
where
    F: FnOnce(&Connection) -> Result<Snapshot>,
{
    let ctx = options.context.clone().unwrap_or_default();
    let start = Instant::now();
    log_op_start!(
        op,
        version = version,
        dry_run = options.dry_run,
        request_id = %ctx.request_id
    );

    let result = if options.dry_run {
        plan_only(conn, new, version, load_old)
    } else {
        apply_in_transaction(conn, new, version, load_old)
    };

    match result {
        Ok(outcome) => {
            log_op_end!(
                op,
                duration_ms = start.elapsed().as_millis() as u64,
                version = version,
                ops_len = outcome.ops.len(),
                statements = outcome.statements_executed
            );
            Ok(outcome)
        }
        Err(err) => {
            let err = correlate(err, &ctx);
            log_op_error!(
                op,
                err,
                duration_ms = start.elapsed().as_millis() as u64,
                version = version
            );
            Err(err)
        }
    }
}

fn apply_in_transaction<F>(
    conn: &mut Connection,
    new: &Snapshot,
    version: Version,
    load_old: F,
) -> Result<ApplyOutcome>
where
    F: FnOnce(&Connection) -> Result<Snapshot>,
{
    let tx = conn.transaction().map_err(from_rusqlite)?;

    let old = load_old(&tx)?;
    let ops = diff_snapshots(&old, new);
    let plan = plan_mutations(&ops, version, &mut SqliteInterner::new(&tx))?;
    let report = run_pipeline(&mut SqliteExecutor::new(&tx), &plan)?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(ApplyOutcome::new(
        version,
        false,
        ops,
        &plan,
        report.statements_executed,
    ))
}

fn plan_only<F>(conn: &Connection, new: &Snapshot, version: Version, load_old: F) -> Result<ApplyOutcome>
where
    F: FnOnce(&Connection) -> Result<Snapshot>,
{
    let old = load_old(conn)?;
    let ops = diff_snapshots(&old, new);
    let plan = plan_mutations(&ops, version, &mut MemoryInterner::new())?;
    Ok(ApplyOutcome::new(version, true, ops, &plan, 0))
}

fn correlate(err: VtError, ctx: &RequestContext) -> VtError {
    let err = err.with_request_id(ctx.request_id.clone());
    match &ctx.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}
