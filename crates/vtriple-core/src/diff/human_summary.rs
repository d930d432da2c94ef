//! Human-readable summary renderer for diff operation lists.

use crate::diff::model::{DiffOperation, DiffStats};

/// Render a Markdown summary of a diff run.
///
/// Informational only; the structured operation list is the source of truth.
pub fn render_human_summary(ops: &[DiffOperation]) -> String {
    let stats = DiffStats::from_ops(ops);
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");

    if stats.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("| Operation | Count |\n|---|---|\n");
    for (label, count) in [
        ("add_subject", stats.add_subject),
        ("remove_subject", stats.remove_subject),
        ("add_predicate", stats.add_predicate),
        ("remove_predicate", stats.remove_predicate),
        ("add_triple", stats.add_triple),
        ("replace_objects", stats.replace_objects),
    ] {
        if count > 0 {
            out.push_str(&format!("| {label} | {count} |\n"));
        }
    }
    out.push('\n');

    out.push_str("### Changes\n\n");
    for op in ops {
        out.push_str("- ");
        out.push_str(&describe(op));
        out.push('\n');
    }

    out
}

fn describe(op: &DiffOperation) -> String {
    match op {
        DiffOperation::AddSubject { subject } => format!("**+ subject** `{subject}`"),
        DiffOperation::RemoveSubject { subject } => format!("**- subject** `{subject}`"),
        DiffOperation::AddPredicate { subject, predicate } => {
            format!("`{subject}` **+ {predicate}** (empty)")
        }
        DiffOperation::RemovePredicate { subject, predicate } => {
            format!("`{subject}` **- {predicate}**")
        }
        DiffOperation::AddTriple {
            subject,
            predicate,
            value,
            order,
        } => format!("`{subject}` **+ {predicate}**[{order}] = {value}"),
        DiffOperation::ReplaceObjects {
            subject,
            predicate,
            values,
        } => {
            if values.is_empty() {
                format!("`{subject}` **~ {predicate}** cleared")
            } else {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("`{subject}` **~ {predicate}** = [{}]", rendered.join(", "))
            }
        }
    }
}
