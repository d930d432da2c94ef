//! Canonical logging macros
//!
//! Every macro stamps `component`, `op` and `event`; extra fields pass
//! through unchanged.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use vtriple_core::log_op_start;
/// log_op_start!("history_append");
/// log_op_start!("history_append", version = 3_i64, history_rows = 12_usize);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use vtriple_core::log_op_end;
/// log_op_end!("latest_insert", duration_ms = 4);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is borrowed and must be a [`VtError`](crate::errors::VtError).
///
/// # Example
///
/// ```
/// # use vtriple_core::log_op_error;
/// # use vtriple_core::errors::{VtError, VtErrorKind};
/// let err = VtError::new(VtErrorKind::StorageUnavailable).with_message("locked");
/// log_op_error!("latest_delete", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let vt_err: &$crate::errors::VtError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?vt_err.kind(),
            err.code = vt_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let vt_err: &$crate::errors::VtError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?vt_err.kind(),
            err.code = vt_err.code(),
            $($field)*
        );
    }};
}
