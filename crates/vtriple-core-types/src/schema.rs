//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_SUBJECT: &str = "subject";
pub const FIELD_PREDICATE: &str = "predicate";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_DIFF_TYPE: &str = "diff_type";

// Batch sizes
pub const FIELD_OPS_LEN: &str = "ops_len";
pub const FIELD_HISTORY_ROWS: &str = "history_rows";
pub const FIELD_LATEST_DELETES: &str = "latest_deletes";
pub const FIELD_LATEST_INSERTS: &str = "latest_inserts";
pub const FIELD_STATEMENTS: &str = "statements";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
