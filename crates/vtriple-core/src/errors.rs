use vtriple_core_types::{RequestId, TraceId};

/// Result type alias using VtError
pub type Result<T> = std::result::Result<T, VtError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtErrorKind {
    // Input validation
    /// A snapshot argument is missing/null, malformed, or an object lacks `@id`
    InvalidInput,

    // Storage
    /// An interning or statement-execution call failed
    StorageUnavailable,
    /// A pipeline failed after at least one statement had been applied
    PartialApplication,
    /// A schema migration failed or its recorded checksum disagrees
    Migration,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl VtErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            VtErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            VtErrorKind::StorageUnavailable => "ERR_STORAGE_UNAVAILABLE",
            VtErrorKind::PartialApplication => "ERR_PARTIAL_APPLICATION",
            VtErrorKind::Migration => "ERR_MIGRATION",
            VtErrorKind::Io => "ERR_IO",
            VtErrorKind::Serialization => "ERR_SERIALIZATION",
            VtErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus enough
/// context (operation, diff type, subject, predicate) to tell what a failed
/// run had already applied.
#[derive(Debug, Clone)]
pub struct VtError {
    kind: VtErrorKind,
    op: Option<String>,
    subject: Option<String>,
    predicate: Option<String>,
    diff_type: Option<String>,
    statements_applied: Option<usize>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<VtError>>,
}

impl VtError {
    /// Create a new error with the specified kind
    pub fn new(kind: VtErrorKind) -> Self {
        Self {
            kind,
            op: None,
            subject: None,
            predicate: None,
            diff_type: None,
            statements_applied: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add subject context
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add predicate context
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Add the diff type of the offending operation
    pub fn with_diff_type(mut self, diff_type: impl Into<String>) -> Self {
        self.diff_type = Some(diff_type.into());
        self
    }

    /// Record how many statements completed before the failure
    pub fn with_statements_applied(mut self, applied: usize) -> Self {
        self.statements_applied = Some(applied);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: VtError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> VtErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    pub fn diff_type(&self) -> Option<&str> {
        self.diff_type.as_deref()
    }

    pub fn statements_applied(&self) -> Option<usize> {
        self.statements_applied
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&VtError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for VtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(diff_type) = &self.diff_type {
            write!(f, " (diff_type: {})", diff_type)?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " (subject: {})", subject)?;
        }
        if let Some(predicate) = &self.predicate {
            write!(f, " (predicate: {})", predicate)?;
        }
        if let Some(applied) = self.statements_applied {
            write!(f, " (statements_applied: {})", applied)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for VtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for VtError {
    fn from(err: serde_json::Error) -> Self {
        VtError::new(VtErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Shorthand for an `InvalidInput` error raised while reading a snapshot
pub(crate) fn invalid_input(op: &str, message: impl Into<String>) -> VtError {
    VtError::new(VtErrorKind::InvalidInput)
        .with_op(op)
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (VtErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
            (VtErrorKind::StorageUnavailable, "ERR_STORAGE_UNAVAILABLE"),
            (VtErrorKind::PartialApplication, "ERR_PARTIAL_APPLICATION"),
            (VtErrorKind::Migration, "ERR_MIGRATION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = VtError::new(VtErrorKind::StorageUnavailable)
            .with_op("latest_delete")
            .with_diff_type("remove_predicate")
            .with_subject("s1")
            .with_predicate("name")
            .with_message("disk I/O error");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_STORAGE_UNAVAILABLE] in operation 'latest_delete'"));
        assert!(rendered.contains("(subject: s1)"));
        assert!(rendered.contains("(predicate: name)"));
        assert!(rendered.contains("(diff_type: remove_predicate)"));
    }

    #[test]
    fn test_source_chain() {
        let inner = VtError::new(VtErrorKind::StorageUnavailable).with_message("locked");
        let outer = VtError::new(VtErrorKind::PartialApplication)
            .with_statements_applied(2)
            .with_source(inner);

        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(VtErrorKind::StorageUnavailable)
        );
        assert!(std::error::Error::source(&outer).is_some());
        assert_eq!(outer.statements_applied(), Some(2));
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: VtError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), VtErrorKind::Serialization);
    }
}
