pub mod object;
pub mod snapshot;
pub mod value;

pub use object::{is_reserved_key, Object};
pub use snapshot::Snapshot;
pub use value::{Value, ValueKind};

/// Caller-assigned version number a diff run is recorded under
pub type Version = i64;
