//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between declaration,
//! secondary fetches and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Model identifiers
pub const FIELD_MODEL: &str = "model";
pub const FIELD_TABLE: &str = "table";
pub const FIELD_COLUMN: &str = "column";
pub const FIELD_PRIMARY_KEY: &str = "primary_key";

// Collection sizes and outcomes
pub const FIELD_LAZY_LEN: &str = "lazy_len";
pub const FIELD_MISSING_LEN: &str = "missing_len";
pub const FIELD_MERGED: &str = "merged";
pub const FIELD_DECLARED: &str = "declared";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Free-form event text, as tracing records it
pub const FIELD_MESSAGE: &str = "message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_INSTALL: &str = "install";
pub const OP_LAZY_LOAD: &str = "lazy_load";
pub const OP_LAZY_FETCH: &str = "lazy_fetch";
pub const OP_READ_ATTRIBUTE: &str = "read_attribute";
