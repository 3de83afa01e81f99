//! CleanGhana Core Library
//!
//! Implements the shared record model for citizen waste reporting:
//! - Citizens create waste reports and recycling pickup requests
//! - Authorities resolve waste reports, recyclers collect requests
//! - The lifecycle engine governs which role may move a record forward

pub mod error;
pub mod lifecycle;
pub mod location;
pub mod record;
pub mod role;

pub use error::Error;
pub use lifecycle::{advance, initial_status, terminal_status, Transition};
pub use location::Location;
pub use record::{
    MaterialType, NewRecord, Record, RecordDetails, RecordId, RecordStatus, RecordType,
    PLACEHOLDER_IMAGE_REF,
};
pub use role::Role;

/// Result type for cleanghana-core operations
pub type Result<T> = std::result::Result<T, Error>;
