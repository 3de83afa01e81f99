//! Error types for CleanGhana core

use thiserror::Error;

use crate::record::{RecordStatus, RecordType};
use crate::role::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Role {role} may not transition a {record_type}")]
    RoleNotPermitted { role: Role, record_type: RecordType },

    #[error("Status {status} does not belong to a {record_type}")]
    StatusMismatch {
        status: RecordStatus,
        record_type: RecordType,
    },
}
