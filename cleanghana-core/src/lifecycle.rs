//! Record lifecycle engine
//!
//! Each record type has exactly one forward transition, performed by
//! exactly one role:
//!
//! - waste report: `pending -> resolved`, by the sanitation authority
//! - recycling request: `ready -> collected`, by the recycler
//!
//! Transitions are idempotent against double-submission: advancing a
//! record that is already terminal is a no-op, not an error. Nothing ever
//! moves a record backward, and terminal records stay visible in the
//! dashboards (rendered de-emphasized) rather than being removed.

use crate::error::Error;
use crate::record::{RecordStatus, RecordType};
use crate::role::Role;

/// Outcome of a permitted transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The record moves to this status; the caller should persist it.
    Applied(RecordStatus),
    /// The record is already terminal; nothing to persist.
    AlreadyTerminal(RecordStatus),
}

impl Transition {
    /// The status the record holds after the transition request
    pub fn status(&self) -> RecordStatus {
        match self {
            Transition::Applied(status) | Transition::AlreadyTerminal(status) => *status,
        }
    }
}

/// Status a record of this type is created in
pub fn initial_status(record_type: RecordType) -> RecordStatus {
    match record_type {
        RecordType::WasteReport => RecordStatus::Pending,
        RecordType::RecyclingRequest => RecordStatus::Ready,
    }
}

/// Status a record of this type ends in
pub fn terminal_status(record_type: RecordType) -> RecordStatus {
    match record_type {
        RecordType::WasteReport => RecordStatus::Resolved,
        RecordType::RecyclingRequest => RecordStatus::Collected,
    }
}

/// Role allowed to advance a record of this type
pub fn permitted_role(record_type: RecordType) -> Role {
    match record_type {
        RecordType::WasteReport => Role::Authority,
        RecordType::RecyclingRequest => Role::Recycler,
    }
}

/// Request the forward transition for a record
///
/// Authorization is checked first: the wrong role is rejected even on a
/// record that is already terminal. A status that does not belong to the
/// record type is rejected; the store gateway never produces such a
/// pairing.
pub fn advance(
    record_type: RecordType,
    current: RecordStatus,
    role: Role,
) -> Result<Transition, Error> {
    if role != permitted_role(record_type) {
        return Err(Error::RoleNotPermitted { role, record_type });
    }

    let initial = initial_status(record_type);
    let terminal = terminal_status(record_type);

    if current == terminal {
        Ok(Transition::AlreadyTerminal(terminal))
    } else if current == initial {
        Ok(Transition::Applied(terminal))
    } else {
        Err(Error::StatusMismatch {
            status: current,
            record_type,
        })
    }
}
