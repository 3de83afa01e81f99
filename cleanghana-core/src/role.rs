//! User roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who is acting on the system
///
/// The role is chosen explicitly at login; it is not part of the stored
/// identity. Citizens create records, authorities resolve waste reports,
/// recyclers collect recycling requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Authority,
    Recycler,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Authority => "authority",
            Role::Recycler => "recycler",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "citizen" => Some(Role::Citizen),
            "authority" => Some(Role::Authority),
            "recycler" => Some(Role::Recycler),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
