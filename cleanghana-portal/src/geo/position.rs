//! Device positioning capability

use std::future::Future;

use thiserror::Error;

/// Raw coordinates from the positioning capability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a single-shot position request failed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    Unavailable,

    #[error("Timed out waiting for a position")]
    Timeout,
}

/// Single-shot "get current position" capability
///
/// One request per call, no continuous tracking. A platform without any
/// positioning capability reports `supported() == false` and is never
/// asked for a position.
pub trait PositionSource: Send + Sync {
    fn supported(&self) -> bool {
        true
    }

    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send;
}

/// Platform with no positioning capability (headless deployments)
pub struct UnsupportedPositionSource;

impl PositionSource for UnsupportedPositionSource {
    fn supported(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Position, PositionError> {
        Err(PositionError::Unavailable)
    }
}

/// Position source pinned to fixed coordinates (demo deployments, tests)
pub struct FixedPositionSource {
    position: Position,
}

impl FixedPositionSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position {
                latitude,
                longitude,
            },
        }
    }
}

impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<Position, PositionError> {
        Ok(self.position)
    }
}
