//! Role view models
//!
//! Each role gets its own projection of the shared collection. Authority
//! and recycler view models hold a live subscription for the lifetime of
//! their session; the citizen view model is a stateless submission path.
//! The registry owns the per-session view models and tears them down on
//! logout, so no subscription outlives its session.

pub mod authority;
pub mod citizen;
pub mod live;
pub mod recycler;

pub use authority::{AuthorityProjection, AuthorityViewModel, ReportCard};
pub use citizen::{CitizenViewModel, ImageUpload, RecyclingRequestForm, WasteReportForm};
pub use live::LiveProjection;
pub use recycler::{RecyclerProjection, RecyclerViewModel, RequestCard};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cleanghana_core::{lifecycle, Record, RecordId, Role};

use crate::error::PortalError;
use crate::session::SessionId;
use crate::store::RecordStore;

/// The view model backing one session
pub enum RoleView {
    /// Citizens only create; nothing to keep alive between requests
    Citizen,
    Authority(AuthorityViewModel),
    Recycler(RecyclerViewModel),
}

impl RoleView {
    /// Build the view model for a freshly chosen role
    pub fn for_role<R: RecordStore + ?Sized>(role: Role, store: &R) -> Self {
        match role {
            Role::Citizen => RoleView::Citizen,
            Role::Authority => RoleView::Authority(AuthorityViewModel::new(store)),
            Role::Recycler => RoleView::Recycler(RecyclerViewModel::new(store)),
        }
    }
}

/// Per-session view models, torn down on logout
pub struct ViewRegistry {
    views: RwLock<HashMap<SessionId, RoleView>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, session_id: SessionId, view: RoleView) {
        self.views.write().unwrap().insert(session_id, view);
    }

    /// Drop a session's view model, cancelling its subscription
    pub fn remove(&self, session_id: &SessionId) {
        self.views.write().unwrap().remove(session_id);
    }

    pub fn authority_projection(
        &self,
        session_id: &SessionId,
    ) -> Option<Arc<AuthorityProjection>> {
        match self.views.read().unwrap().get(session_id) {
            Some(RoleView::Authority(view)) => Some(view.latest()),
            _ => None,
        }
    }

    pub fn recycler_projection(&self, session_id: &SessionId) -> Option<Arc<RecyclerProjection>> {
        match self.views.read().unwrap().get(session_id) {
            Some(RoleView::Recycler(view)) => Some(view.latest()),
            _ => None,
        }
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a role's forward transition against the store
///
/// The lifecycle engine authorizes and decides; only an `Applied`
/// outcome issues a write, so repeating a transition on a terminal
/// record is a read-only no-op.
pub fn apply_transition<R: RecordStore + ?Sized>(
    store: &R,
    id: &RecordId,
    role: Role,
) -> Result<Record, PortalError> {
    let record = store.get(id)?.ok_or(PortalError::RecordNotFound)?;

    match lifecycle::advance(record.record_type(), record.status, role)? {
        lifecycle::Transition::Applied(next) => store.update_status(id, next),
        lifecycle::Transition::AlreadyTerminal(_) => Ok(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRecordStore;
    use cleanghana_core::{
        Location, NewRecord, RecordDetails, RecordStatus, PLACEHOLDER_IMAGE_REF,
    };

    fn create_report(store: &InMemoryRecordStore) -> Record {
        store
            .create(NewRecord {
                details: RecordDetails::WasteReport {
                    description: "Overflowing bin".to_string(),
                    waste_category: "General".to_string(),
                    image_ref: PLACEHOLDER_IMAGE_REF.to_string(),
                },
                location: Some(Location::new(5.6037, -0.1870, "Legon, Accra")),
                reporter_id: "anon-1".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_transition_applies_once_then_noops() {
        let store = InMemoryRecordStore::new();
        let report = create_report(&store);

        let resolved = apply_transition(&store, &report.id, Role::Authority).unwrap();
        assert_eq!(resolved.status, RecordStatus::Resolved);

        // Double submission: same terminal state, no error
        let again = apply_transition(&store, &report.id, Role::Authority).unwrap();
        assert_eq!(again.status, RecordStatus::Resolved);
    }

    #[test]
    fn test_transition_rejects_the_wrong_role() {
        let store = InMemoryRecordStore::new();
        let report = create_report(&store);

        let err = apply_transition(&store, &report.id, Role::Recycler).unwrap_err();
        assert!(matches!(err, PortalError::Forbidden(_)));

        // The record is untouched
        assert_eq!(
            store.get(&report.id).unwrap().unwrap().status,
            RecordStatus::Pending
        );
    }

    #[test]
    fn test_transition_unknown_record_is_not_found() {
        let store = InMemoryRecordStore::new();
        let err = apply_transition(&store, &RecordId("missing".to_string()), Role::Authority)
            .unwrap_err();
        assert!(matches!(err, PortalError::RecordNotFound));
    }

    #[tokio::test]
    async fn test_registry_teardown_drops_the_view() {
        let store = InMemoryRecordStore::new();
        let registry = ViewRegistry::new();
        let session_id = SessionId("s-1".to_string());

        registry.insert(
            session_id.clone(),
            RoleView::for_role(Role::Authority, &store),
        );
        assert!(registry.authority_projection(&session_id).is_some());

        registry.remove(&session_id);
        assert!(registry.authority_projection(&session_id).is_none());
    }
}
