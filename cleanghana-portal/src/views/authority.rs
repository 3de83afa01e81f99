//! Sanitation authority view model

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cleanghana_core::{lifecycle, Record, RecordDetails, RecordStatus, RecordType};

use crate::store::{RecordFilter, RecordStore};

use super::live::LiveProjection;

/// One waste report as the authority dashboard renders it
#[derive(Debug, Clone, Serialize)]
pub struct ReportCard {
    pub id: String,
    pub description: String,
    #[serde(rename = "wasteCategory")]
    pub waste_category: String,
    #[serde(rename = "imageRef")]
    pub image_ref: String,
    pub address: String,
    pub status: RecordStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Whether the authority may still act on this report; resolved
    /// reports stay listed, rendered de-emphasized
    #[serde(rename = "canResolve")]
    pub can_resolve: bool,
}

/// Derived state of the authority dashboard
#[derive(Debug, Clone, Serialize)]
pub struct AuthorityProjection {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub reports: Vec<ReportCard>,
}

/// Recompute the dashboard from a full snapshot
fn project(records: &[Record]) -> AuthorityProjection {
    let mut reports = Vec::with_capacity(records.len());
    for record in records {
        // The subscription is filtered to waste reports; anything else
        // is skipped
        let RecordDetails::WasteReport {
            description,
            waste_category,
            image_ref,
        } = &record.details
        else {
            continue;
        };
        reports.push(ReportCard {
            id: record.id.0.clone(),
            description: description.clone(),
            waste_category: waste_category.clone(),
            image_ref: image_ref.clone(),
            address: record.location.display_address.clone(),
            status: record.status,
            created_at: record.created_at,
            can_resolve: record.status == lifecycle::initial_status(RecordType::WasteReport),
        });
    }

    AuthorityProjection {
        total: reports.len(),
        pending: reports
            .iter()
            .filter(|r| r.status == RecordStatus::Pending)
            .count(),
        resolved: reports
            .iter()
            .filter(|r| r.status == RecordStatus::Resolved)
            .count(),
        reports,
    }
}

/// Live dashboard for the sanitation authority
pub struct AuthorityViewModel {
    projection: LiveProjection<AuthorityProjection>,
}

impl AuthorityViewModel {
    /// Subscribe to the waste report feed
    pub fn new<R: RecordStore + ?Sized>(store: &R) -> Self {
        let subscription = store.subscribe(RecordFilter::of_type(RecordType::WasteReport));
        Self {
            projection: LiveProjection::spawn(subscription, project),
        }
    }

    pub fn latest(&self) -> Arc<AuthorityProjection> {
        self.projection.latest()
    }
}
