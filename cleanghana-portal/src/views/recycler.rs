//! Recycler view model

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cleanghana_core::{lifecycle, MaterialType, Record, RecordDetails, RecordStatus, RecordType};

use crate::store::{RecordFilter, RecordStore};

use super::live::LiveProjection;

/// One pickup request as the recycler dashboard renders it
#[derive(Debug, Clone, Serialize)]
pub struct RequestCard {
    pub id: String,
    #[serde(rename = "materialType")]
    pub material_type: MaterialType,
    #[serde(rename = "quantityEstimate")]
    pub quantity_estimate: String,
    pub address: String,
    pub status: RecordStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "canCollect")]
    pub can_collect: bool,
}

/// Derived state of the recycler dashboard
#[derive(Debug, Clone, Serialize)]
pub struct RecyclerProjection {
    pub total: usize,
    pub ready: usize,
    pub collected: usize,
    pub requests: Vec<RequestCard>,
}

fn project(records: &[Record]) -> RecyclerProjection {
    let mut requests = Vec::with_capacity(records.len());
    for record in records {
        let RecordDetails::RecyclingRequest {
            material_type,
            quantity_estimate,
        } = &record.details
        else {
            continue;
        };
        requests.push(RequestCard {
            id: record.id.0.clone(),
            material_type: *material_type,
            quantity_estimate: quantity_estimate.clone(),
            address: record.location.display_address.clone(),
            status: record.status,
            created_at: record.created_at,
            can_collect: record.status == lifecycle::initial_status(RecordType::RecyclingRequest),
        });
    }

    RecyclerProjection {
        total: requests.len(),
        ready: requests
            .iter()
            .filter(|r| r.status == RecordStatus::Ready)
            .count(),
        collected: requests
            .iter()
            .filter(|r| r.status == RecordStatus::Collected)
            .count(),
        requests,
    }
}

/// Live dashboard for the recycling company
pub struct RecyclerViewModel {
    projection: LiveProjection<RecyclerProjection>,
}

impl RecyclerViewModel {
    /// Subscribe to the pickup request feed
    pub fn new<R: RecordStore + ?Sized>(store: &R) -> Self {
        let subscription = store.subscribe(RecordFilter::of_type(RecordType::RecyclingRequest));
        Self {
            projection: LiveProjection::spawn(subscription, project),
        }
    }

    pub fn latest(&self) -> Arc<RecyclerProjection> {
        self.projection.latest()
    }
}
