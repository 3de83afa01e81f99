//! Live projection over a store subscription
//!
//! A [`LiveProjection`] owns the consumer task for one subscription and
//! re-derives an immutable projection from every delivered snapshot.
//! Dropping it aborts the task, so a torn-down view model can never
//! mutate state again; a closed stream simply leaves the last good
//! projection in place.

use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;

use cleanghana_core::Record;

use crate::store::Subscription;

pub struct LiveProjection<P> {
    current: Arc<RwLock<Arc<P>>>,
    task: JoinHandle<()>,
}

impl<P: Send + Sync + 'static> LiveProjection<P> {
    /// Start consuming the subscription, deriving a projection per
    /// snapshot. The projection of the empty collection stands in until
    /// the initial snapshot arrives.
    pub fn spawn<F>(mut subscription: Subscription, project: F) -> Self
    where
        F: Fn(&[Record]) -> P + Send + 'static,
    {
        let current = Arc::new(RwLock::new(Arc::new(project(&[]))));
        let slot = Arc::clone(&current);

        let task = tokio::spawn(async move {
            while let Some(snapshot) = subscription.recv().await {
                let next = Arc::new(project(&snapshot));
                *slot.write().unwrap() = next;
            }
            // Stream closed: stay on the last good snapshot
        });

        Self { current, task }
    }

    /// The most recently derived projection
    pub fn latest(&self) -> Arc<P> {
        Arc::clone(&self.current.read().unwrap())
    }
}

impl<P> Drop for LiveProjection<P> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
