use crate::model::Problem;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{oneshot, RwLock};
use uuid::Uuid;

/// A submitted problem waiting for a human to accept or reject it.
#[derive(Debug)]
pub struct PendingRequest {
    pub id: String,
    pub problem: Problem,
    decision: oneshot::Sender<bool>,
}

impl PendingRequest {
    /// Create a request under a fresh UUID. The returned receiver completes
    /// once the request is resolved.
    pub fn new(problem: Problem) -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            id: Uuid::new_v4().to_string(),
            problem,
            decision: tx,
        };
        (request, rx)
    }

    /// Complete the decision signal. Returns `false` when the submitter is no
    /// longer waiting for it.
    pub fn complete(self, accepted: bool) -> bool {
        self.decision.send(accepted).is_ok()
    }
}

/// Snapshot of a pending request as exposed to the approval UI.
#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestView {
    pub id: String,
    pub problem: Problem,
}

/// Concurrent map of pending requests keyed by id.
#[derive(Debug, Default)]
pub struct RequestRegistry {
    pending: RwLock<HashMap<String, PendingRequest>>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a request under its id. An existing entry with the same id is
    /// replaced.
    pub async fn add(&self, request: PendingRequest) {
        self.pending.write().await.insert(request.id.clone(), request);
    }

    pub async fn remove(&self, id: &str) -> Option<PendingRequest> {
        self.pending.write().await.remove(id)
    }

    pub async fn list(&self) -> Vec<PendingRequestView> {
        self.pending
            .read()
            .await
            .values()
            .map(|request| PendingRequestView {
                id: request.id.clone(),
                problem: request.problem.clone(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.pending.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.read().await.is_empty()
    }

    /// Remove the request and deliver the decision to its submitter.
    ///
    /// Returns `false` if no request with that id is pending.
    pub async fn resolve(&self, id: &str, accepted: bool) -> bool {
        let Some(request) = self.remove(id).await else {
            return false;
        };
        if !request.complete(accepted) {
            tracing::warn!("submitter of request {} stopped waiting before it was resolved", id);
        }
        true
    }
}
