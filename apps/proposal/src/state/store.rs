//! # Proposal Store
//!
//! In-memory home for the proposals being edited.
//!
//! ## Thread Safety
//! The map is wrapped in `Arc<Mutex<T>>` because the editor and the
//! assistant can issue commands against the same proposal concurrently,
//! and each edit must see the previous one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, ApiResult};
use crate::state::Proposal;

/// Shared proposal state.
#[derive(Debug, Clone, Default)]
pub struct ProposalStore {
    proposals: Arc<Mutex<HashMap<String, Proposal>>>,
}

impl ProposalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with access to every proposal.
    pub fn with_proposals<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut HashMap<String, Proposal>) -> R,
    {
        let mut proposals = self
            .proposals
            .lock()
            .map_err(|_| ApiError::internal("Proposal store lock poisoned"))?;
        Ok(f(&mut proposals))
    }

    /// Executes a function with read access to one proposal.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = store.with_proposal(&id, |p| p.total_amount_cents)?;
    /// ```
    pub fn with_proposal<F, R>(&self, id: &str, f: F) -> ApiResult<R>
    where
        F: FnOnce(&Proposal) -> R,
    {
        self.with_proposals(|proposals| proposals.get(id).map(f))?
            .ok_or_else(|| ApiError::not_found("Proposal", id))
    }

    /// Executes a function with write access to one proposal.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// store.with_proposal_mut(&id, |p| p.remove_line_item(&item_id))??;
    /// ```
    pub fn with_proposal_mut<F, R>(&self, id: &str, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut Proposal) -> R,
    {
        self.with_proposals(|proposals| proposals.get_mut(id).map(f))?
            .ok_or_else(|| ApiError::not_found("Proposal", id))
    }

    /// Adds a proposal, returning its ID.
    pub fn insert(&self, proposal: Proposal) -> ApiResult<String> {
        let id = proposal.id.clone();
        self.with_proposals(|proposals| {
            proposals.insert(id.clone(), proposal);
        })?;
        Ok(id)
    }

    /// Removes a proposal.
    pub fn remove(&self, id: &str) -> ApiResult<Proposal> {
        self.with_proposals(|proposals| proposals.remove(id))?
            .ok_or_else(|| ApiError::not_found("Proposal", id))
    }

    /// Number of proposals held.
    pub fn len(&self) -> ApiResult<usize> {
        self.with_proposals(|proposals| proposals.len())
    }

    pub fn is_empty(&self) -> ApiResult<bool> {
        self.len().map(|n| n == 0)
    }
}
