//! # Proposal Commands
//!
//! Commands the proposal editor and the AI assistant call.
//!
//! ## Proposal Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Proposal Lifecycle                                   │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Create  │────►│  Build   │────►│  Price   │────►│  Review  │       │
//! │  │          │     │  grid    │     │          │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │                   add_line_item     set_pricing     get_breakdown      │
//! │                   update_line_item                                     │
//! │                   remove_line_item                                     │
//! │                   add_add_on                                           │
//! │                   remove_add_on                                        │
//! │                                                                         │
//! │  Every edit returns the updated proposal with its refreshed total.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use roofquote_core::{BreakdownSummary, CostBreakdown, LineItem, PricingParameters};

use crate::error::{ApiError, ApiResult};
use crate::state::{ItemOrigin, ItemWarnings, LineItemPatch, Proposal, ProposalStore, QuoteConfig};

/// Request to start a proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub client_name: String,
    #[serde(default)]
    pub project_address: String,
    /// Falls back to the configured defaults.
    #[serde(default)]
    pub pricing: Option<PricingParameters>,
}

/// One row of the proposal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListItem {
    pub id: String,
    pub client_name: String,
    pub project_address: String,
    pub item_count: usize,
    pub formatted_total: String,
    pub updated_at: DateTime<Utc>,
}

/// Everything the preview panel needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub breakdown: CostBreakdown,
    pub summary: BreakdownSummary,
    pub formatted_total: String,
    pub warnings: Vec<ItemWarnings>,
}

/// Creates a proposal.
///
/// ## Returns
/// The new, empty proposal
pub fn create_proposal(
    store: &ProposalStore,
    config: &QuoteConfig,
    request: CreateProposalRequest,
) -> ApiResult<Proposal> {
    debug!(client = %request.client_name, "create_proposal command");

    if request.client_name.trim().is_empty() {
        return Err(ApiError::validation("clientName is required"));
    }

    let pricing = request
        .pricing
        .unwrap_or_else(|| config.pricing.to_parameters());

    let mut proposal = Proposal::new(request.client_name.trim(), request.project_address.trim(), PricingParameters::default());
    proposal.set_pricing(pricing)?;

    store.insert(proposal.clone())?;
    info!(proposal_id = %proposal.id, "Proposal created");
    Ok(proposal)
}

/// Gets a proposal by ID.
pub fn get_proposal(store: &ProposalStore, proposal_id: &str) -> ApiResult<Proposal> {
    debug!(proposal_id, "get_proposal command");
    store.with_proposal(proposal_id, Proposal::clone)
}

/// Lists every proposal, oldest first.
pub fn list_proposals(store: &ProposalStore, config: &QuoteConfig) -> ApiResult<Vec<ProposalListItem>> {
    debug!("list_proposals command");

    let mut proposals: Vec<Proposal> = store.with_proposals(|all| all.values().cloned().collect())?;
    proposals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    Ok(proposals
        .into_iter()
        .map(|p| ProposalListItem {
            formatted_total: format_stored_total(config, p.total_amount_cents),
            item_count: p.line_items.len(),
            id: p.id,
            client_name: p.client_name,
            project_address: p.project_address,
            updated_at: p.updated_at,
        })
        .collect())
}

/// Deletes a proposal.
pub fn delete_proposal(store: &ProposalStore, proposal_id: &str) -> ApiResult<()> {
    debug!(proposal_id, "delete_proposal command");
    store.remove(proposal_id)?;
    info!(proposal_id, "Proposal deleted");
    Ok(())
}

/// Adds a line item.
///
/// ## Behavior
/// - The item gets a fresh ID and its total is recomputed
/// - Assistant-proposed items are priced exactly like manual ones
pub fn add_line_item(
    store: &ProposalStore,
    proposal_id: &str,
    item: LineItem,
    origin: ItemOrigin,
) -> ApiResult<Proposal> {
    debug!(proposal_id, name = %item.name, ?origin, "add_line_item command");

    store.with_proposal_mut(proposal_id, |p| {
        p.add_line_item(item, origin)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Updates a line item.
pub fn update_line_item(
    store: &ProposalStore,
    proposal_id: &str,
    item_id: &str,
    patch: LineItemPatch,
) -> ApiResult<Proposal> {
    debug!(proposal_id, item_id, "update_line_item command");

    store.with_proposal_mut(proposal_id, |p| {
        p.update_line_item(item_id, patch)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Removes a line item.
pub fn remove_line_item(store: &ProposalStore, proposal_id: &str, item_id: &str) -> ApiResult<Proposal> {
    debug!(proposal_id, item_id, "remove_line_item command");

    store.with_proposal_mut(proposal_id, |p| {
        p.remove_line_item(item_id)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Adds a flat-priced add-on.
pub fn add_add_on(store: &ProposalStore, proposal_id: &str, name: &str, price: f64) -> ApiResult<Proposal> {
    debug!(proposal_id, name, price, "add_add_on command");

    store.with_proposal_mut(proposal_id, |p| {
        p.add_add_on(name, price)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Removes an add-on.
pub fn remove_add_on(store: &ProposalStore, proposal_id: &str, add_on_id: &str) -> ApiResult<Proposal> {
    debug!(proposal_id, add_on_id, "remove_add_on command");

    store.with_proposal_mut(proposal_id, |p| {
        p.remove_add_on(add_on_id)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Replaces a proposal's pricing parameters.
pub fn set_pricing(store: &ProposalStore, proposal_id: &str, pricing: PricingParameters) -> ApiResult<Proposal> {
    debug!(proposal_id, ?pricing, "set_pricing command");

    store.with_proposal_mut(proposal_id, |p| {
        p.set_pricing(pricing)?;
        Ok::<Proposal, ApiError>(p.clone())
    })?
}

/// Computes the breakdown for the preview panel.
///
/// ## Returns
/// The breakdown in the proposal's display mode, its flat summary, the
/// formatted final total and any line item or add-on warnings
pub fn get_breakdown(store: &ProposalStore, config: &QuoteConfig, proposal_id: &str) -> ApiResult<BreakdownResponse> {
    debug!(proposal_id, "get_breakdown command");

    let (breakdown, warnings) = store.with_proposal_mut(proposal_id, |p| (p.refresh_total(), p.audit()))?;

    if !breakdown.final_total().is_finite() {
        warn!(proposal_id, "Final total is not finite; check the NET margin target");
    }

    Ok(BreakdownResponse {
        formatted_total: config.format_dollars(breakdown.final_total()),
        summary: breakdown.summary(),
        breakdown,
        warnings,
    })
}

fn format_stored_total(config: &QuoteConfig, cents: Option<i64>) -> String {
    cents
        .map(|c| config.format_currency(c))
        .unwrap_or_else(|| "N/A".to_string())
}
