//! # Commands Module
//!
//! Everything the proposal editor and the AI assistant can ask for.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── proposal.rs  ◄─── Proposal CRUD, line items, pricing, breakdown
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Editor / assistant tool call                                           │
//! │    add_line_item { proposalId, item: {...}, origin: "assistant" }       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  fn add_line_item(                                                      │
//! │      store: &ProposalStore,  ◄── Shared state                          │
//! │      proposal_id: &str,                                                 │
//! │      item: LineItem,         ◄── Lenient JSON numbers                  │
//! │      origin: ItemOrigin,                                                │
//! │  ) -> Result<Proposal, ApiError>                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Updated proposal (JSON) or { code, message }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod proposal;
