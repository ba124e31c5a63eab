//! # State Module
//!
//! Application state for the proposal editor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │       ProposalStore          │  │        QuoteConfig           │    │
//! │  │                              │  │                              │    │
//! │  │  Arc<Mutex<                  │  │  company name, currency      │    │
//! │  │    HashMap<id, Proposal>     │  │  pricing defaults            │    │
//! │  │  >>                          │  │                              │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ProposalStore: Protected by Arc<Mutex<T>> for exclusive access      │
//! │  • QuoteConfig: Read-only after loading                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod proposal;
mod store;

pub use config::{CompanySettings, ConfigError, ConfigResult, PricingDefaults, QuoteConfig};
pub use proposal::{ItemOrigin, ItemWarnings, LineItemPatch, Proposal, ProposalItem};
pub use store::ProposalStore;
