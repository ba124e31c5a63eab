//! # RoofQuote Proposal Library
//!
//! The proposal editing boundary: state, commands and configuration around
//! the `roofquote-core` breakdown engine.
//!
//! ## Module Organization
//! ```text
//! roofquote_proposal/
//! ├── lib.rs          ◄─── You are here (logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── proposal.rs ◄─── Proposal editing
//! │   ├── store.rs    ◄─── In-memory proposal store
//! │   └── config.rs   ◄─── quote.toml loading
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── proposal.rs ◄─── Proposal commands
//! │   └── config.rs   ◄─── Config commands
//! ├── bin/quote.rs    ◄─── CLI: price a proposal file
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Pricing Always Goes Through the Engine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  preview panel ──┐                                                      │
//! │  PDF export ─────┼──► Proposal::breakdown() ──► get_cost_breakdown()    │
//! │  stored total ───┘                                                      │
//! │                                                                         │
//! │  No consumer keeps its own copy of the pricing math.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ApiResult, ErrorCode};

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=roofquote=trace` - Show trace for roofquote crates only
/// - Default: INFO, DEBUG for roofquote crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,roofquote=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
