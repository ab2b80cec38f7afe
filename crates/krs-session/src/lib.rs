//! # krs-session: Registration Session Shell
//!
//! The imperative shell around [`krs_core`]. It holds the current selection
//! values, asks the identity collaborator for the login gate, reads the
//! configuration, stores finished submissions and runs the post-submit
//! reset timer.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          krs-session                                    │
//! │                                                                         │
//! │   config ──► SessionConfig (TOML + KRS_* env) ──► Catalog, GridSpec     │
//! │                                                                         │
//! │   session ─► RegistrationSession ──► ContextView after every call       │
//! │              SessionHandle (Arc<Mutex>) ──► tokio reset timer           │
//! │                                                                         │
//! │   ledger ──► CommitSink / Ledger (submitted + simulations)              │
//! │                                                                         │
//! │   error ───► SessionError ──► ApiError { code, message }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod session;

pub use config::SessionConfig;
pub use error::{ApiError, SessionError, SessionResult};
pub use ledger::{CommitSink, Ledger};
pub use session::{
    ContextKind, ContextView, Identity, RegistrationSession, SessionHandle, SubmitReceipt,
};
