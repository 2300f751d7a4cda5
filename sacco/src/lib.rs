//! # SACCO Member Portal data access facade
//!
//! Member data, authentication, and derived figures for a cooperative
//! savings (SACCO) portal. The "backend" is a set of static JSON documents
//! served over HTTP plus an injected key-value store standing in for the
//! browser's local storage; there is no server of our own and no real
//! persistence guarantee.
//!
//!
//!
//! # Data sources
//!
//! - Reference collections (`members`, `transactions`, `loans`,
//!   `notifications`, `branches`): read-only JSON documents under a
//!   configured base URL, each an object with one array field named after
//!   the collection.
//! - Exchange rates: a hosted provider keyed by an API credential, with the
//!   local `exchange-rates.json` document as fallback.
//! - Local registrations and the login session: the [`storage::Storage`]
//!   port, a browser-local-storage stand-in keyed `registeredMembers`,
//!   `serverMembers`, `currentRegistration`, `currentUser`, `loginTime`.
//!
//!
//!
//! # Degradation policy
//!
//! Read paths that feed display widgets substitute an empty list on failure
//! (`*_or_empty`, rate and news pulls, [`Portal::reconcile`]); write paths
//! (registration) and credential checks propagate their errors so nothing is
//! silently lost. Nothing here is fatal to the process.
//!
//!
//!
//! # Known weaknesses, kept deliberately
//!
//! Passwords are stored and compared in the clear, registration never checks
//! the reference collection for duplicates, and the dual-key registration
//! write is not transactional. These reproduce the behavior of the portal
//! this crate models; see DESIGN.md before building anything real on top.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod format;
pub mod geo;
pub mod models;
pub mod news;
pub mod rates;
pub mod register;
pub mod state;
pub mod storage;
pub mod submit;

pub use error::{AuthFailure, Error, Result};
pub use state::Portal;
