//! Polling, state cache, and control surfaces for ZowieBox appliances.
//!
//! This crate owns the domain logic between `zowiebox-api` and a host
//! runtime (a show controller embedding the device integration):
//!
//! - **[`Controller`]** — Central facade managing the full lifecycle:
//!   [`start()`](Controller::start) validates the configuration, builds
//!   the transport client, probes the device, then spawns background
//!   tasks (connection monitor, fast/slow pollers).
//!
//! - **[`StateCache`]** — Snapshot-swap storage for the last-known value
//!   of each polled domain. Single-writer (the poller), multi-reader;
//!   a slot only changes on an acceptable response, so failed polls
//!   leave stale-but-present values.
//!
//! - **[`Feedback`]** — Pure boolean predicates over the cache that
//!   drive control appearance; the controller broadcasts which ones to
//!   re-evaluate after each poll.
//!
//! - **[`Action`]** — Typed operation requests dispatched to the device.
//!   Transport failures are errors; device rejections come back as
//!   [`ActionOutcome::Rejected`] values with their mapped reason.
//!
//! - **Variables** — A flat string-valued namespace republished after
//!   each poll, with array domains namespaced by their own index field.

pub mod action;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod feedback;
pub mod model;
pub mod monitor;
mod poller;
pub mod store;
pub mod variables;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{Action, ActionOutcome};
pub use config::DeviceConfig;
pub use controller::Controller;
pub use error::CoreError;
pub use feedback::{Feedback, FeedbackId};
pub use monitor::HostStatus;
pub use store::{StateCache, StateSlot};
pub use variables::VariableSet;

// Re-export the api crate for host runtimes that construct wire payloads.
pub use zowiebox_api as api;
