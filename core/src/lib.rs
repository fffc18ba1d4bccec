//! Client core for the student roster service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps a local roster in
//! step with the remote collection through a caller-supplied `Transport`.
//!
//! # Design
//! - `StudentClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `RosterState` is an immutable snapshot; `ListSynchronizer` swaps
//!   snapshots only after a request succeeds and its body decodes.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod state;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::StudentClient;
pub use config::{ClientConfig, ConfigError};
pub use counter::Counter;
pub use error::{ApiError, ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Action, Notice, RosterState, SyncState};
pub use sync::ListSynchronizer;
pub use transport::Transport;
pub use types::{CreateStudent, Student, StudentId};
