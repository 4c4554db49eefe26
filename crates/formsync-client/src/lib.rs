//! # formsync-client
//!
//! The offline-first half of the engine. A [`FormFill`] collects answers step
//! by step and hands the finalized payload to the [`SyncCoordinator`], which
//! sends it at once when the [`ConnectivityMonitor`] says online and
//! otherwise writes it to the durable queue in [`formsync_storage::LocalStore`].
//! Every `WentOnline` transition drains that queue against the server.
//!
//! The server is reached through [`formsync_core::traits::SubmissionTransport`];
//! [`transport::HttpTransport`] is the HTTP implementation (network calls need
//! the `remote` feature).

pub mod catalog;
pub mod connectivity;
pub mod coordinator;
pub mod fill;
pub mod transport;

pub use catalog::{FormCatalog, Source};
pub use connectivity::{ConnectivityEvent, ConnectivityMonitor, ConnectivitySubscription, ListenerHandle};
pub use coordinator::{FlushOutcome, SubmitOutcome, SyncCoordinator};
pub use fill::{FillState, FormFill};
pub use transport::{HttpClientConfig, HttpTransport};
