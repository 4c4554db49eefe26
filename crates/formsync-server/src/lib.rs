//! # formsync-server
//!
//! Server half of the engine. [`SubmissionEndpoint`] accepts one payload or a
//! batch, normalizes loose shapes, and applies a create-or-update per
//! (user, form) so replays from a client queue never duplicate a record.
//! [`FormRegistry`] publishes forms per tenant and [`SessionRegistry`]
//! resolves session tokens to users.

pub mod endpoint;
pub mod normalize;
pub mod registry;
pub mod sessions;

pub use endpoint::SubmissionEndpoint;
pub use registry::FormRegistry;
pub use sessions::SessionRegistry;
