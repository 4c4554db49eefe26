mod identity;
mod transport;

pub use identity::IdentityResolver;
pub use transport::SubmissionTransport;
