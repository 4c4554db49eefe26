use crate::errors::FormSyncResult;
use crate::models::UserIdentity;

/// Resolves an authenticated session token to the acting user.
///
/// Authentication itself lives outside the engine; the server only ever
/// trusts the identity returned here, never a user id carried in a payload.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, session_token: &str) -> FormSyncResult<UserIdentity>;
}
