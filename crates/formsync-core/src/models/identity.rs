use serde::{Deserialize, Serialize};

use super::ids::{TenantId, UserId};

/// The acting user, as resolved from an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: UserId,
    /// Forms visible to the user are those of this tenant.
    pub tenant_id: TenantId,
}

impl UserIdentity {
    pub fn new(user_id: UserId, tenant_id: TenantId) -> Self {
        Self { user_id, tenant_id }
    }
}
