//! Admin authority predicate.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::admin::AdminIdentity;

/// Decides whether a caller may perform admin-only operations.
///
/// Booking finalization consults this predicate before touching any seat.
#[async_trait]
pub trait AdminAuthority: Send + Sync + 'static {
    /// Return `true` when the identity belongs to an administrator.
    async fn is_admin(&self, identity: &AdminIdentity) -> AppResult<bool>;
}
