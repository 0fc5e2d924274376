pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod mock;

pub use client::HttpAuthApi;
pub use error::{ClientError, Result as ClientResult};
pub use mock::MockAuthApi;

use dt_core::{Identity, Permission, Role};

use async_trait::async_trait;

/// What the backend hands out for an accepted credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialGrant {
    pub token: String,
    pub user_id: String,
    /// Display name as reported by the backend
    pub username: String,
    pub email: Option<String>,
    /// Absent when the backend does not report roles
    pub role: Option<Role>,
    pub permissions: Option<Vec<Permission>>,
}

/// The practice backend as seen by the session store.
///
/// Implementations attach the persisted token to authenticated calls and
/// report a rejected session as [`ClientError::Unauthorized`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange an identifier/secret pair for a session token.
    async fn exchange_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> ClientResult<CredentialGrant>;

    /// Every identity known to the backend.
    async fn fetch_all_identities(&self) -> ClientResult<Vec<Identity>>;
}
