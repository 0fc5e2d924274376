use crate::api::{AuthApi, ClientError, ClientResult, CredentialGrant, HttpAuthApi, MockAuthApi};
use crate::error::{
    INVALID_CREDENTIALS_MESSAGE, PERMISSION_UPDATE_FAILED_MESSAGE, REGISTRATION_FAILED_MESSAGE,
    Result as SessionResult, SESSION_EXPIRED_MESSAGE, SessionError,
};
use crate::session_state::{SessionPhase, SessionState};
use crate::token_store::{FileTokenStore, PersistedSession, TokenStore};

use dt_config::{AuthBackend, AuthConfig, Config};
use dt_core::{Identity, Permission, Role};

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard, watch};
use uuid::Uuid;

/// Tokens issued by local registration; the backend has never seen them
const LOCAL_TOKEN_PREFIX: &str = "local-";
/// Display name used when the persisted hint is missing
const DEFAULT_USERNAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Look the persisted user up in the backend directory during restore
    pub verify_on_restore: bool,
    /// Run mutations one at a time instead of last-write-wins
    pub serialize_operations: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for SessionOptions {
    fn from(config: &AuthConfig) -> Self {
        Self {
            verify_on_restore: config.verify_on_restore,
            serialize_operations: config.serialize_operations,
        }
    }
}

/// Single source of truth for who is signed in and with what rights.
///
/// State is published through a watch channel; views hold a receiver from
/// [`SessionStore::subscribe`] and re-run the access gate on every change.
/// Overlapping operations are not rejected: whichever resolves last
/// determines the final state, unless `serialize_operations` is set.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    options: SessionOptions,
    state: watch::Sender<SessionState>,
    restore_started: AtomicBool,
    restore_completed: AtomicBool,
    /// Identities created by `register` during this process
    registered: Mutex<Vec<Identity>>,
    write_lock: AsyncMutex<()>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>, options: SessionOptions) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());

        Self {
            api,
            tokens,
            options,
            state,
            restore_started: AtomicBool::new(false),
            restore_completed: AtomicBool::new(false),
            registered: Mutex::new(Vec::new()),
            write_lock: AsyncMutex::new(()),
        }
    }

    /// Wire file-backed token storage and the configured backend.
    pub fn from_config(config: &Config) -> SessionResult<Self> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.storage_path()?));

        let api: Arc<dyn AuthApi> = match config.auth.backend {
            AuthBackend::Mock => Arc::new(MockAuthApi::new()),
            AuthBackend::Http => Arc::new(HttpAuthApi::new(&config.api, Arc::clone(&tokens))?),
        };

        Ok(Self::new(api, tokens, SessionOptions::from(&config.auth)))
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.restore_completed.load(Ordering::Acquire) {
            return SessionPhase::Initializing;
        }

        if self.state.borrow().is_signed_in() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Resolve the startup state from persisted storage. Never fails.
    ///
    /// Only the first call has an effect; later calls return the current
    /// state unchanged.
    pub async fn restore(&self) -> SessionState {
        if self.restore_started.swap(true, Ordering::AcqRel) {
            warn!("Session restore requested more than once; keeping current state");
            return self.state();
        }

        let _guard = self.write_guard().await;

        let next = match self.restore_identity().await {
            Ok(Some(identity)) => {
                info!("Restored session for user {} ({})", identity.id, identity.role);
                SessionState::signed_in(identity)
            }
            Ok(None) => {
                info!("No persisted session");
                SessionState::signed_out(None)
            }
            Err(e) => {
                warn!("{e}");
                self.erase_token();
                SessionState::signed_out(Some(e.user_message().to_string()))
            }
        };

        let next = self.publish(next);
        self.restore_completed.store(true, Ordering::Release);
        next
    }

    async fn restore_identity(&self) -> SessionResult<Option<Identity>> {
        let token = match self.tokens.read_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(None),
            Err(e) => return Err(SessionError::restore_failed(format!("token unreadable: {e}"))),
        };

        if token.trim().is_empty() {
            return Err(SessionError::restore_failed("persisted token is empty"));
        }

        let user_id = self
            .tokens
            .read_user_id()
            .map_err(|e| SessionError::restore_failed(format!("user id unreadable: {e}")))?
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SessionError::restore_failed("persisted session has no user id"))?;

        let username = self
            .tokens
            .read_username()
            .map_err(|e| SessionError::restore_failed(format!("username unreadable: {e}")))?
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        if self.options.verify_on_restore && !token.starts_with(LOCAL_TOKEN_PREFIX) {
            let directory = self
                .api
                .fetch_all_identities()
                .await
                .map_err(|e| SessionError::restore_failed(format!("verification failed: {e}")))?;

            return directory
                .into_iter()
                .find(|identity| identity.id == user_id)
                .map(Some)
                .ok_or_else(|| {
                    SessionError::restore_failed(format!("user {user_id} is not known to the backend"))
                });
        }

        // Unverified hints never grant more than the least-privileged role.
        Identity::new(&user_id, &username, &username, Role::User)
            .map(Some)
            .map_err(|e| SessionError::restore_failed(e.to_string()))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for a session.
    ///
    /// On success the token and identity hints are persisted and the issued
    /// token is returned alongside the identity. On failure the token is
    /// erased, the state shows "Invalid credentials" and the error is
    /// returned as well.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> SessionResult<(String, Identity)> {
        let _guard = self.write_guard().await;

        let outcome = match Self::check_credentials(identifier, secret) {
            Ok(()) => self.exchange_credentials(identifier, secret).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok((token, identity)) => {
                info!("Signed in user {} ({})", identity.id, identity.role);
                self.publish(SessionState::signed_in(identity.clone()));
                Ok((token, identity))
            }
            Err(e) => {
                warn!("Sign-in failed: {e}");
                self.erase_token();
                self.publish(SessionState::signed_out(Some(
                    INVALID_CREDENTIALS_MESSAGE.to_string(),
                )));
                Err(e)
            }
        }
    }

    /// Empty fields never reach the backend.
    fn check_credentials(identifier: &str, secret: &str) -> SessionResult<()> {
        if identifier.trim().is_empty() {
            return Err(SessionError::missing_credentials("identifier"));
        }
        if secret.is_empty() {
            return Err(SessionError::missing_credentials("secret"));
        }
        Ok(())
    }

    async fn exchange_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> SessionResult<(String, Identity)> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        debug!("Signing in '{identifier}'");

        match self.api.exchange_credentials(identifier, secret).await {
            Ok(grant) => self.accept_grant(grant),
            Err(e @ (ClientError::Rejected { .. } | ClientError::Unauthorized { .. })) => {
                Err(SessionError::invalid_credentials(Some(e)))
            }
            Err(e) => Err(SessionError::from(e)),
        }
    }

    /// Role and permissions come from the backend; a backend that reports
    /// neither yields the least-privileged role with its defaults.
    fn accept_grant(&self, grant: CredentialGrant) -> SessionResult<(String, Identity)> {
        if grant.token.trim().is_empty() {
            return Err(SessionError::invalid_credentials(None));
        }

        let role = grant.role.unwrap_or_default();
        let email = grant.email.as_deref().unwrap_or(&grant.username);
        let mut identity = Identity::new(&grant.user_id, &grant.username, email, role)
            .map_err(|_| SessionError::invalid_credentials(None))?;

        if let Some(permissions) = grant.permissions {
            identity = identity.with_permissions(permissions);
        }

        self.tokens.write(&PersistedSession::new(
            &grant.token,
            &grant.username,
            &grant.user_id,
        ))?;

        Ok((grant.token, identity))
    }

    /// Erase the persisted session and reset to signed out. Idempotent.
    pub async fn sign_out(&self) {
        let _guard = self.write_guard().await;
        self.erase_token();
        self.publish(SessionState::signed_out(None));
        info!("Signed out");
    }

    /// Forced sign-out for a backend 401.
    ///
    /// Does not wait for in-flight operations, so the interceptor can call
    /// it from inside one.
    pub fn handle_unauthorized(&self) {
        warn!("Backend rejected the session; signing out");
        self.erase_token();
        self.publish(SessionState::signed_out(Some(SESSION_EXPIRED_MESSAGE.to_string())));
    }

    /// Route a backend result through the 401 interceptor.
    pub fn intercept<T>(&self, result: ClientResult<T>) -> SessionResult<T> {
        result.map_err(|e| {
            if e.is_unauthorized() {
                self.handle_unauthorized();
            }
            SessionError::from(e)
        })
    }

    /// Create an identity locally and sign it in immediately.
    pub async fn register(
        &self,
        email: &str,
        secret: &str,
        name: &str,
        role: Role,
    ) -> SessionResult<Identity> {
        let _guard = self.write_guard().await;

        match self.register_identity(email, secret, name, role) {
            Ok(identity) => {
                info!("Registered user {} ({})", identity.id, identity.role);
                self.publish(SessionState::signed_in(identity.clone()));
                Ok(identity)
            }
            Err(e) => {
                warn!("Registration failed: {e}");
                if matches!(e, SessionError::Storage { .. }) {
                    self.erase_token();
                    self.publish(SessionState::signed_out(Some(
                        REGISTRATION_FAILED_MESSAGE.to_string(),
                    )));
                } else {
                    self.state.send_modify(|state| {
                        state.loading = false;
                        state.error = Some(REGISTRATION_FAILED_MESSAGE.to_string());
                    });
                }
                Err(SessionError::registration_failed())
            }
        }
    }

    fn register_identity(
        &self,
        email: &str,
        secret: &str,
        name: &str,
        role: Role,
    ) -> SessionResult<Identity> {
        if !email.contains('@') {
            return Err(SessionError::missing_credentials("email"));
        }
        if secret.is_empty() {
            return Err(SessionError::missing_credentials("secret"));
        }
        if name.trim().is_empty() {
            return Err(SessionError::missing_credentials("name"));
        }

        let id = Uuid::new_v4().to_string();
        let identity = Identity::new(&id, name.trim(), email.trim(), role)
            .map_err(|_| SessionError::registration_failed())?;

        let token = format!("{LOCAL_TOKEN_PREFIX}{}", Uuid::new_v4());
        self.tokens
            .write(&PersistedSession::new(&token, &identity.name, &identity.id))?;

        self.registered_identities().push(identity.clone());
        Ok(identity)
    }

    // =========================================================================
    // Identity administration
    // =========================================================================

    /// Replace an identity's permission set.
    ///
    /// The id must name the signed-in identity or one the backend knows.
    /// Only the signed-in identity is reflected in the session state.
    pub async fn update_permissions(
        &self,
        identity_id: &str,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> SessionResult<()> {
        let permissions: BTreeSet<Permission> = permissions.into_iter().collect();
        let _guard = self.write_guard().await;

        let is_current = self
            .state
            .borrow()
            .identity
            .as_ref()
            .is_some_and(|identity| identity.id == identity_id);

        if !is_current {
            let known = match self.list_identities().await {
                Ok(directory) => directory.iter().any(|identity| identity.id == identity_id),
                Err(e) => {
                    if !matches!(e, SessionError::Unauthorized { .. }) {
                        self.state.send_modify(|state| {
                            state.error = Some(PERMISSION_UPDATE_FAILED_MESSAGE.to_string());
                        });
                    }
                    return Err(e);
                }
            };

            if !known {
                warn!("Permission update for unknown identity '{identity_id}'");
                return Err(SessionError::unknown_identity(identity_id));
            }
        }

        if let Some(local) = self
            .registered_identities()
            .iter_mut()
            .find(|identity| identity.id == identity_id)
        {
            local.replace_permissions(permissions.iter().copied());
        }

        let applied = self.state.send_if_modified(|state| match state.identity.as_mut() {
            Some(identity) if identity.id == identity_id => {
                identity.replace_permissions(permissions.iter().copied());
                true
            }
            _ => false,
        });

        if applied {
            info!(
                "Updated permissions of signed-in user {identity_id} ({} granted)",
                permissions.len()
            );
        } else {
            debug!("Permissions of {identity_id} accepted; not the signed-in user");
        }

        Ok(())
    }

    /// Every identity known to the backend plus those registered locally.
    pub async fn list_identities(&self) -> SessionResult<Vec<Identity>> {
        let mut directory = self.intercept(self.api.fetch_all_identities().await)?;

        for local in self.registered_identities().iter() {
            if !directory.iter().any(|identity| identity.id == local.id) {
                directory.push(local.clone());
            }
        }

        Ok(directory)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn write_guard(&self) -> Option<AsyncMutexGuard<'_, ()>> {
        if self.options.serialize_operations {
            Some(self.write_lock.lock().await)
        } else {
            None
        }
    }

    fn publish(&self, next: SessionState) -> SessionState {
        self.state.send_replace(next.clone());
        next
    }

    fn erase_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to erase persisted session: {e}");
        }
    }

    fn registered_identities(&self) -> MutexGuard<'_, Vec<Identity>> {
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
