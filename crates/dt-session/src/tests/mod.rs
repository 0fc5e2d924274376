mod token_store;

use crate::api::{AuthApi, ClientError, ClientResult, CredentialGrant};
use crate::token_store::{
    MemoryTokenStore, StorageError, StorageKey, StorageResult, TokenStore,
};
use crate::{MockAuthApi, SessionOptions, SessionStore};

use dt_core::{Identity, Role};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, oneshot};

pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";
pub(crate) const SECRETARY_EMAIL: &str = "secretary@example.com";
pub(crate) const USER_EMAIL: &str = "user@example.com";

pub(crate) struct Harness {
    pub store: Arc<SessionStore>,
    pub api: Arc<MockAuthApi>,
    pub tokens: Arc<MemoryTokenStore>,
}

/// Store over the mock backend and in-memory storage
pub(crate) fn mock_harness(options: SessionOptions) -> Harness {
    harness_with_tokens(options, Arc::new(MemoryTokenStore::new()))
}

pub(crate) fn harness_with_tokens(
    options: SessionOptions,
    tokens: Arc<MemoryTokenStore>,
) -> Harness {
    let api = Arc::new(MockAuthApi::new());
    let store = Arc::new(SessionStore::new(
        Arc::clone(&api) as Arc<dyn AuthApi>,
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
        options,
    ));
    Harness { store, api, tokens }
}

pub(crate) fn identity(id: &str, role: Role) -> Identity {
    Identity::new(id, &format!("{role} {id}"), &format!("{id}@example.com"), role).unwrap()
}

pub(crate) fn grant_for(identity: &Identity) -> CredentialGrant {
    CredentialGrant {
        token: format!("token-{}", identity.id),
        user_id: identity.id.clone(),
        username: identity.name.clone(),
        email: Some(identity.email.clone()),
        role: Some(identity.role),
        permissions: Some(identity.permissions.iter().copied().collect()),
    }
}

/// Storage whose writes always fail
#[derive(Default)]
pub(crate) struct ReadOnlyTokenStore {
    inner: MemoryTokenStore,
}

impl TokenStore for ReadOnlyTokenStore {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: StorageKey, _value: &str) -> StorageResult<()> {
        Err(StorageError::write(
            PathBuf::from(key.as_str()),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

/// Backend whose credential exchanges resolve only when the test says so.
///
/// Each identifier gets one pending answer, released through the sender
/// returned by [`ScriptedAuthApi::script`].
#[derive(Default)]
pub(crate) struct ScriptedAuthApi {
    pending: Mutex<HashMap<String, oneshot::Receiver<ClientResult<CredentialGrant>>>>,
    unauthorized: AtomicBool,
    calls: AtomicUsize,
    pub started: Notify,
}

impl ScriptedAuthApi {
    pub fn script(&self, identifier: &str) -> oneshot::Sender<ClientResult<CredentialGrant>> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .insert(identifier.to_string(), rx);
        tx
    }

    pub fn reject_sessions(&self) {
        self.unauthorized.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for ScriptedAuthApi {
    async fn exchange_credentials(
        &self,
        identifier: &str,
        _secret: &str,
    ) -> ClientResult<CredentialGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.pending.lock().unwrap().remove(identifier);
        self.started.notify_one();

        match answer {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::rejected("script dropped"))),
            None => Err(ClientError::rejected("no scripted answer")),
        }
    }

    async fn fetch_all_identities(&self) -> ClientResult<Vec<Identity>> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(ClientError::unauthorized());
        }
        Ok(Vec::new())
    }
}

pub(crate) fn scripted_store(
    options: SessionOptions,
) -> (Arc<SessionStore>, Arc<ScriptedAuthApi>, Arc<MemoryTokenStore>) {
    let api = Arc::new(ScriptedAuthApi::default());
    let tokens = Arc::new(MemoryTokenStore::new());
    let store = Arc::new(SessionStore::new(
        Arc::clone(&api) as Arc<dyn AuthApi>,
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
        options,
    ));
    (store, api, tokens)
}
