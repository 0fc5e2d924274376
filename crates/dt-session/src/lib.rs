pub mod access_gate;
pub mod api;
pub mod error;
pub mod route_table;
pub mod session_state;
pub mod session_store;
pub mod token_store;

pub use access_gate::{AccessGate, GateOutcome};
pub use api::{
    AuthApi, ClientError, ClientResult, CredentialGrant, HttpAuthApi, MockAuthApi,
};
pub use error::{Result as SessionResult, SessionError};
pub use route_table::{Navigator, RouteAccess, RouteRule, RouteTable};
pub use session_state::{SessionPhase, SessionState};
pub use session_store::{SessionOptions, SessionStore};
pub use token_store::{
    FileTokenStore, MemoryTokenStore, PersistedSession, StorageError, StorageKey, StorageResult,
    TokenStore,
};

#[cfg(test)]
mod tests;
