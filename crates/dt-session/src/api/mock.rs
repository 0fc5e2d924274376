use crate::api::{AuthApi, ClientError, ClientResult, CredentialGrant};

use dt_core::{Identity, Permission, Role};

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

/// Creation time shared by every seeded demo identity (2025-02-23T19:08:17Z)
const SEED_TIMESTAMP: i64 = 1_740_337_697;

const MOCK_TOKEN_PREFIX: &str = "mock-token-";

struct MockAccount {
    secret: &'static str,
    identity: Identity,
}

/// Stub backend with a fixed set of demo accounts.
///
/// Every account signs in with its email address and the role name as the
/// secret (`admin@example.com` / `admin`, ...).
pub struct MockAuthApi {
    accounts: Vec<MockAccount>,
    sessions_expired: AtomicBool,
}

impl Default for MockAuthApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthApi {
    pub fn new() -> Self {
        let seeded_at = DateTime::<Utc>::from_timestamp(SEED_TIMESTAMP, 0).unwrap_or_default();
        let seed = |id: &str, name: &str, email: &str, role: Role, permissions: &[Permission]| {
            Identity {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                permissions: permissions.iter().copied().collect(),
                created_at: seeded_at,
                updated_at: seeded_at,
            }
        };

        let all: Vec<Permission> = Permission::all().collect();
        let accounts = vec![
            MockAccount {
                secret: "admin",
                identity: seed("1", "Admin User", "admin@example.com", Role::Admin, &all),
            },
            MockAccount {
                secret: "user",
                identity: seed(
                    "2",
                    "Regular User",
                    "user@example.com",
                    Role::User,
                    &[Permission::ViewAppointments],
                ),
            },
            MockAccount {
                secret: "secretary",
                identity: seed(
                    "3",
                    "Front Desk",
                    "secretary@example.com",
                    Role::Secretary,
                    &[
                        Permission::ViewPatients,
                        Permission::ViewAppointments,
                        Permission::ScheduleAppointments,
                        Permission::CancelAppointments,
                    ],
                ),
            },
            MockAccount {
                secret: "patient",
                identity: seed(
                    "4",
                    "Patient Portal",
                    "patient@example.com",
                    Role::Patient,
                    &[Permission::ViewAppointments],
                ),
            },
        ];

        Self {
            accounts,
            sessions_expired: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the session had expired.
    pub fn expire_sessions(&self) {
        self.sessions_expired.store(true, Ordering::SeqCst);
    }

    pub fn is_mock_token(token: &str) -> bool {
        token.starts_with(MOCK_TOKEN_PREFIX)
    }

    fn check_session(&self) -> ClientResult<()> {
        if self.sessions_expired.load(Ordering::SeqCst) {
            return Err(ClientError::unauthorized());
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn exchange_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> ClientResult<CredentialGrant> {
        self.check_session()?;

        let account = self
            .accounts
            .iter()
            .find(|a| a.identity.email == identifier && a.secret == secret)
            .ok_or_else(|| ClientError::rejected("unknown identifier or wrong secret"))?;

        debug!("Mock backend accepted '{identifier}'");
        let identity = &account.identity;
        Ok(CredentialGrant {
            token: format!("{MOCK_TOKEN_PREFIX}{}", Uuid::new_v4()),
            user_id: identity.id.clone(),
            username: identity.name.clone(),
            email: Some(identity.email.clone()),
            role: Some(identity.role),
            permissions: Some(identity.permissions.iter().copied().collect()),
        })
    }

    async fn fetch_all_identities(&self) -> ClientResult<Vec<Identity>> {
        self.check_session()?;
        Ok(self.accounts.iter().map(|a| a.identity.clone()).collect())
    }
}
