/// What a successful sign-in leaves behind in durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: String,
    pub username: String,
    pub user_id: String,
}

impl PersistedSession {
    pub fn new(token: &str, username: &str, user_id: &str) -> Self {
        Self {
            token: token.to_string(),
            username: username.to_string(),
            user_id: user_id.to_string(),
        }
    }
}
