//! Explicit session context
//!
//! The logged-in user's identity and bearer credential, created at login and
//! passed into every remote call. There is deliberately no global mutable
//! session state; dropping the `Session` is logout.

#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
    token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
