//! Roles, sessions and identity lookup.
//!
//! Every workflow call takes an explicit [`Session`] instead of reading
//! ambient current-user state, and all capability checks live here
//! rather than as role-string comparisons scattered through callers.

use crate::error::AuthError;
use crate::store::{RemoteStore, collections};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Producer,
    Client,
}

impl Role {
    /// Admin actions skip the approval queue and hit the live collections directly.
    pub fn bypasses_approval(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_review(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_submit_product_actions(self) -> bool {
        matches!(self, Role::Admin | Role::Producer)
    }

    pub fn can_submit_order_actions(self) -> bool {
        matches!(self, Role::Admin | Role::Client)
    }
}

/// The authenticated actor behind a workflow call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

/// A record in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

pub fn ensure_reviewer(session: &Session) -> Result<(), AuthError> {
    if session.role.can_review() {
        Ok(())
    } else {
        Err(AuthError::NotAReviewer(session.role))
    }
}

/// Plaintext comparison against the flat `users` collection.
///
/// The store has no server-side enforcement, so this identifies the
/// caller rather than securing anything.
pub async fn login(
    store: &dyn RemoteStore,
    username: &str,
    password: &str,
) -> anyhow::Result<Session> {
    let users = store.list(collections::USERS).await?;
    for value in users {
        let user: User = serde_json::from_value(value)?;
        if user.username == username && user.password == password {
            tracing::info!(user_id = %user.id, "user logged in");
            return Ok(Session::for_user(&user));
        }
    }
    Err(AuthError::InvalidCredentials.into())
}
