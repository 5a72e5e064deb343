//! Local cache for the current authenticated identity.
//!
//! The session is kept in a local sled keyspace under a single string
//! key, serialized as JSON. Nothing else is persisted client-side.

use crate::auth::Session;
use std::sync::Arc;

const CURRENT_USER_KEY: &str = "currentUser";

pub struct SessionStore {
    db: Arc<sled::Db>,
}

impl SessionStore {
    pub fn new(db: Arc<sled::Db>) -> Self {
        Self { db }
    }

    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        self.db
            .insert(CURRENT_USER_KEY, serde_json::to_vec(session)?)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        match self.db.get(CURRENT_USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.db.remove(CURRENT_USER_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}
