use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, Session};
use tower_sessions_sqlx_store::{sqlx::SqlitePool, SqliteStore};

use crate::{discord::DiscordApiMock, error::TestError};

/// Test context containing a session and a Discord API mock.
///
/// Both pieces are created lazily on first access and persist for the lifetime of the
/// test context, so every call within one test sees the same session record and the
/// same mock server (and therefore the same request log).
pub struct TestContext {
    /// Optional session instance for session handling.
    ///
    /// Initialized lazily when `session()` is first called. Backed by an in-memory
    /// SQLite pool owned by the store.
    pub session: Option<Session>,

    /// Optional Discord API mock server.
    ///
    /// Initialized lazily when `discord()` is first called.
    pub discord: Option<DiscordApiMock>,
}

impl TestContext {
    /// Creates a new empty test context.
    ///
    /// # Returns
    /// - New `TestContext` instance with nothing initialized
    pub fn new() -> Self {
        Self {
            session: None,
            discord: None,
        }
    }

    /// Gets or creates the test session instance.
    ///
    /// Returns a reference to the existing session if one exists, otherwise creates a
    /// new session backed by an in-memory SQLite store with the same 7-day inactivity
    /// expiry the server uses.
    ///
    /// # Returns
    /// - `Ok(&Session)` - Reference to the session instance
    /// - `Err(TestError::Database)` - Failed to open the pool or create the session table
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut test = TestContext::new();
    /// let session = test.session().await?;
    ///
    /// session.insert("auth:access_token", "token").await?;
    /// ```
    pub async fn session(&mut self) -> Result<&Session, TestError> {
        match self.session {
            Some(ref session) => Ok(session),
            None => {
                let pool = SqlitePool::connect("sqlite::memory:").await?;
                let session_store = SqliteStore::new(pool);

                // Initialize the session table in the database
                session_store.migrate().await?;

                // Session::new requires: id (None for new), store (Arc), expiry
                let session = Session::new(
                    None,
                    Arc::new(session_store),
                    Some(Expiry::OnInactivity(Duration::days(7))),
                );

                let session_ref = self.session.insert(session);

                Ok(&*session_ref) // Re-borrow as immutable
            }
        }
    }

    /// Gets or starts the Discord API mock server.
    ///
    /// # Returns
    /// - `&DiscordApiMock` - Reference to the running mock server
    pub async fn discord(&mut self) -> &DiscordApiMock {
        match self.discord {
            Some(ref discord) => discord,
            None => {
                let discord = DiscordApiMock::start().await;
                &*self.discord.insert(discord)
            }
        }
    }

    /// Gets or creates both the session and the Discord API mock.
    ///
    /// Convenience method for tests that need both. Initializes both if they don't
    /// exist, then returns immutable references to both. This avoids borrow checker
    /// issues when calling `session()` and `discord()` separately.
    ///
    /// # Returns
    /// - `Ok((&Session, &DiscordApiMock))` - References to both
    /// - `Err(TestError::Database)` - Failed to initialize the session store
    pub async fn session_and_discord(
        &mut self,
    ) -> Result<(&Session, &DiscordApiMock), TestError> {
        // Initialize both (these methods are idempotent)
        self.session().await?;
        self.discord().await;

        match (self.session.as_ref(), self.discord.as_ref()) {
            (Some(session), Some(discord)) => Ok((session, discord)),
            _ => unreachable!("session and discord mock were initialized above"),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
