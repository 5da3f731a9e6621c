use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts.
///
/// Provides a fluent interface for configuring test environments. Use the builder
/// pattern to opt into the pieces a test needs, then call `build()` to create the
/// configured test context. Anything not requested up front is still created lazily
/// by the context on first access.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
///
/// let mut test = TestBuilder::new()
///     .with_session()
///     .with_discord_api()
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct TestBuilder {
    /// Eagerly create the session store during `build()`.
    session: bool,
    /// Eagerly start the Discord API mock server during `build()`.
    discord_api: bool,
}

impl TestBuilder {
    /// Creates a new test builder with nothing configured.
    ///
    /// # Returns
    /// - New `TestBuilder` instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an in-memory session store backed by SQLite.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_session(mut self) -> Self {
        self.session = true;
        self
    }

    /// Requests a running Discord API mock server.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_discord_api(mut self) -> Self {
        self.discord_api = true;
        self
    }

    /// Builds and initializes the test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context
    /// - `Err(TestError::Database)` - Failed to create the session store
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new();

        if self.session {
            context.session().await?;
        }
        if self.discord_api {
            context.discord().await;
        }

        Ok(context)
    }
}
