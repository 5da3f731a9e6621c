//! SWGoHBot Web Test Utils
//!
//! Provides shared testing utilities for the website backend. This crate offers a builder
//! pattern for creating test contexts with an in-memory session store and a mock of the
//! Discord REST API that records every request it receives.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the session and Discord mock
//! - **DiscordApiMock**: `wiremock` server answering the user-token Discord endpoints
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory::guild::GuildFactory};
//!
//! #[tokio::test]
//! async fn lists_guilds() -> Result<(), TestError> {
//!     let mut test = TestBuilder::new().with_discord_api().build().await?;
//!     let (session, discord) = test.session_and_discord().await?;
//!
//!     discord
//!         .mock_user_guilds("token", vec![GuildFactory::new().build()], 1)
//!         .await;
//!     // Exercise code against `discord.base_url()`...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod discord;
pub mod error;
pub mod factory;
