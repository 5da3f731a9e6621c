//! Factory methods for creating Discord API payloads.
//!
//! Factories build the JSON Discord would return, with sensible defaults and unique
//! snowflakes, reducing boilerplate in tests. Feed the results to `DiscordApiMock`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! // Create with defaults
//! let guild = factory::guild::create_guild();
//!
//! // Using builder pattern for customization
//! let managed = factory::guild::GuildFactory::new()
//!     .id("123456789012345678")
//!     .name("Managed")
//!     .permissions(factory::guild::MANAGE_GUILD)
//!     .build();
//! ```
//!
//! # Available Factories
//!
//! - `guild` - `/users/@me/guilds` entries
//! - `user` - `/users/@me` payloads
//! - `helpers` - Unique snowflake generation

pub mod guild;
pub mod helpers;
pub mod user;

pub use guild::create_guild;
pub use user::create_user;
