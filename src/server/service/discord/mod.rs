//! Discord REST collaborators.
//!
//! - `api` - endpoints called on behalf of the logged-in user with their OAuth token
//! - `bot` - guild lookups made with the bot token through serenity

pub mod api;
pub mod bot;

pub use api::DiscordApiClient;
pub use bot::DiscordBotService;
