//! Discord REST shapes the website reads.
//!
//! User-token endpoints are deserialized straight into these types. Bot-token lookups
//! go through serenity and are narrowed to `{id, name}` summaries at the service
//! boundary.

pub mod channel;
pub mod guild;
pub mod guild_member;
pub mod role;
pub mod user;

pub use channel::ChannelSummary;
pub use guild::GuildSummary;
pub use guild_member::GuildMember;
pub use role::RoleSummary;
pub use user::DiscordUser;
