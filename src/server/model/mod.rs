//! Server-side domain models and submitted forms.
//!
//! Documents owned by the bot (`guildConfigs`, `users`) deserialize directly into
//! the types here and are transformed to DTOs at the controller boundary. Forms
//! carry request bodies until they are validated into typed updates.

pub mod discord;
pub mod form;
pub mod guild;
pub mod guild_list;
pub mod guild_view;
pub mod settings;
pub mod user;
