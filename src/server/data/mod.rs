//! Database repository layer for the bot's MongoDB collections.
//!
//! Repositories wrap typed `mongodb::Collection` handles and return the domain
//! documents from `server::model` directly. Every query, update and projection is
//! performed through these repositories.

pub mod guild_config;
pub mod unit;
pub mod user_config;
