//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Access rules, settings reconciliation and form handling
//! - **Orchestration**: Coordinating MongoDB repositories with Discord lookups
//! - **Domain Models**: Working with domain models rather than DTOs or raw documents

pub mod access;
pub mod auth;
pub mod command;
pub mod discord;
pub mod guild;
pub mod guild_cache;
pub mod payout;
pub mod settings;
pub mod user;
