//! HTTP request handlers.
//!
//! Controllers check the session, call one service, and convert the result to a DTO.

pub mod auth;
pub mod guild;
pub mod site;
pub mod user;
