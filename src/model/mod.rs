//! JSON shapes exchanged with the browser.

pub mod api;
pub mod guild;
pub mod user;
