//! Factory for `/users/@me` payloads.

use serde_json::{json, Value};

use crate::factory::helpers::next_snowflake;

/// Creates a Discord user payload with the given username and a unique id.
///
/// # Returns
/// - `Value` - JSON shaped like Discord's user object
pub fn create_user(username: &str) -> Value {
    json!({
        "id": next_snowflake(),
        "username": username,
        "discriminator": "0",
        "global_name": null,
        "avatar": null,
    })
}
