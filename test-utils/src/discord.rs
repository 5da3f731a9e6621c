//! Mock of the Discord REST API endpoints called with a user's OAuth token.
//!
//! Wraps a `wiremock` server. Every `mock_*` helper takes the number of calls the test
//! expects; expectations are verified when the mock is dropped, which makes call-count
//! assertions (e.g. "this path must never reach Discord") part of the test itself.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct DiscordApiMock {
    server: MockServer,
}

impl DiscordApiMock {
    /// Starts a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to hand to the client under test in place of `https://discord.com/api/v10`.
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Answers `GET /users/@me` for `token` with the given user JSON.
    pub async fn mock_current_user(&self, token: &str, user: Value, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .and(header("Authorization", bearer(token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers `GET /users/@me/guilds` for `token` with the given guild list.
    pub async fn mock_user_guilds(&self, token: &str, guilds: Vec<Value>, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/users/@me/guilds"))
            .and(header("Authorization", bearer(token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(guilds)))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers `GET /users/@me/guilds` with an error status and a Discord error body.
    pub async fn mock_user_guilds_status(&self, status: u16, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/users/@me/guilds"))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(status)))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers `GET /users/@me/guilds/{guild_id}/member` for `token` with the given roles.
    pub async fn mock_guild_member(
        &self,
        token: &str,
        guild_id: &str,
        roles: &[&str],
        expected_calls: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(member_path(guild_id)))
            .and(header("Authorization", bearer(token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "roles": roles,
                "nick": null,
                "joined_at": "2021-01-01T00:00:00.000000+00:00",
                "deaf": false,
                "mute": false,
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers the guild member endpoint with an error status.
    pub async fn mock_guild_member_status(&self, guild_id: &str, status: u16, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(member_path(guild_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(status)))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers `POST /oauth2/token` for `code` with a bearer token response.
    pub async fn mock_token_exchange(&self, code: &str, access_token: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains(format!("code={}", code)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": 604800,
                "refresh_token": "refresh",
                "scope": "identify guilds guilds.members.read",
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers `POST /oauth2/token` with an OAuth `invalid_grant` error.
    pub async fn mock_token_exchange_rejected(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid \"code\" in request.",
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Token endpoint URL to configure the OAuth client with.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.server.uri(), TOKEN_PATH)
    }

    /// Number of requests the server has received so far, matched or not.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

const TOKEN_PATH: &str = "/oauth2/token";

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn member_path(guild_id: &str) -> String {
    format!("/users/@me/guilds/{}/member", guild_id)
}

fn error_body(status: u16) -> Value {
    let message = match status {
        401 => "401: Unauthorized",
        403 => "Missing Access",
        404 => "Unknown Guild",
        429 => "You are being rate limited.",
        _ => "Internal Server Error",
    };
    json!({ "message": message, "code": 0 })
}
