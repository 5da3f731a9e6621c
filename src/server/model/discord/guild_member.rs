use serde::Deserialize;

/// The caller's member record in one guild, from `/users/@me/guilds/{id}/member`.
///
/// Only the role list is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildMember {
    /// Role snowflakes held by the member.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl GuildMember {
    /// Whether the member holds any role in `allowed`.
    pub fn has_any_role(&self, allowed: &[String]) -> bool {
        self.roles.iter().any(|role| allowed.contains(role))
    }
}
