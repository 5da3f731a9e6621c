use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::server::model::discord::GuildSummary;

/// A user's guild list as stored in their session.
///
/// Replaced wholesale on refresh, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedGuildList {
    pub guilds: Vec<GuildSummary>,
    pub expires_at: DateTime<Utc>,
}

impl CachedGuildList {
    /// Wraps a freshly fetched list that expires `ttl` after `now`.
    pub fn new(guilds: Vec<GuildSummary>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            guilds,
            expires_at: now + ttl,
        }
    }

    /// Whether the entry may still be served at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_until_exactly_expires_at() {
        let now = Utc::now();
        let cached = CachedGuildList::new(Vec::new(), now, Duration::seconds(300));

        assert!(cached.is_fresh(now));
        assert!(cached.is_fresh(now + Duration::seconds(299)));
        assert!(!cached.is_fresh(now + Duration::seconds(300)));
    }
}
