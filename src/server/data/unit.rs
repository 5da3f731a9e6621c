//! Unit display names from the game data `units` collection.

use std::collections::BTreeMap;

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use serde::Deserialize;

use crate::server::error::AppError;

pub const UNITS_COLLECTION: &str = "units";

/// Locale whose names are shown on the site.
const UNIT_NAME_LANGUAGE: &str = "eng_us";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitName {
    base_id: String,
    name_key: String,
}

pub struct UnitRepository {
    collection: Collection<UnitName>,
}

impl UnitRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(UNITS_COLLECTION),
        }
    }

    /// Looks up English display names for the given unit base IDs.
    ///
    /// IDs without a matching unit are left out of the map.
    ///
    /// # Arguments
    /// - `base_ids` - Unit base IDs, e.g. `"DARTHVADER"`
    ///
    /// # Returns
    /// - `Ok(BTreeMap<String, String>)` - Base ID to display name
    /// - `Err(AppError::MongoErr(_))` - Query failed
    pub async fn names(&self, base_ids: &[String]) -> Result<BTreeMap<String, String>, AppError> {
        if base_ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let units: Vec<UnitName> = self
            .collection
            .find(doc! {
                "baseId": { "$in": base_ids },
                "language": UNIT_NAME_LANGUAGE,
            })
            .projection(doc! { "baseId": 1, "nameKey": 1, "_id": 0 })
            .await?
            .try_collect()
            .await?;

        Ok(units
            .into_iter()
            .map(|unit| (unit.base_id, unit.name_key))
            .collect())
    }
}
