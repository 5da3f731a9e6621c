//! Reconciliation of submitted guild settings against the bot's defaults.
//!
//! A setting equal to its default is removed from storage so the guild keeps
//! tracking the bot's default if it ever changes; any other value is stored as an
//! override. Settings the visitor did not submit are left untouched.

use crate::server::model::settings::{
    DefaultSettings, SettingKind, SettingValue, SettingsDiff, SettingsPatch,
};

/// Computes minimal `$set`/`$unset` deltas for guild settings.
pub struct SettingsReconciler<'a> {
    defaults: &'a DefaultSettings,
}

impl<'a> SettingsReconciler<'a> {
    /// Creates a reconciler over the given default table.
    ///
    /// # Arguments
    /// - `defaults` - Default value per setting key
    pub fn new(defaults: &'a DefaultSettings) -> Self {
        Self { defaults }
    }

    /// Splits a patch into overrides to store and keys to clear.
    ///
    /// Walks the default table in order. A key missing from `proposed` appears in
    /// neither output. Number lists are compared element-wise, everything else by
    /// equality.
    ///
    /// # Arguments
    /// - `proposed` - Kind-checked values from one form submission
    ///
    /// # Returns
    /// - `SettingsDiff` - `set` holds values that differ from their default, `unset`
    ///   the keys whose value equals it
    pub fn diff_from_defaults(&self, proposed: &SettingsPatch) -> SettingsDiff {
        let mut diff = SettingsDiff::default();

        for (key, default) in self.defaults.iter() {
            let Some(value) = proposed.get(key) else {
                continue;
            };

            let equal = match key.kind() {
                SettingKind::Numbers => sequences_equal(default, value),
                SettingKind::Flag | SettingKind::Text => default == value,
            };

            if equal {
                diff.unset.push(key);
            } else {
                diff.set.insert(key, value.clone());
            }
        }

        diff
    }
}

/// Same length and same elements in order. Falls back to plain equality when
/// either side is not a list.
fn sequences_equal(default: &SettingValue, proposed: &SettingValue) -> bool {
    match (default, proposed) {
        (SettingValue::Numbers(a), SettingValue::Numbers(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
        }
        _ => default == proposed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::settings::SettingKey;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn example_defaults() -> DefaultSettings {
        DefaultSettings::from_values([
            (
                SettingKey::Timezone,
                SettingValue::Text("America/New_York".to_string()),
            ),
            (
                SettingKey::EventCountdown,
                SettingValue::Numbers(vec![24, 2, 1]),
            ),
        ])
        .unwrap()
    }

    fn text(value: &str) -> SettingValue {
        SettingValue::Text(value.to_string())
    }

    #[test]
    fn value_equal_to_default_is_unset() {
        let defaults = example_defaults();
        let patch = SettingsPatch::new()
            .with(SettingKey::Timezone, text("America/New_York"))
            .unwrap();

        let diff = SettingsReconciler::new(&defaults).diff_from_defaults(&patch);

        assert_eq!(diff.set, BTreeMap::new());
        assert_eq!(diff.unset, vec![SettingKey::Timezone]);
    }

    #[test]
    fn value_different_from_default_is_set() {
        let defaults = example_defaults();
        let patch = SettingsPatch::new()
            .with(SettingKey::Timezone, text("Europe/London"))
            .unwrap();

        let diff = SettingsReconciler::new(&defaults).diff_from_defaults(&patch);

        assert_eq!(
            diff.set,
            BTreeMap::from([(SettingKey::Timezone, text("Europe/London"))])
        );
        assert!(diff.unset.is_empty());
    }

    #[test]
    fn sequences_compare_element_wise() {
        let defaults = example_defaults();
        let reconciler = SettingsReconciler::new(&defaults);

        let same = SettingsPatch::new()
            .with(SettingKey::EventCountdown, SettingValue::Numbers(vec![24, 2, 1]))
            .unwrap();
        let reordered = SettingsPatch::new()
            .with(SettingKey::EventCountdown, SettingValue::Numbers(vec![24, 1, 2]))
            .unwrap();
        let shorter = SettingsPatch::new()
            .with(SettingKey::EventCountdown, SettingValue::Numbers(vec![24, 2]))
            .unwrap();

        assert_eq!(
            reconciler.diff_from_defaults(&same).unset,
            vec![SettingKey::EventCountdown]
        );
        assert_eq!(
            reconciler.diff_from_defaults(&reordered).set[&SettingKey::EventCountdown],
            SettingValue::Numbers(vec![24, 1, 2])
        );
        assert_eq!(
            reconciler.diff_from_defaults(&shorter).set[&SettingKey::EventCountdown],
            SettingValue::Numbers(vec![24, 2])
        );
    }

    #[test]
    fn empty_patch_yields_empty_diff() {
        let defaults = DefaultSettings::bot_defaults();
        let diff = SettingsReconciler::new(&defaults).diff_from_defaults(&SettingsPatch::new());

        assert_eq!(diff, SettingsDiff::default());
    }

    #[test]
    fn keys_without_default_are_ignored() {
        let defaults = example_defaults();
        let patch = SettingsPatch::new()
            .with(SettingKey::Language, text("de_DE"))
            .unwrap();

        let diff = SettingsReconciler::new(&defaults).diff_from_defaults(&patch);

        assert_eq!(diff, SettingsDiff::default());
    }

    #[test]
    fn unset_follows_table_order() {
        let defaults = DefaultSettings::bot_defaults();
        let patch = SettingsPatch::new()
            .with(SettingKey::AnnounceChan, text(""))
            .and_then(|p| p.with(SettingKey::Timezone, text("America/New_York")))
            .and_then(|p| p.with(SettingKey::EnablePart, SettingValue::Flag(false)))
            .unwrap();

        let diff = SettingsReconciler::new(&defaults).diff_from_defaults(&patch);

        assert_eq!(
            diff.unset,
            vec![
                SettingKey::Timezone,
                SettingKey::EnablePart,
                SettingKey::AnnounceChan
            ]
        );
    }

    /// Alternate value per key, always different from the bot default.
    fn changed_value(key: SettingKey) -> SettingValue {
        match key.kind() {
            SettingKind::Flag => SettingValue::Flag(true),
            SettingKind::Text => text("changed"),
            SettingKind::Numbers => SettingValue::Numbers(vec![10, 5]),
        }
    }

    #[test]
    fn outputs_are_disjoint_and_idempotent_for_every_patch_shape() {
        let defaults = DefaultSettings::bot_defaults();
        let reconciler = SettingsReconciler::new(&defaults);
        let keys = SettingKey::ALL;

        // Each key is absent, equal to its default, or changed: walk all 3^n shapes.
        let shapes = 3_usize.pow(keys.len() as u32);
        for shape in 0..shapes {
            let mut patch = SettingsPatch::new();
            let mut code = shape;
            for key in keys {
                match code % 3 {
                    1 => patch.insert(key, defaults.get(key).unwrap().clone()).unwrap(),
                    2 => patch.insert(key, changed_value(key)).unwrap(),
                    _ => {}
                }
                code /= 3;
            }

            let diff = reconciler.diff_from_defaults(&patch);

            for key in keys {
                let in_set = diff.set.contains_key(&key);
                let in_unset = diff.unset.contains(&key);
                assert!(!(in_set && in_unset), "{:?} in both outputs", key);
                assert_eq!(in_set || in_unset, patch.get(key).is_some());
            }

            let mut replay = SettingsPatch::new();
            for (key, value) in &diff.set {
                replay.insert(*key, value.clone()).unwrap();
            }
            let replayed = reconciler.diff_from_defaults(&replay);
            assert_eq!(replayed.set, diff.set);
            assert!(replayed.unset.is_empty());
        }
    }

    #[test]
    fn diff_converts_to_prefixed_update() {
        let defaults = DefaultSettings::bot_defaults();
        let patch = SettingsPatch::new()
            .with(SettingKey::Timezone, text("Europe/London"))
            .and_then(|p| p.with(SettingKey::EventCountdown, SettingValue::Numbers(vec![24, 2, 1])))
            .unwrap();

        let update = SettingsReconciler::new(&defaults)
            .diff_from_defaults(&patch)
            .into_update();

        assert_eq!(
            update.to_document().unwrap(),
            mongodb::bson::doc! {
                "$set": { "settings.timezone": "Europe/London" },
                "$unset": { "settings.eventCountdown": 1 },
            }
        );
    }
}
