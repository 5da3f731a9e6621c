//! Lenient deserializers for bot-written documents.
//!
//! The bot stores numbers as whatever its driver picked: Int32, Int64 or a whole
//! Double. These helpers accept any of them for fields typed as `i64`, and accept
//! ally codes written either as numbers or as strings.

use mongodb::bson::Bson;
use serde::{de::Error, Deserialize, Deserializer};

fn integer_from_bson<E: Error>(value: &Bson) -> Result<i64, E> {
    match value {
        Bson::Int32(v) => Ok(i64::from(*v)),
        Bson::Int64(v) => Ok(*v),
        Bson::Double(v) if v.is_finite() && v.fract() == 0.0 => Ok(*v as i64),
        other => Err(E::custom(format!("expected an integer, found {}", other))),
    }
}

/// Deserializes a required integer from any numeric representation.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Bson::deserialize(deserializer)?;
    integer_from_bson(&value)
}

/// Deserializes an optional integer; `null` and a missing field are `None`.
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(value) => integer_from_bson(&value).map(Some),
    }
}

/// Deserializes an optional list of integers.
pub fn lenient_opt_i64_vec<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<Bson>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(values) => values
            .iter()
            .map(integer_from_bson)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

/// Deserializes a string that older documents may hold as a number.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::String(value) => Ok(value),
        other => integer_from_bson(&other).map(|value| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, from_document};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::lenient_i64")]
        required: i64,
        #[serde(default, deserialize_with = "super::lenient_opt_i64")]
        optional: Option<i64>,
        #[serde(default, deserialize_with = "super::lenient_opt_i64_vec")]
        list: Option<Vec<i64>>,
    }

    #[test]
    fn accepts_every_numeric_representation() {
        let sample: Sample = from_document(doc! {
            "required": 1_700_000_000_000.0_f64,
            "optional": 5_i64,
            "list": [24_i32, 2_i64, 1.0_f64],
        })
        .unwrap();

        assert_eq!(sample.required, 1_700_000_000_000);
        assert_eq!(sample.optional, Some(5));
        assert_eq!(sample.list, Some(vec![24, 2, 1]));
    }

    #[test]
    fn missing_and_null_optionals_are_none() {
        let sample: Sample = from_document(doc! { "required": 1, "optional": null }).unwrap();

        assert_eq!(sample.optional, None);
        assert_eq!(sample.list, None);
    }

    #[test]
    fn rejects_fractional_values() {
        let result = from_document::<Sample>(doc! { "required": 1.5 });
        assert!(result.is_err());
    }

    #[test]
    fn ally_codes_read_as_strings() {
        #[derive(Deserialize)]
        struct Account {
            #[serde(deserialize_with = "super::lenient_string")]
            code: String,
        }

        let numeric: Account = from_document(doc! { "code": 123456789 }).unwrap();
        let text: Account = from_document(doc! { "code": "987654321" }).unwrap();

        assert_eq!(numeric.code, "123456789");
        assert_eq!(text.code, "987654321");
    }

    #[test]
    fn accepts_json_numbers() {
        let sample: Sample = serde_json::from_str(r#"{"required": 42, "list": [3]}"#).unwrap();
        assert_eq!(sample.required, 42);
        assert_eq!(sample.list, Some(vec![3]));
    }
}
