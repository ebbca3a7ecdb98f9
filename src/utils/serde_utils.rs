use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Encodes an optional [`Duration`] as a whole number of seconds.
///
/// Use with `#[serde(with = "crate::utils::serde_utils::seconds")]`. Fractional seconds are
/// truncated on the way out; on the way in, anything but a non-negative integer (or `null`)
/// is a deserialization error.
pub mod seconds {
    use super::*;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_u64(duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Ttl(#[serde(with = "seconds")] Option<Duration>);

    #[test]
    fn deserialize() {
        let actual: Ttl = serde_json::from_str("10800").unwrap();
        assert_eq!(actual, Ttl(Some(Duration::from_secs(3 * 60 * 60))));

        let actual: Ttl = serde_json::from_str("null").unwrap();
        assert_eq!(actual, Ttl(None));
    }

    #[test]
    fn serialize() {
        let json = serde_json::to_string(&Ttl(Some(Duration::from_secs(5 * 60)))).unwrap();
        assert_eq!(json, "300");

        let json = serde_json::to_string(&Ttl(Some(Duration::from_millis(300_900)))).unwrap();
        assert_eq!(json, "300");
    }

    #[test]
    fn rejects_values_that_are_not_whole_seconds() {
        for input in ["-1", "1.5", "\"300\"", "true"] {
            assert!(
                serde_json::from_str::<Ttl>(input).is_err(),
                "{input} should not decode"
            );
        }
    }
}
