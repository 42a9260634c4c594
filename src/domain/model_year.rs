use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Model year of a listing.
///
/// Listing titles usually start with the model year ("2024 Audi A3"), but
/// some do not ("Model 3"). In that case the year comes from the year-group
/// label the listing was found under, which is free text on the site.
/// `Year` holds a verified number, `Label` keeps the raw text.
///
/// Serialized untagged: an integer for `Year`, a string for `Label`. Reading
/// accepts any value: an integer that fits `i32` is a `Year`, other numbers
/// and strings are kept as `Label` text, anything else is the empty label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ModelYear {
    Year(i32),
    Label(String),
}

impl ModelYear {
    /// Build from a year-group label, keeping it as text only when it is not a number.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        trimmed
            .parse::<i32>()
            .map_or_else(|_| Self::Label(trimmed.to_string()), Self::Year)
    }

}

impl<'de> Deserialize<'de> for ModelYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number
                .as_i64()
                .and_then(|year| i32::try_from(year).ok())
                .map_or_else(|| Self::Label(number.to_string()), Self::Year),
            Value::String(label) => Self::Label(label),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => Self::default(),
        })
    }
}

impl Default for ModelYear {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_label_becomes_year() {
        assert_eq!(ModelYear::from_label(" 2023 "), ModelYear::Year(2023));
    }

    #[test]
    fn text_label_is_kept() {
        assert_eq!(
            ModelYear::from_label("2023年式"),
            ModelYear::Label("2023年式".to_string())
        );
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&ModelYear::Year(2024)).unwrap(), "2024");
        assert_eq!(
            serde_json::to_string(&ModelYear::Label("新款".to_string())).unwrap(),
            "\"新款\""
        );

        let year: ModelYear = serde_json::from_str("2021").unwrap();
        assert_eq!(year, ModelYear::Year(2021));
        let label: ModelYear = serde_json::from_str("\"2021 facelift\"").unwrap();
        assert_eq!(label, ModelYear::Label("2021 facelift".to_string()));
    }

    #[test]
    fn mismatched_values_still_deserialize() {
        let float: ModelYear = serde_json::from_str("2024.0").unwrap();
        assert_eq!(float, ModelYear::Label("2024.0".to_string()));

        let too_large: ModelYear = serde_json::from_str("99999999999").unwrap();
        assert_eq!(too_large, ModelYear::Label("99999999999".to_string()));

        let null: ModelYear = serde_json::from_str("null").unwrap();
        assert_eq!(null, ModelYear::default());
        let list: ModelYear = serde_json::from_str("[2024]").unwrap();
        assert_eq!(list, ModelYear::default());
    }
}
