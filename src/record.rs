/// Registration records
///
/// A record is one flat dataset row: a mapping from field name to string value.
/// Numeric-looking fields such as `Model Year` stay strings; only the
/// aggregation engine coerces them, and only for ranking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Names of the fields the engines interpret.
pub mod fields {
    pub const VIN: &str = "VIN";
    pub const COUNTY: &str = "County";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const POSTAL_CODE: &str = "Postal Code";
    pub const MODEL_YEAR: &str = "Model Year";
    pub const MAKE: &str = "Make";
    pub const MODEL: &str = "Model";
    pub const ELECTRIC_VEHICLE_TYPE: &str = "Electric Vehicle Type";
    pub const CLEAN_ALTERNATIVE_FUEL_VEHICLE: &str = "Clean Alternative Fuel Vehicle";

    /// Fields every well-formed dataset is expected to carry.
    pub const MANDATORY: [&str; 10] = [
        VIN,
        COUNTY,
        CITY,
        STATE,
        POSTAL_CODE,
        MODEL_YEAR,
        MAKE,
        MODEL,
        ELECTRIC_VEHICLE_TYPE,
        CLEAN_ALTERNATIVE_FUEL_VEHICLE,
    ];
}

/// Placeholder bucket for missing or empty facet values.
pub const UNKNOWN: &str = "Unknown";

/// One vehicle registration.
///
/// Fields the engines do not interpret are kept as-is, in header order, so
/// the raw records can be served back unchanged.
///
/// # Examples
///
/// ```
/// use evdash::record::{fields, Record};
///
/// let record = Record::from_pairs([(fields::MAKE, "TESLA"), (fields::MODEL_YEAR, "2021")]);
/// assert_eq!(record.get(fields::MAKE), "TESLA");
/// assert_eq!(record.get(fields::CITY), "");
/// assert_eq!(record.get_or_unknown(fields::CITY), "Unknown");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set `field`; a new field goes last, an existing one keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Value of `field`, or the empty string when the field is absent.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Value of `field`, with missing and empty values read as `"Unknown"`.
    pub fn get_or_unknown(&self, field: &str) -> &str {
        match self.get(field) {
            "" => UNKNOWN,
            value => value,
        }
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
