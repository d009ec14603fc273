/// Record builders shared by unit tests.

use crate::dataset::Dataset;
use crate::record::{fields, Record};
use std::sync::Arc;

/// A registration with the four facet fields set and the rest filled in.
pub fn ev(make: &str, year: &str, county: &str, ev_type: &str) -> Record {
    Record::from_pairs([
        (fields::VIN, format!("{}{}", make.get(..3).unwrap_or(make), year)),
        (fields::COUNTY, county.to_string()),
        (fields::CITY, "Seattle".to_string()),
        (fields::STATE, "WA".to_string()),
        (fields::POSTAL_CODE, "98101".to_string()),
        (fields::MODEL_YEAR, year.to_string()),
        (fields::MAKE, make.to_string()),
        (fields::MODEL, "MODEL".to_string()),
        (fields::ELECTRIC_VEHICLE_TYPE, ev_type.to_string()),
        (fields::CLEAN_ALTERNATIVE_FUEL_VEHICLE, "Eligible".to_string()),
    ])
}

/// Like [`ev`] but with an explicit location.
pub fn ev_at(make: &str, year: &str, city: &str, state: &str) -> Record {
    let mut record = ev(make, year, "King", "Battery Electric Vehicle (BEV)");
    record.insert(fields::CITY, city);
    record.insert(fields::STATE, state);
    record
}

pub fn shared(records: Vec<Record>) -> Arc<Dataset> {
    Arc::new(Dataset::from_records("test".to_string(), records))
}
