//! Dataset Implementation
//!
//! A Dataset is the immutable, ordered collection of records loaded for a
//! session, together with the header row it was ingested with.
//! Sessions share one dataset through `Arc<Dataset>`; views over it keep
//! row indices rather than copies.
//!
//! # Examples
//!
//! ```
//! use evdash::{Dataset, Record, Schema};
//! use evdash::record::fields;
//!
//! let schema = Schema::new(vec![fields::MAKE.to_string(), fields::MODEL.to_string()]);
//! let dataset = Dataset::new(
//!     "ev".to_string(),
//!     schema,
//!     vec![Record::from_pairs([(fields::MAKE, "TESLA"), (fields::MODEL, "MODEL 3")])],
//! );
//!
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.get_value(0, fields::MODEL).unwrap(), "MODEL 3");
//! ```

use crate::error::{DashboardError, Result};
use crate::record::{fields, Record};

/// Header row of an ingested dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Schema { columns }
    }

    /// Returns the number of columns in the schema.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// Returns the index of a column by name, or None if not found.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|n| n == name)
    }

    /// Mandatory fields absent from this header row.
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        fields::MANDATORY
            .iter()
            .copied()
            .filter(|field| self.get_column_index(field).is_none())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    name: String,
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(name: String, schema: Schema, records: Vec<Record>) -> Self {
        Dataset {
            name,
            schema,
            records,
        }
    }

    /// Build a dataset whose schema is the union of the records' fields,
    /// in first-seen order.
    pub fn from_records(name: String, records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for (field, _) in record.iter() {
                if !columns.iter().any(|c| c == field) {
                    columns.push(field.to_string());
                }
            }
        }
        Dataset::new(name, Schema::new(columns), records)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get_row(&self, index: usize) -> Result<&Record> {
        self.records.get(index).ok_or(DashboardError::RowOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn get_value(&self, row: usize, field: &str) -> Result<&str> {
        Ok(self.get_row(row)?.get(field))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
