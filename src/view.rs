/// EvDash View Implementation
///
/// Views are read-only derived record sets over a shared dataset. They hold
/// row indices into the parent, never copies of the records, so building a
/// view per user event stays cheap.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::{DashboardError, Result};
use crate::filter::FilterSelection;
use crate::record::{fields, Record};

/// A FilterView keeps the rows of the parent dataset that match a selection.
/// Maintains a mapping from view indices to parent indices, in parent order.
#[derive(Debug, Clone)]
pub struct FilterView {
    parent: Arc<Dataset>,
    selection: FilterSelection,
    view_to_parent: Vec<usize>,
}

impl FilterView {
    pub fn new(parent: Arc<Dataset>, selection: FilterSelection) -> Self {
        let view_to_parent = parent
            .iter()
            .enumerate()
            .filter(|(_, record)| selection.matches(record))
            .map(|(i, _)| i)
            .collect();

        FilterView {
            parent,
            selection,
            view_to_parent,
        }
    }

    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    pub fn get_row(&self, index: usize) -> Result<&Record> {
        match self.view_to_parent.get(index) {
            Some(&parent_index) => self.parent.get_row(parent_index),
            None => Err(DashboardError::RowOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.view_to_parent.get(view_index).copied()
    }

    pub fn parent_indices(&self) -> &[usize] {
        &self.view_to_parent
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.view_to_parent
            .iter()
            .map(move |&i| &self.parent.records()[i])
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn parent(&self) -> &Arc<Dataset> {
        &self.parent
    }
}

/// Columns the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    #[serde(rename = "Make")]
    Make,
    #[serde(rename = "Model")]
    Model,
    #[serde(rename = "Model Year")]
    ModelYear,
    #[serde(rename = "Electric Vehicle Type")]
    ElectricVehicleType,
    #[serde(rename = "City")]
    City,
    #[serde(rename = "State")]
    State,
}

impl SortColumn {
    /// Table columns in display order.
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Make,
        SortColumn::Model,
        SortColumn::ModelYear,
        SortColumn::ElectricVehicleType,
        SortColumn::City,
        SortColumn::State,
    ];

    pub fn field(&self) -> &'static str {
        match self {
            SortColumn::Make => fields::MAKE,
            SortColumn::Model => fields::MODEL,
            SortColumn::ModelYear => fields::MODEL_YEAR,
            SortColumn::ElectricVehicleType => fields::ELECTRIC_VEHICLE_TYPE,
            SortColumn::City => fields::CITY,
            SortColumn::State => fields::STATE,
        }
    }

    /// Short header label shown above the column.
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::ModelYear => "Year",
            SortColumn::ElectricVehicleType => "Type",
            other => other.field(),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for SortColumn {
    type Err = DashboardError;

    /// Accepts the record field name or the column label, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        SortColumn::ALL
            .iter()
            .copied()
            .find(|c| c.field().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownColumn(s.to_string()))
    }
}

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order (largest first)
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(DashboardError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// A column and the order to sort it in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: SortColumn) -> Self {
        SortKey {
            column,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        SortKey {
            column,
            order: SortOrder::Descending,
        }
    }

    /// Compare two records by the raw string value of the key column.
    ///
    /// Values are compared as strings even when they look numeric, so
    /// "999" sorts after "2020".
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let field = self.column.field();
        let base_cmp = a.get(field).cmp(b.get(field));
        match self.order {
            SortOrder::Ascending => base_cmp,
            SortOrder::Descending => base_cmp.reverse(),
        }
    }
}

/// Stable sort of a record list. Equal keys keep their input order in both
/// directions.
pub fn sort_records<'a>(records: &[&'a Record], key: &SortKey) -> Vec<&'a Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// A SortedView presents the rows of a filter view in sorted order.
///
/// Without a sort key the rows keep the filter view's order.
///
/// # Examples
///
/// ```
/// use evdash::{Dataset, FilterSelection, FilterView, Record, SortColumn, SortKey, SortedView};
/// use evdash::record::fields;
/// use std::sync::Arc;
///
/// let dataset = Arc::new(Dataset::from_records(
///     "ev".to_string(),
///     vec![
///         Record::from_pairs([(fields::MAKE, "TESLA")]),
///         Record::from_pairs([(fields::MAKE, "AUDI")]),
///     ],
/// ));
/// let rows = FilterView::new(dataset, FilterSelection::default());
/// let sorted = SortedView::new(&rows, Some(SortKey::ascending(SortColumn::Make)));
///
/// assert_eq!(sorted.get_row(0).unwrap().get(fields::MAKE), "AUDI");
/// assert_eq!(sorted.get_parent_index(0), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct SortedView {
    parent: Arc<Dataset>,
    sort_key: Option<SortKey>,
    /// Sorted index: sorted_index[view_pos] = parent_row_index
    sorted_index: Vec<usize>,
}

impl SortedView {
    pub fn new(rows: &FilterView, sort_key: Option<SortKey>) -> Self {
        let parent = Arc::clone(rows.parent());
        let mut sorted_index = rows.parent_indices().to_vec();

        if let Some(key) = &sort_key {
            let records = parent.records();
            sorted_index.sort_by(|&a, &b| key.compare(&records[a], &records[b]));
        }

        SortedView {
            parent,
            sort_key,
            sorted_index,
        }
    }

    pub fn len(&self) -> usize {
        self.sorted_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_index.is_empty()
    }

    /// Get a row at the given view position (sorted order)
    pub fn get_row(&self, index: usize) -> Result<&Record> {
        match self.sorted_index.get(index) {
            Some(&parent_index) => self.parent.get_row(parent_index),
            None => Err(DashboardError::RowOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    /// Returns the parent dataset row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.sorted_index.get(view_index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.sorted_index
            .iter()
            .map(move |&i| &self.parent.records()[i])
    }

    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort_key.as_ref()
    }
}
