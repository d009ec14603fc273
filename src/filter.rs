/// Filter engine
///
/// Four independent facets (make, model year, county, vehicle type), each
/// either unset or pinned to one literal value. A record passes when it
/// equals every pinned value exactly.
///
/// Facet option lists always come from the full, unfiltered dataset: picking
/// a make never shrinks the years, counties or types offered.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::aggregate::parse_year;
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::record::{fields, Record};
use crate::view::FilterView;

/// A filterable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Make,
    Year,
    County,
    Type,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Make, Facet::Year, Facet::County, Facet::Type];

    /// Record field this facet reads.
    pub fn field(&self) -> &'static str {
        match self {
            Facet::Make => fields::MAKE,
            Facet::Year => fields::MODEL_YEAR,
            Facet::County => fields::COUNTY,
            Facet::Type => fields::ELECTRIC_VEHICLE_TYPE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Make => "make",
            Facet::Year => "year",
            Facet::County => "county",
            Facet::Type => "type",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "make" => Ok(Facet::Make),
            "year" | "model year" | "model_year" => Ok(Facet::Year),
            "county" => Ok(Facet::County),
            "type" | "electric vehicle type" | "ev_type" => Ok(Facet::Type),
            _ => Err(DashboardError::UnknownFacet(s.to_string())),
        }
    }
}

/// The user's current facet choices.
///
/// An immutable value: every change produces a new selection. The empty
/// string means "unset", matching an "All ..." option in the UI.
///
/// # Examples
///
/// ```
/// use evdash::filter::{Facet, FilterSelection};
///
/// let selection = FilterSelection::default()
///     .with(Facet::Make, "TESLA")
///     .with(Facet::Year, "2020");
/// assert_eq!(selection.active_count(), 2);
///
/// let cleared = selection.with(Facet::Make, "");
/// assert_eq!(cleared.get(Facet::Make), None);
/// assert_eq!(cleared.active_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    county: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    vehicle_type: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        FilterSelection::default()
    }

    fn slot(&mut self, facet: Facet) -> &mut Option<String> {
        match facet {
            Facet::Make => &mut self.make,
            Facet::Year => &mut self.year,
            Facet::County => &mut self.county,
            Facet::Type => &mut self.vehicle_type,
        }
    }

    pub fn get(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Make => &self.make,
            Facet::Year => &self.year,
            Facet::County => &self.county,
            Facet::Type => &self.vehicle_type,
        };
        value.as_deref()
    }

    /// A copy of this selection with `facet` pinned to `value`
    /// (or unset when `value` is empty).
    pub fn with(&self, facet: Facet, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        *next.slot(facet) = if value.is_empty() { None } else { Some(value) };
        next
    }

    pub fn without(&self, facet: Facet) -> Self {
        let mut next = self.clone();
        *next.slot(facet) = None;
        next
    }

    /// Build from optional raw values, as they arrive from a query string.
    pub fn from_parts(
        make: Option<String>,
        year: Option<String>,
        county: Option<String>,
        vehicle_type: Option<String>,
    ) -> Self {
        [
            (Facet::Make, make),
            (Facet::Year, year),
            (Facet::County, county),
            (Facet::Type, vehicle_type),
        ]
        .into_iter()
        .fold(FilterSelection::default(), |selection, (facet, value)| match value {
            Some(value) => selection.with(facet, value),
            None => selection,
        })
    }

    /// Number of pinned facets (0 to 4).
    pub fn active_count(&self) -> usize {
        Facet::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Pinned facets with their values, in facet order.
    pub fn active(&self) -> Vec<(Facet, &str)> {
        Facet::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|v| (*f, v)))
            .collect()
    }

    /// True when `record` equals every pinned value.
    pub fn matches(&self, record: &Record) -> bool {
        Facet::ALL.iter().all(|facet| match self.get(*facet) {
            Some(value) => record.get(facet.field()) == value,
            None => true,
        })
    }
}

/// Option lists offered for each facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDomains {
    pub make: Vec<String>,
    pub year: Vec<String>,
    pub county: Vec<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Vec<String>,
}

impl FacetDomains {
    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Make => &self.make,
            Facet::Year => &self.year,
            Facet::County => &self.county,
            Facet::Type => &self.vehicle_type,
        }
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.get(facet).iter().any(|v| v == value)
    }
}

fn distinct_values<'a, I>(records: I, field: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|record| record.get(field))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Newest year first; values that are not numbers go last, alphabetically.
fn compare_years_desc(a: &String, b: &String) -> Ordering {
    match (parse_year(a), parse_year(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Deduplicated, sorted option lists for every facet.
///
/// Pass the full dataset here, never a filtered view.
pub fn facet_domains(dataset: &Dataset) -> FacetDomains {
    let mut year: Vec<String> = distinct_values(dataset, fields::MODEL_YEAR)
        .into_iter()
        .collect();
    year.sort_by(compare_years_desc);

    FacetDomains {
        make: distinct_values(dataset, fields::MAKE).into_iter().collect(),
        year,
        county: distinct_values(dataset, fields::COUNTY).into_iter().collect(),
        vehicle_type: distinct_values(dataset, fields::ELECTRIC_VEHICLE_TYPE)
            .into_iter()
            .collect(),
    }
}

/// Rows of `dataset` matching every pinned facet, in dataset order.
pub fn apply_filters(dataset: &Arc<Dataset>, selection: &FilterSelection) -> FilterView {
    FilterView::new(Arc::clone(dataset), selection.clone())
}
