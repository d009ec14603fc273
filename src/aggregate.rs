/// Aggregation engine
///
/// Turns a set of records (a whole dataset or a filtered view of it) into the
/// summary the dashboard renders: totals, top manufacturers, the model-year
/// series with year-over-year growth, vehicle-type shares and per-city/state
/// counts.
///
/// The engine is a single pure function. Every ranked list is produced by a
/// stable sort over buckets kept in first-seen order, so ties resolve to the
/// order in which a value first appeared in the input.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::record::{fields, Record, UNKNOWN};

/// Number of manufacturers kept in [`AggregateSummary::top_makes`].
pub const TOP_MAKES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeCount {
    #[serde(rename = "Make")]
    pub make: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: String,
    pub count: usize,
}

/// One slice of the vehicle-type breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCount {
    pub state: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Everything derived from one scan of a record set.
///
/// Always rebuilt as a whole; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    #[serde(rename = "totalEVs")]
    pub total_evs: usize,
    pub top_makes: Vec<MakeCount>,
    pub year_data: Vec<YearCount>,
    pub type_data: Vec<TypeCount>,
    pub unique_cities: usize,
    pub latest_year: Option<YearCount>,
    pub previous_year: Option<YearCount>,
    pub year_over_year_growth: i64,
    pub state_data: Vec<StateCount>,
    pub city_data: Vec<CityCount>,
}

/// Occurrence counts keyed by value, remembering first-seen order.
#[derive(Debug, Default)]
struct Tally {
    buckets: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.buckets[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.buckets.len());
                self.buckets.push((key.to_string(), 1));
            }
        }
    }

    fn total(&self) -> usize {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    /// Buckets by descending count; ties keep first-seen order.
    fn ranked(mut self) -> Vec<(String, usize)> {
        self.buckets.sort_by(|a, b| b.1.cmp(&a.1));
        self.buckets
    }

    fn into_buckets(self) -> Vec<(String, usize)> {
        self.buckets
    }
}

/// Numeric value of a model year, if it has one.
///
/// Non-finite values ("inf", "NaN") are not years.
pub fn parse_year(year: &str) -> Option<f64> {
    year.trim().parse::<f64>().ok().filter(|y| y.is_finite())
}

/// Rounded percentage change from `previous` to `latest`.
///
/// Rounds half up, so `-2.5` becomes `-2` and `2.5` becomes `3`.
/// Returns 0 when there is no previous volume to compare against.
pub fn growth_percent(previous: usize, latest: usize) -> i64 {
    if previous == 0 {
        return 0;
    }
    let change = (latest as f64 - previous as f64) / previous as f64 * 100.0;
    (change + 0.5).floor() as i64
}

/// Aggregate a record set.
///
/// Accepts anything that iterates over record references, such as
/// `&Dataset` or a filter view's `iter()`. Total over every input,
/// including the empty one.
///
/// # Examples
///
/// ```
/// use evdash::aggregate::aggregate;
/// use evdash::record::{fields, Record};
///
/// let records: Vec<Record> = ["TESLA", "TESLA", "NISSAN"]
///     .iter()
///     .map(|make| Record::from_pairs([(fields::MAKE, *make)]))
///     .collect();
///
/// let summary = aggregate(&records);
/// assert_eq!(summary.total_evs, 3);
/// assert_eq!(summary.top_makes[0].make, "TESLA");
/// assert_eq!(summary.top_makes[0].count, 2);
/// assert_eq!(summary.top_makes[1].make, "NISSAN");
/// ```
pub fn aggregate<'a, I>(records: I) -> AggregateSummary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut makes = Tally::default();
    let mut years = Tally::default();
    let mut types = Tally::default();
    let mut states = Tally::default();
    let mut cities = Tally::default();
    let mut locations: HashSet<(&'a str, &'a str)> = HashSet::new();
    let mut total_evs = 0;

    for record in records {
        total_evs += 1;
        makes.add(record.get_or_unknown(fields::MAKE));
        years.add(record.get_or_unknown(fields::MODEL_YEAR));
        types.add(record.get_or_unknown(fields::ELECTRIC_VEHICLE_TYPE));

        let city = record.get_or_unknown(fields::CITY);
        let state = record.get_or_unknown(fields::STATE);
        cities.add(city);
        states.add(state);
        locations.insert((city, state));
    }

    debug_assert_eq!(makes.total(), total_evs);

    let top_makes: Vec<MakeCount> = makes
        .ranked()
        .into_iter()
        .take(TOP_MAKES)
        .map(|(make, count)| MakeCount { make, count })
        .collect();

    let mut dated: Vec<(f64, YearCount)> = years
        .into_buckets()
        .into_iter()
        .filter(|(year, _)| year != UNKNOWN)
        .filter_map(|(year, count)| parse_year(&year).map(|n| (n, YearCount { year, count })))
        .collect();
    dated.sort_by(|a, b| a.0.total_cmp(&b.0));
    let year_data: Vec<YearCount> = dated.into_iter().map(|(_, year)| year).collect();

    let type_data: Vec<TypeCount> = types
        .into_buckets()
        .into_iter()
        .filter(|(name, _)| name != UNKNOWN)
        .map(|(name, value)| TypeCount { name, value })
        .collect();

    let latest_year = year_data.last().cloned();
    let previous_year = if year_data.len() > 1 {
        year_data.get(year_data.len() - 2).cloned()
    } else {
        None
    };
    let year_over_year_growth = match (&latest_year, &previous_year) {
        (Some(latest), Some(previous)) => growth_percent(previous.count, latest.count),
        _ => 0,
    };

    let state_data = states
        .ranked()
        .into_iter()
        .map(|(state, count)| StateCount { state, count })
        .collect();
    let city_data = cities
        .ranked()
        .into_iter()
        .map(|(city, count)| CityCount { city, count })
        .collect();

    AggregateSummary {
        total_evs,
        top_makes,
        year_data,
        type_data,
        unique_cities: locations.len(),
        latest_year,
        previous_year,
        year_over_year_growth,
        state_data,
        city_data,
    }
}

/// Full per-make tally (not truncated to the top ten), descending by count.
pub fn make_counts<'a, I>(records: I) -> Vec<MakeCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut makes = Tally::default();
    for record in records {
        makes.add(record.get_or_unknown(fields::MAKE));
    }
    makes
        .ranked()
        .into_iter()
        .map(|(make, count)| MakeCount { make, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ev, ev_at};
    use proptest::prelude::*;

    const BEV: &str = "Battery Electric Vehicle (BEV)";
    const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

    fn years(counts: &[(&str, usize)]) -> Vec<Record> {
        counts
            .iter()
            .flat_map(|(year, n)| (0..*n).map(move |_| ev("TESLA", year, "King", BEV)))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Record> = Vec::new();
        let summary = aggregate(&records);

        assert_eq!(summary, AggregateSummary::default());
        assert_eq!(summary.total_evs, 0);
        assert!(summary.top_makes.is_empty());
        assert!(summary.year_data.is_empty());
        assert_eq!(summary.unique_cities, 0);
        assert_eq!(summary.latest_year, None);
        assert_eq!(summary.previous_year, None);
        assert_eq!(summary.year_over_year_growth, 0);
    }

    #[test]
    fn test_top_makes_ties_keep_first_seen_order() {
        let records = vec![
            ev("NISSAN", "2020", "King", BEV),
            ev("TESLA", "2020", "King", BEV),
            ev("KIA", "2020", "King", BEV),
            ev("TESLA", "2020", "King", BEV),
            ev("KIA", "2020", "King", BEV),
        ];
        let summary = aggregate(&records);

        let ranked: Vec<(&str, usize)> = summary
            .top_makes
            .iter()
            .map(|m| (m.make.as_str(), m.count))
            .collect();
        assert_eq!(ranked, vec![("TESLA", 2), ("KIA", 2), ("NISSAN", 1)]);
    }

    #[test]
    fn test_top_makes_truncated_to_ten() {
        let records: Vec<Record> = (0..12)
            .flat_map(|i| {
                let make = format!("MAKE{:02}", i);
                (0..=i).map(move |_| ev(&make, "2021", "King", BEV))
            })
            .collect();
        let summary = aggregate(&records);

        assert_eq!(summary.top_makes.len(), TOP_MAKES);
        assert_eq!(summary.top_makes[0].make, "MAKE11");
        assert_eq!(summary.top_makes[9].make, "MAKE02");
        assert_eq!(make_counts(&records).len(), 12);
    }

    #[test]
    fn test_missing_make_is_counted_as_unknown() {
        let records = vec![ev("", "2020", "King", BEV), ev("TESLA", "2020", "King", BEV)];
        let summary = aggregate(&records);

        assert!(summary.top_makes.iter().any(|m| m.make == UNKNOWN && m.count == 1));
    }

    #[test]
    fn test_year_series_sorted_numerically_and_filtered() {
        let records = years(&[("2021", 2), ("N/A", 4), ("", 1), ("2009", 1), ("2010", 3)]);
        let summary = aggregate(&records);

        let series: Vec<(&str, usize)> = summary
            .year_data
            .iter()
            .map(|y| (y.year.as_str(), y.count))
            .collect();
        assert_eq!(series, vec![("2009", 1), ("2010", 3), ("2021", 2)]);
        assert_eq!(summary.latest_year.as_ref().unwrap().year, "2021");
        assert_eq!(summary.previous_year.as_ref().unwrap().year, "2010");
    }

    #[test]
    fn test_growth_example() {
        let summary = aggregate(&years(&[("2020", 150), ("2019", 100)]));
        assert_eq!(summary.year_over_year_growth, 50);
    }

    #[test]
    fn test_growth_needs_two_years() {
        let summary = aggregate(&years(&[("2020", 7)]));
        assert_eq!(summary.latest_year.unwrap().count, 7);
        assert_eq!(summary.previous_year, None);
        assert_eq!(summary.year_over_year_growth, 0);
    }

    #[test]
    fn test_growth_rounding() {
        assert_eq!(growth_percent(3, 4), 33);
        assert_eq!(growth_percent(3, 2), -33);
        assert_eq!(growth_percent(8, 5), -37); // -37.5 rounds half up
        assert_eq!(growth_percent(8, 11), 38); // 37.5 rounds half up
        assert_eq!(growth_percent(0, 10), 0);
        assert_eq!(growth_percent(4, 0), -100);
    }

    #[test]
    fn test_type_series_drops_unknown_and_keeps_first_seen_order() {
        let records = vec![
            ev("TESLA", "2020", "King", PHEV),
            ev("TESLA", "2020", "King", ""),
            ev("TESLA", "2020", "King", BEV),
            ev("TESLA", "2020", "King", BEV),
        ];
        let summary = aggregate(&records);

        assert_eq!(
            summary.type_data,
            vec![
                TypeCount { name: PHEV.to_string(), value: 1 },
                TypeCount { name: BEV.to_string(), value: 2 },
            ]
        );
    }

    #[test]
    fn test_city_and_state_series() {
        let records = vec![
            ev_at("TESLA", "2020", "Tacoma", "WA"),
            ev_at("TESLA", "2020", "Seattle", "WA"),
            ev_at("TESLA", "2020", "Seattle", "WA"),
            ev_at("TESLA", "2020", "Portland", "OR"),
            ev_at("TESLA", "2020", "", ""),
            ev_at("TESLA", "2020", "Portland", "ME"),
        ];
        let summary = aggregate(&records);

        assert_eq!(summary.unique_cities, 5);
        assert_eq!(summary.city_data[0], CityCount { city: "Seattle".into(), count: 2 });
        assert_eq!(summary.city_data[1], CityCount { city: "Portland".into(), count: 2 });
        assert!(summary.city_data.iter().any(|c| c.city == UNKNOWN));
        assert_eq!(summary.state_data[0], StateCount { state: "WA".into(), count: 3 });
        assert_eq!(summary.state_data.iter().map(|s| s.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_summary_json_field_names() {
        let summary = aggregate(&vec![ev("TESLA", "2020", "King", BEV)]);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["totalEVs"], 1);
        assert_eq!(json["topMakes"][0]["Make"], "TESLA");
        assert_eq!(json["yearData"][0]["year"], "2020");
        assert_eq!(json["typeData"][0]["value"], 1);
        assert_eq!(json["uniqueCities"], 1);
        assert_eq!(json["latestYear"]["count"], 1);
        assert!(json["previousYear"].is_null());
        assert_eq!(json["yearOverYearGrowth"], 0);
        assert_eq!(json["stateData"][0]["state"], "WA");
        assert_eq!(json["cityData"][0]["city"], "Seattle");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2021"), Some(2021.0));
        assert_eq!(parse_year("Unknown"), None);
        assert_eq!(parse_year("NaN"), None);
        assert_eq!(parse_year("inf"), None);
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        (
            prop::sample::select(vec!["TESLA", "NISSAN", "KIA", ""]),
            prop::sample::select(vec!["2018", "2019", "2020", "", "n/a"]),
            prop::sample::select(vec!["Seattle", "Tacoma", ""]),
        )
            .prop_map(|(make, year, city)| ev_at(make, year, city, "WA"))
    }

    proptest! {
        #[test]
        fn prop_total_matches_input_len(records in prop::collection::vec(record_strategy(), 0..60)) {
            let summary = aggregate(&records);
            prop_assert_eq!(summary.total_evs, records.len());
        }

        #[test]
        fn prop_full_make_tally_sums_to_len(records in prop::collection::vec(record_strategy(), 0..60)) {
            let total: usize = make_counts(&records).iter().map(|m| m.count).sum();
            prop_assert_eq!(total, records.len());
        }

        #[test]
        fn prop_order_independent_counts(records in prop::collection::vec(record_strategy(), 0..40)) {
            let mut reversed = records.clone();
            reversed.reverse();
            let a = aggregate(&records);
            let b = aggregate(&reversed);

            prop_assert_eq!(a.total_evs, b.total_evs);
            prop_assert_eq!(a.unique_cities, b.unique_cities);
            prop_assert_eq!(a.year_data, b.year_data);
            prop_assert_eq!(a.year_over_year_growth, b.year_over_year_growth);
        }
    }
}
