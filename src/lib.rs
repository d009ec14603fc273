/// evdash - Electric Vehicle Registration Dashboard Engine
///
/// Loads a static dataset of EV registration records, aggregates it along
/// make, model year, vehicle type, city and state, and serves filtered
/// aggregates and a sorted, paginated table to a browser dashboard.

pub mod error;
pub mod record;
pub mod dataset;
pub mod ingest;
pub mod aggregate;
pub mod filter;
pub mod view;
pub mod pagination;
pub mod state;
pub mod dashboard;

#[cfg(test)]
mod testing;

pub use error::{DashboardError, Result};
pub use record::{fields, Record, UNKNOWN};
pub use dataset::{Dataset, Schema};
pub use ingest::{CsvFileSource, InMemorySource, RecordSource};
pub use aggregate::{aggregate, AggregateSummary, MakeCount, YearCount, TypeCount, StateCount, CityCount};
pub use filter::{apply_filters, facet_domains, Facet, FacetDomains, FilterSelection};
pub use view::{FilterView, SortColumn, SortKey, SortOrder, SortedView};
pub use pagination::{paginate, Page, PAGE_SIZE};
pub use state::{DashboardState, Event, ViewState};
pub use dashboard::{Dashboard, DashboardSnapshot};

// HTTP/WebSocket server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod websocket;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
VIN,County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle
5YJ3E1EA1K,King,Seattle,WA,98101,2019,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible
5YJ3E1EB2L,King,Bellevue,WA,98004,2020,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible
1N4AZ0CP5D,Pierce,Tacoma,WA,98402,2020,NISSAN,LEAF,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible
WBY7Z2C53J,Kitsap,Bremerton,WA,98310,2020,BMW,I3,Plug-in Hybrid Electric Vehicle (PHEV),Not eligible due to low battery range
5YJYGDEE3M,King,Seattle,WA,98101,2021,TESLA,MODEL Y,Battery Electric Vehicle (BEV),Eligibility unknown as battery range has not been researched
";

    #[test]
    fn test_complete_workflow() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        // Load through the same path the server uses
        let source = CsvFileSource::new(file.path());
        let dashboard = Dashboard::load(&source).unwrap();
        assert_eq!(dashboard.dataset().len(), 5);
        assert!(dashboard.dataset().schema().missing_mandatory().is_empty());

        // Whole-dataset aggregates
        let summary = dashboard.summary(&FilterSelection::default());
        assert_eq!(summary.total_evs, 5);
        assert_eq!(summary.top_makes[0], MakeCount { make: "TESLA".into(), count: 3 });
        assert_eq!(summary.unique_cities, 4);
        assert_eq!(summary.latest_year, Some(YearCount { year: "2021".into(), count: 1 }));
        assert_eq!(summary.year_over_year_growth, -67);

        // Facet domains come from the whole dataset
        let domains = dashboard.facet_domains();
        assert_eq!(domains.year, vec!["2021", "2020", "2019"]);
        assert_eq!(domains.county, vec!["King", "Kitsap", "Pierce"]);

        // Drive a session through a few events
        let mut state = DashboardState::new();
        for event in [
            Event::SetFilter(Facet::Year, "2020".into()),
            Event::SortBy(SortColumn::Make),
            Event::SortBy(SortColumn::Make),
        ] {
            let rows = dashboard.filtered_len(&state.selection);
            state = state.apply(&event, rows);
        }

        let snapshot = dashboard.snapshot(&state);
        assert_eq!(snapshot.active_filters, 1);
        assert_eq!(snapshot.summary.total_evs, 3);
        let makes: Vec<&str> = snapshot.page.rows.iter().map(|r| r.get(fields::MAKE)).collect();
        assert_eq!(makes, vec!["TESLA", "NISSAN", "BMW"]);
        assert_eq!(snapshot.page.visible_page_numbers, vec![1]);

        // Clearing the filter restores the full set
        let state = state.apply(&Event::ResetFilters, 3);
        assert_eq!(dashboard.snapshot(&state).summary.total_evs, 5);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let source = CsvFileSource::new("/definitely/not/here.csv");
        let err = Dashboard::load(&source).unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
