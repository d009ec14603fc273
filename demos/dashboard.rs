/// Dashboard Example
///
/// This example demonstrates:
/// - Loading registrations from a CSV file (or a built-in sample)
/// - Whole-dataset aggregates and facet option lists
/// - Driving a dashboard session with filter, sort and page events
///
/// Run with an optional path:
///   cargo run --example dashboard -- path/to/Electric_Vehicle_Population_Data.csv

use evdash::{
    fields, CsvFileSource, Dashboard, DashboardState, Event, Facet, InMemorySource, RecordSource,
    SortColumn,
};
use std::env;
use std::io::Cursor;

const SAMPLE: &str = "\
VIN,County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle
5YJ3E1EA1K,King,Seattle,WA,98101,2019,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible
5YJ3E1EB2L,King,Bellevue,WA,98004,2020,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible
1N4AZ0CP5D,Pierce,Tacoma,WA,98402,2020,NISSAN,LEAF,Battery Electric Vehicle (BEV),Eligible
WBY7Z2C53J,Kitsap,Bremerton,WA,98310,2020,BMW,I3,Plug-in Hybrid Electric Vehicle (PHEV),Not eligible
5YJYGDEE3M,King,Seattle,WA,98101,2021,TESLA,MODEL Y,Battery Electric Vehicle (BEV),Unknown
KNDCC3LG8L,Snohomish,Everett,WA,98201,2021,KIA,NIRO,Plug-in Hybrid Electric Vehicle (PHEV),Not eligible
1G1FY6S07K,Spokane,Spokane,WA,99201,2021,CHEVROLET,BOLT EV,Battery Electric Vehicle (BEV),Eligible
5YJ3E1EA7J,King,Redmond,WA,98052,2021,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== evdash Dashboard Example ===\n");

    // 1. Load the dataset
    println!("1. Loading dataset...");
    let source: Box<dyn RecordSource> = match env::args().nth(1) {
        Some(path) => Box::new(CsvFileSource::new(path)),
        None => Box::new(InMemorySource::new(evdash::ingest::parse_csv(
            "sample",
            Cursor::new(SAMPLE),
        )?)),
    };
    println!("   Source: {}", source.describe());
    let dashboard = Dashboard::load(source.as_ref())?;
    println!("   Loaded {} records\n", dashboard.dataset().len());

    // 2. Whole-dataset aggregates
    println!("2. Summary...");
    let summary = dashboard.summary(&Default::default());
    println!("   Total EVs: {}", summary.total_evs);
    println!("   Unique cities: {}", summary.unique_cities);
    if let Some(latest) = &summary.latest_year {
        println!(
            "   Latest year {}: {} registrations ({:+}% year over year)",
            latest.year, latest.count, summary.year_over_year_growth
        );
    }
    println!("   Top makes:");
    for make in &summary.top_makes {
        println!("      {:<12} {}", make.make, make.count);
    }
    println!();

    // 3. Facet option lists
    println!("3. Facets...");
    let domains = dashboard.facet_domains();
    for facet in Facet::ALL {
        println!("   {:<7} {:?}", facet.as_str(), domains.get(facet));
    }
    println!();

    // 4. A short session
    println!("4. Session: filter to TESLA, sort by Model Year twice...");
    let mut state = DashboardState::new();
    for event in [
        Event::SetFilter(Facet::Make, "TESLA".to_string()),
        Event::SortBy(SortColumn::ModelYear),
        Event::SortBy(SortColumn::ModelYear),
    ] {
        let rows = dashboard.filtered_len(&state.selection);
        state = state.apply(&event, rows);
    }

    let snapshot = dashboard.snapshot(&state);
    println!(
        "   Active filters: {}, showing {} to {} of {}",
        snapshot.active_filters,
        snapshot.page.first_index,
        snapshot.page.last_index,
        snapshot.page.total_rows
    );
    for row in &snapshot.page.rows {
        println!(
            "      {} {} {} ({}, {})",
            row.get(fields::MODEL_YEAR),
            row.get(fields::MAKE),
            row.get(fields::MODEL),
            row.get(fields::CITY),
            row.get(fields::STATE)
        );
    }
    println!("   Pages: {:?}", snapshot.page.visible_page_numbers);

    println!("\n=== Example Complete ===");
    Ok(())
}
