use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evdash::*;
use std::sync::Arc;

const MAKES: [&str; 6] = ["TESLA", "NISSAN", "CHEVROLET", "BMW", "KIA", "FORD"];
const COUNTIES: [&str; 4] = ["King", "Pierce", "Snohomish", "Spokane"];
const CITIES: [&str; 5] = ["Seattle", "Tacoma", "Everett", "Spokane", "Bellevue"];
const TYPES: [&str; 2] = [
    "Battery Electric Vehicle (BEV)",
    "Plug-in Hybrid Electric Vehicle (PHEV)",
];

fn synthetic_dataset(size: usize) -> Arc<Dataset> {
    let records = (0..size)
        .map(|i| {
            let year = (2011 + i % 13).to_string();
            Record::from_pairs([
                (fields::VIN, format!("VIN{:08}", i)),
                (fields::COUNTY, COUNTIES[i % COUNTIES.len()].to_string()),
                (fields::CITY, CITIES[(i / 3) % CITIES.len()].to_string()),
                (fields::STATE, "WA".to_string()),
                (fields::POSTAL_CODE, format!("98{:03}", i % 1000)),
                (fields::MODEL_YEAR, year),
                (fields::MAKE, MAKES[(i * 7) % MAKES.len()].to_string()),
                (fields::MODEL, format!("MODEL {}", i % 9)),
                (fields::ELECTRIC_VEHICLE_TYPE, TYPES[i % TYPES.len()].to_string()),
                (fields::CLEAN_ALTERNATIVE_FUEL_VEHICLE, "Eligible".to_string()),
            ])
        })
        .collect();
    Arc::new(Dataset::from_records("synthetic".to_string(), records))
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [1000, 10000, 100000].iter() {
        let dataset = synthetic_dataset(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| aggregate(black_box(dataset.iter())));
        });
    }
    group.finish();
}

fn bench_facet_domains(c: &mut Criterion) {
    let mut group = c.benchmark_group("facet_domains");

    for size in [1000, 10000, 100000].iter() {
        let dataset = synthetic_dataset(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| facet_domains(black_box(&dataset)));
        });
    }
    group.finish();
}

fn bench_apply_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filters");
    let selection = FilterSelection::new()
        .with(Facet::Make, "TESLA")
        .with(Facet::County, "King");

    for size in [1000, 10000, 100000].iter() {
        let dataset = synthetic_dataset(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| apply_filters(&dataset, black_box(&selection)).len());
        });
    }
    group.finish();
}

fn bench_sort_and_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_and_paginate");

    for size in [1000, 10000, 100000].iter() {
        let dashboard = Dashboard::new(synthetic_dataset(*size));
        let rows = dashboard.apply_filters(&FilterSelection::default());
        let view = ViewState::default().sort_by(SortColumn::Model).at_page(3);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| dashboard.sort_and_paginate(&rows, black_box(&view)));
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let dashboard = Dashboard::new(synthetic_dataset(10000));
    let state = DashboardState::new()
        .apply(&Event::SetFilter(Facet::Year, "2020".to_string()), 10000)
        .apply(&Event::SortBy(SortColumn::City), 10000);

    c.bench_function("snapshot_10000", |b| {
        b.iter(|| dashboard.snapshot(black_box(&state)))
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_facet_domains,
    bench_apply_filters,
    bench_sort_and_paginate,
    bench_snapshot,
);

criterion_main!(benches);
