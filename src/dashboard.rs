//! The query surface the presentation layer talks to.
//!
//! A [`Dashboard`] owns one loaded dataset plus its facet domains and answers
//! every read the charts, filter bar and table need. It holds no per-session
//! state: callers pass a [`FilterSelection`] or a [`DashboardState`] in.

use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregate::{aggregate, AggregateSummary};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::{self, FacetDomains, FilterSelection};
use crate::ingest::RecordSource;
use crate::pagination::{paginate, Page};
use crate::record::Record;
use crate::state::{DashboardState, ViewState};
use crate::view::{FilterView, SortKey, SortedView};

/// Everything needed to render one dashboard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub summary: AggregateSummary,
    pub active_filters: usize,
    pub selection: FilterSelection,
    pub sort: Option<SortKey>,
    pub page: Page<Record>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    domains: FacetDomains,
}

impl Dashboard {
    /// Wrap an already-loaded dataset; facet domains are computed here, once.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let domains = filter::facet_domains(&dataset);
        Dashboard { dataset, domains }
    }

    pub fn load(source: &dyn RecordSource) -> Result<Self> {
        let dataset = source.load()?;
        info!(
            "Loaded {} records from {}",
            dataset.len(),
            source.describe()
        );
        Ok(Dashboard::new(Arc::new(dataset)))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Option lists for the filter bar. Always those of the full dataset.
    pub fn facet_domains(&self) -> &FacetDomains {
        &self.domains
    }

    pub fn apply_filters(&self, selection: &FilterSelection) -> FilterView {
        filter::apply_filters(&self.dataset, selection)
    }

    /// Aggregates over the rows matching `selection`.
    pub fn summary(&self, selection: &FilterSelection) -> AggregateSummary {
        if selection.is_empty() {
            return aggregate(self.dataset.iter());
        }
        aggregate(self.apply_filters(selection).iter())
    }

    pub fn sort_and_paginate(&self, rows: &FilterView, view: &ViewState) -> Page<Record> {
        let sorted = SortedView::new(rows, view.sort);
        paginate(&sorted, view.page, view.page_size)
    }

    /// Number of rows `selection` keeps; the bound for page navigation.
    pub fn filtered_len(&self, selection: &FilterSelection) -> usize {
        self.apply_filters(selection).len()
    }

    /// Render `state` against this dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// use evdash::filter::Facet;
    /// use evdash::state::{DashboardState, Event};
    /// use evdash::{Dashboard, Dataset, Record};
    /// use std::sync::Arc;
    ///
    /// let records = ["TESLA", "TESLA", "NISSAN"]
    ///     .into_iter()
    ///     .map(|make| Record::from_pairs([("Make", make), ("Model Year", "2021")]))
    ///     .collect();
    /// let dashboard = Dashboard::new(Arc::new(Dataset::from_records("evs".into(), records)));
    ///
    /// let state = DashboardState::new().apply(&Event::SetFilter(Facet::Make, "TESLA".into()), 3);
    /// let snapshot = dashboard.snapshot(&state);
    ///
    /// assert_eq!(snapshot.summary.total_evs, 2);
    /// assert_eq!(snapshot.active_filters, 1);
    /// assert_eq!(snapshot.page.rows.len(), 2);
    /// ```
    pub fn snapshot(&self, state: &DashboardState) -> DashboardSnapshot {
        let rows = self.apply_filters(&state.selection);

        DashboardSnapshot {
            summary: aggregate(rows.iter()),
            active_filters: state.active_filters(),
            selection: state.selection.clone(),
            sort: state.view.sort,
            page: self.sort_and_paginate(&rows, &state.view),
        }
    }
}
