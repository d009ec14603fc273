//! Dashboard view state and the reducer that advances it.
//!
//! One user interaction is one [`Event`]; applying it yields a brand new
//! [`DashboardState`]. Nothing is mutated in place, so a session never
//! observes a half-applied change and every transition is testable without
//! a dataset.

use serde::{Deserialize, Serialize};

use crate::filter::{Facet, FilterSelection};
use crate::pagination::{self, PAGE_SIZE};
use crate::view::{SortColumn, SortKey};

/// Table paging and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// 1-based
    pub page: usize,
    /// `None` keeps dataset order
    pub sort: Option<SortKey>,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            page: 1,
            sort: None,
            page_size: PAGE_SIZE,
        }
    }
}

impl ViewState {
    /// Clicking a column header: the same column flips direction, a new
    /// column starts ascending. The page is left alone.
    pub fn sort_by(&self, column: SortColumn) -> Self {
        let sort = match self.sort {
            Some(key) if key.column == column => SortKey {
                column,
                order: key.order.toggled(),
            },
            _ => SortKey::ascending(column),
        };
        ViewState {
            sort: Some(sort),
            ..*self
        }
    }

    pub fn at_page(&self, page: usize) -> Self {
        ViewState { page, ..*self }
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        pagination::total_pages(total_rows, self.page_size)
    }
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pin a facet; an empty value unsets it
    SetFilter(Facet, String),
    ClearFilter(Facet),
    ResetFilters,
    SortBy(SortColumn),
    GoToPage(usize),
    NextPage,
    PreviousPage,
}

impl Event {
    pub fn changes_filter(&self) -> bool {
        matches!(
            self,
            Event::SetFilter(..) | Event::ClearFilter(_) | Event::ResetFilters
        )
    }
}

/// Everything a session remembers between events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub selection: FilterSelection,
    pub view: ViewState,
}

impl DashboardState {
    pub fn new() -> Self {
        DashboardState::default()
    }

    /// Apply one event.
    ///
    /// `filtered_rows` is the row count under the *current* selection; it
    /// bounds page navigation. Filter changes always return to page 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use evdash::filter::Facet;
    /// use evdash::state::{DashboardState, Event};
    ///
    /// let state = DashboardState::new().apply(&Event::GoToPage(3), 45);
    /// assert_eq!(state.view.page, 3);
    ///
    /// let state = state.apply(&Event::SetFilter(Facet::Make, "TESLA".into()), 45);
    /// assert_eq!(state.view.page, 1);
    /// assert_eq!(state.active_filters(), 1);
    /// ```
    pub fn apply(&self, event: &Event, filtered_rows: usize) -> DashboardState {
        let total_pages = self.view.total_pages(filtered_rows);

        let (selection, view) = match event {
            Event::SetFilter(facet, value) => (self.selection.with(*facet, value.as_str()), self.view),
            Event::ClearFilter(facet) => (self.selection.without(*facet), self.view),
            Event::ResetFilters => (FilterSelection::default(), self.view),
            Event::SortBy(column) => (self.selection.clone(), self.view.sort_by(*column)),
            Event::GoToPage(page) => (
                self.selection.clone(),
                self.view.at_page(pagination::clamp_page(*page, total_pages)),
            ),
            Event::NextPage => (
                self.selection.clone(),
                self.view.at_page(pagination::next_page(self.view.page, total_pages)),
            ),
            Event::PreviousPage => (
                self.selection.clone(),
                self.view.at_page(pagination::previous_page(self.view.page)),
            ),
        };

        let view = if event.changes_filter() {
            view.at_page(1)
        } else {
            view
        };

        DashboardState { selection, view }
    }

    pub fn active_filters(&self) -> usize {
        self.selection.active_count()
    }
}
