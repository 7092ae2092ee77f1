use crate::api::{FetchError, PageRequest, StatsClient};
use crate::filter::{ColumnFilters, UniqueValueIndex};
use crate::models::{PageResult, Record};
use crate::resource::{DateMode, ResourceDescriptor, ResourceKind};
use crate::state::{today_utc, DateFilter, PaginationState, ResourceState};

/// Handle for one in-flight page request. `complete_fetch` applies an
/// outcome only while its ticket is still the controller's newest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    page: u32,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Loading, filtering, and pagination for one statistics resource.
///
/// The controller is generic over a `ResourceDescriptor`, so incomes,
/// orders, sales, and stocks all share this one implementation; only the
/// descriptor tables differ. `fetch` covers the common case; callers that
/// race requests (one task per keystroke) can drive the
/// `begin_fetch`/`complete_fetch` pair themselves and let stale responses
/// fall on the floor.
pub struct ResourceController {
    client: StatsClient,
    descriptor: &'static ResourceDescriptor,
    state: ResourceState,
    epoch: u64,
}

impl ResourceController {
    pub fn new(client: StatsClient, descriptor: &'static ResourceDescriptor) -> Self {
        let per_page = client.config().default_per_page;
        Self {
            client,
            descriptor,
            state: ResourceState::new(descriptor, per_page),
            epoch: 0,
        }
    }

    pub fn incomes(client: StatsClient) -> Self {
        Self::new(client, ResourceKind::Incomes.descriptor())
    }

    pub fn orders(client: StatsClient) -> Self {
        Self::new(client, ResourceKind::Orders.descriptor())
    }

    pub fn sales(client: StatsClient) -> Self {
        Self::new(client, ResourceKind::Sales.descriptor())
    }

    pub fn stocks(client: StatsClient) -> Self {
        Self::new(client, ResourceKind::Stocks.descriptor())
    }

    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        &self.state.records
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.state.pagination
    }

    pub fn dates(&self) -> &DateFilter {
        &self.state.dates
    }

    pub fn column_filters(&self) -> &ColumnFilters {
        &self.state.filters
    }

    pub fn unique_values(&self) -> &UniqueValueIndex {
        &self.state.unique_values
    }

    /// Records of the current page that pass every active column filter,
    /// recomputed from live state on each call.
    pub fn filtered_records(&self) -> Vec<&Record> {
        if self.state.records.is_empty() {
            return Vec::new();
        }
        self.state
            .records
            .iter()
            .filter(|record| self.state.filters.matches(self.descriptor, record))
            .collect()
    }

    pub fn set_date_from(&mut self, date: impl Into<String>) {
        self.state.dates.date_from = date.into();
    }

    /// Sets the end of the date window. Single-day resources have none;
    /// for those this warns and returns false.
    pub fn set_date_to(&mut self, date: impl Into<String>) -> bool {
        match self.descriptor.date_mode {
            DateMode::Range => {
                self.state.dates.date_to = Some(date.into());
                true
            }
            DateMode::SingleDay => {
                tracing::warn!(
                    resource = self.descriptor.kind.as_str(),
                    "resource has no dateTo filter"
                );
                false
            }
        }
    }

    /// Sets one column's filter text; unknown columns are rejected.
    /// The filtered view updates immediately, no refetch involved.
    pub fn set_column_filter(&mut self, column: &str, value: impl Into<String>) -> bool {
        self.state.filters.set(column, value)
    }

    pub fn reset_column_filters(&mut self) {
        self.state.filters.clear();
    }

    /// Rolling default window measured from the wall clock: the last 30 days
    /// for range resources, today alone for single-day ones.
    pub fn set_default_dates(&mut self) {
        self.state.dates = DateFilter::rolling_default(self.descriptor.date_mode, today_utc());
    }

    /// First half of a fetch: marks the resource loading, clears the last
    /// error, moves `current_page`, and snapshots the request parameters.
    pub fn begin_fetch(&mut self, page: u32) -> (FetchTicket, PageRequest) {
        self.epoch += 1;
        self.state.is_loading = true;
        self.state.error = None;
        self.state.pagination.current_page = page;

        let ticket = FetchTicket {
            epoch: self.epoch,
            page,
        };
        let request = PageRequest {
            resource: self.descriptor.kind,
            path: self.descriptor.path,
            date_from: self.state.dates.date_from.clone(),
            date_to: self.state.dates.date_to.clone(),
            page,
            limit: self.state.pagination.per_page,
        };
        (ticket, request)
    }

    /// Second half of a fetch. Returns false, changing nothing, when the
    /// ticket was superseded by a newer `begin_fetch`; the newer request owns
    /// the loading flag and the error slot.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<PageResult, FetchError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                resource = self.descriptor.kind.as_str(),
                page = ticket.page,
                "discarding stale page response"
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                self.state.unique_values.update(page.items.as_deref());
                self.state.records = page.items.unwrap_or_default();
                self.state.pagination.total_pages = page.total_pages;
                self.state.pagination.total_items = page.total_items;
                tracing::info!(
                    resource = self.descriptor.kind.as_str(),
                    page = ticket.page,
                    loaded = self.state.records.len(),
                    total_items = self.state.pagination.total_items,
                    total_pages = self.state.pagination.total_pages,
                    "resource page loaded"
                );
            }
            Err(err) => {
                tracing::error!(
                    resource = self.descriptor.kind.as_str(),
                    page = ticket.page,
                    error = %err,
                    "resource fetch failed"
                );
                self.state.error = Some(err.to_string());
            }
        }

        self.state.is_loading = false;
        true
    }

    /// Loads `page` unconditionally, absorbing any failure into the error
    /// slot. Previously loaded records survive a failed fetch.
    pub async fn fetch(&mut self, page: u32) {
        let (ticket, request) = self.begin_fetch(page);
        let outcome = self.client.fetch_page(&request).await;
        self.complete_fetch(ticket, outcome);
    }

    /// Loads the requested page when it lies within `1..=total_pages`; any
    /// other value leaves all state untouched.
    pub async fn change_page(&mut self, page: u32) {
        if page >= 1 && page <= self.state.pagination.total_pages {
            self.fetch(page).await;
        }
    }

    /// Applies a new page size (clamped to at least 1) and reloads from
    /// page 1.
    pub async fn change_per_page(&mut self, per_page: u32) {
        self.state.pagination.per_page = per_page.max(1);
        self.state.pagination.current_page = 1;
        self.fetch(1).await;
    }

    /// Back to the default view: rolling date window, cleared column
    /// filters, and a fresh load of page 1.
    pub async fn reset_to_default(&mut self) {
        self.set_default_dates();
        self.state.filters.clear();
        self.fetch(1).await;
    }
}
