use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::filter::{ColumnFilters, UniqueValueIndex};
use crate::models::Record;
use crate::resource::{DateMode, ResourceDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub per_page: u32,
}

impl PaginationState {
    pub const DEFAULT_PER_PAGE: u32 = 50;
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// Date window sent with every page request, kept as raw `YYYY-MM-DD` strings
/// the way the date inputs hand them over. `date_to` is `None` for
/// single-day resources and `Some` (possibly empty) for ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub date_from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl DateFilter {
    pub(crate) fn empty(mode: DateMode) -> Self {
        match mode {
            DateMode::Range => Self {
                date_from: String::new(),
                date_to: Some(String::new()),
            },
            DateMode::SingleDay => Self {
                date_from: String::new(),
                date_to: None,
            },
        }
    }

    /// Rolling default window: the last 30 days for ranges, `today` alone for
    /// single-day resources.
    pub(crate) fn rolling_default(mode: DateMode, today: Date) -> Self {
        match mode {
            DateMode::Range => Self {
                date_from: iso_date(today - Duration::days(30)),
                date_to: Some(iso_date(today)),
            },
            DateMode::SingleDay => Self {
                date_from: iso_date(today),
                date_to: None,
            },
        }
    }
}

/// Everything the dashboard reads for one resource. Mutation goes through
/// `ResourceController`; this struct is the snapshot it exposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub records: Vec<Record>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub pagination: PaginationState,
    pub dates: DateFilter,
    pub filters: ColumnFilters,
    pub unique_values: UniqueValueIndex,
}

impl ResourceState {
    pub(crate) fn new(descriptor: &ResourceDescriptor, per_page: u32) -> Self {
        Self {
            records: Vec::new(),
            is_loading: false,
            error: None,
            pagination: PaginationState {
                per_page: per_page.max(1),
                ..PaginationState::default()
            },
            dates: DateFilter::empty(descriptor.date_mode),
            filters: ColumnFilters::for_descriptor(descriptor),
            unique_values: UniqueValueIndex::for_descriptor(descriptor),
        }
    }
}

pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `YYYY-MM-DD`, zero padded, without pulling in the formatting machinery.
pub(crate) fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
