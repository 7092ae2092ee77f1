//! Data layer for a seller statistics dashboard.
//!
//! The statistics API exposes four paginated resources (incomes, orders,
//! sales, and stocks). All four share one [`ResourceController`]: a
//! [`ResourceDescriptor`] tells it where the resource lives and which
//! columns are filterable, and the controller handles fetching, pagination,
//! date windows, per-column filters, and the unique-value sets behind the
//! filter dropdowns.
//!
//! ```no_run
//! use statboard_data::{ApiConfig, FetchResult, ResourceController, StatsClient};
//!
//! async fn show_sales() -> FetchResult<()> {
//!     let client = StatsClient::new(ApiConfig::from_env())?;
//!     let mut sales = ResourceController::sales(client);
//!     sales.reset_to_default().await;
//!
//!     for record in sales.filtered_records() {
//!         println!("{:?}", record.get_str("supplier_article"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod filter;
pub mod fixtures;
pub mod models;
pub mod resource;
pub mod state;

pub use api::{FetchError, FetchResult, PageRequest, StatsClient};
pub use config::ApiConfig;
pub use controller::{FetchTicket, ResourceController};
pub use filter::{ColumnFilters, UniqueValueIndex};
pub use models::{PageResult, Record};
pub use resource::{
    ColumnKind, ColumnSpec, DateMode, ResourceDescriptor, ResourceKind, INCOMES, ORDERS, SALES,
    STOCKS,
};
pub use state::{DateFilter, PaginationState, ResourceState};
