//! Google Analytics reporting and management client.
//!
//! Authenticates with a service account, builds `reports:batchGet`
//! payloads, follows pagination, flattens reports into a [`Table`], walks
//! the account hierarchy and administers custom data source uploads.
//!
//! ```no_run
//! # async fn run() -> Result<(), google_analytics_utility::GaError> {
//! use google_analytics_utility::{
//!     data_to_table, Config, FetchMode, FetchOptions, ReportFetcher, ServiceFactory,
//! };
//!
//! let config = Config::from_env()?;
//! let factory = ServiceFactory::new(&config)?;
//! let reporting = factory.reporting()?;
//!
//! let fetcher = ReportFetcher::from_dates("2019-09-20", "2019-09-24")?;
//! let payload = fetcher
//!     .payload_builder()
//!     .view_id("123456789")
//!     .dimensions(["ga:date", "ga:source"])
//!     .metrics(["ga:sessions"])
//!     .build()?;
//!
//! let data = fetcher
//!     .get_data(&reporting, &payload, FetchMode::DayByDay, &FetchOptions::new().verbose(true))
//!     .await?;
//! let table = data_to_table(&data)?;
//! println!("{} rows", table.len());
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod http;
pub mod payload;
pub mod report;
pub mod service;
pub mod table;
pub mod uploads;

pub use accounts::{get_account_details, AccountNode, AccountTree, PropertyNode, ViewNode};
pub use api::{ManagementApi, ManagementService, ReportingService, ReportsApi, UploadsApi};
pub use auth::{ServiceAccountCredentials, StaticToken, TokenSource};
pub use config::Config;
pub use dates::{expand_days, DateRange};
pub use error::{ApiError, AuthError, ConfigError, GaError};
pub use fetch::{fetch_all_pages, FetchMode, FetchOptions, ReportFetcher};
pub use payload::{
    DimensionFilter, DimensionOperator, FilterLogicalOperator, MetricFilter, MetricOperator,
    PayloadBuilder, ReportPayload,
};
pub use report::{BatchGetResponse, ReportBatch, ReportPage};
pub use service::ServiceFactory;
pub use table::{data_to_table, Table};
pub use uploads::{AdminFailure, AdminFailureKind, AdminResult, DataSourceAdmin, PollPolicy, UploadReport};
