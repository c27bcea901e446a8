pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::{CsvReportSink, HttpRemoteService, JsonFileRepository};
pub use crate::config::BatchConfig;
pub use crate::core::processor::{report_name, BatchOutcome, BatchSummary, OrderProcessor};
pub use crate::core::router::{OrderRouter, RoutingRules};
pub use crate::domain::model::{Order, OrderStatus, OrderType, Priority, ResponseStatus, ServiceResponse};
pub use crate::utils::error::{OrderError, Result};
