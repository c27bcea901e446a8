pub mod processor;
pub mod router;

pub use crate::domain::model::{Order, OrderStatus, OrderType, Priority, ServiceResponse};
pub use crate::domain::ports::{OrderRepository, RemoteService, ReportSink};
pub use crate::utils::error::Result;
