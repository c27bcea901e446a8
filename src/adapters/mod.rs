// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod report;
pub mod storage;

pub use http::HttpRemoteService;
pub use report::CsvReportSink;
pub use storage::JsonFileRepository;
