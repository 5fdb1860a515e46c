//! Shared sink for UI test results.
//!
//! Test code records one [`model::record::ResultRecord`] per test into a
//! named suite of a [`store::ResultsStore`], which persists the whole
//! document to JSON after every result. [`report::dashboard`] turns that
//! document into a self-contained HTML dashboard.

pub mod cli;
pub mod error;
pub mod model;
pub mod report;
pub mod session;
pub mod store;
pub mod telemetry;

pub use error::{Result, ResultsError};
pub use model::document::ResultsDocument;
pub use model::record::{ResultRecord, TestStatus};
pub use store::{ResultsStore, StoreConfig};
