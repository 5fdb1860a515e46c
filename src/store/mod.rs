pub mod config;
pub mod results_store;

pub use config::{DuplicatePolicy, PersistMode, StoreConfig};
pub use results_store::ResultsStore;
