pub mod console;
pub mod dashboard;
pub mod junit;
