pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod logging;
pub mod report;

pub use error::RetireError;
