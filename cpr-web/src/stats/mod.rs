//! Stats module - per-compression depth and rate accumulation

mod window;
mod statistics;

pub use window::RateWindow;
pub use statistics::CompressionStatistics;
