pub mod album;
pub mod batch;
pub mod error;
pub mod format;
pub mod gain;
pub mod logging;
pub mod models;
pub mod report;
pub mod tags;
