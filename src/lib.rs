pub mod aggregate;
pub mod analyze;
pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod matcher;
pub mod model;
pub mod report;
pub mod scan;
pub mod util;
