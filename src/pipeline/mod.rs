// src/pipeline/mod.rs

//! Pipeline entry points for crawler operations.
//!
//! - `run_crawl`: incremental crawl of one variant followed by stale-row
//!   reaping
//! - `run_swap`: full dataset replacement through a shadow-table swap

pub mod crawl;
pub mod swap;

pub use crawl::{crawl_variant, run_crawl};
pub use swap::run_swap;
