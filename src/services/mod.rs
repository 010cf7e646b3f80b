// src/services/mod.rs

//! Service layer for the crawler application.
//!
//! - Column mapping and row extraction (`mapper`)
//! - Content-hash identity (`hasher`)
//! - Pagination driving (`pager`)

pub mod hasher;
pub mod mapper;
pub mod pager;

pub use hasher::hash_record;
pub use mapper::{ColumnMap, build_column_map, extract_record};
pub use pager::VariantPager;
