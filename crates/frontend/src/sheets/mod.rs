//! The layer between the UI and the remote spreadsheet gateway:
//! sheet-name resolution, the client-side cache, multi-sheet
//! aggregation, statistics rollups and calendar-matrix merging.

pub mod cache;
pub mod category;
pub mod dates;
pub mod loader;
pub mod matrix;
pub mod resolver;
pub mod stats;
