//! Output files.
//!
//! # Submodules
//!
//! - [`dataset`]: per-source and combined CSV datasets
//! - [`summary`]: record counts by source and category, logged and written as JSON
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── raw/
//! │   ├── cnnturk_news_dataset.csv
//! │   ├── ntv_news_dataset.csv
//! │   └── haberturk_news_dataset.csv
//! └── processed/
//!     ├── all_news_dataset.csv
//!     └── collection_summary.json
//! ```

pub mod dataset;
pub mod summary;
