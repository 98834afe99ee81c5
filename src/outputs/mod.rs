//! Output writers for fetched article batches.
//!
//! # Submodules
//!
//! - [`json`]: writes a batch to stdout or to a dated JSON file
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── today.json
//!     ├── week.json
//!     └── all.json
//! ```

pub mod json;
