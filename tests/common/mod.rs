//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Usage
//!
//! ```no_run
//! mod common;
//! use common::{DataTree, ARTIST_1_ID};
//!
//! #[test]
//! fn test_loads_artist() {
//!     let tree = DataTree::new();
//!     tree.write_song("A/A/A/TRAAA1.json", &common::song_record_1());
//!     let report = tree.run();
//!     assert_eq!(tree.count("artists"), 1);
//! }
//! ```

mod constants;
mod fixtures;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::*;
