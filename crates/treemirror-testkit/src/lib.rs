//! # Tree Mirror Testkit
//!
//! Testing utilities for Tree Mirror.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **MemoryTree**: an in-memory local object tree implementing `LocalTree`
//! - **Fixtures**: sealed credentials, configurations, and a small house
//! - **Generators**: proptest strategies for names, paths, and values
//!
//! The in-memory remote lives in `treemirror_rpc::memory`, next to the
//! trait it implements.
//!
//! ## Test Fixtures
//!
//! ```rust
//! use treemirror_core::LocalTree;
//! use treemirror_testkit::fixtures::House;
//!
//! let house = House::new();
//! assert_eq!(house.tree.node(house.temperature).unwrap().name, "Temperature");
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use treemirror_testkit::generators::name_path;
//!
//! proptest! {
//!     #[test]
//!     fn mirror_path_matches(path in name_path(4)) {
//!         // build the path locally, resolve it, compare remotely
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod tree;

pub use fixtures::{mirror_config, sealed_credentials, two_endpoints, House};
pub use tree::{MemoryTree, TREE_ROOT};
