//! Utility class cascade resolution.
//!
//! A taxonomy of utility classes is compiled once into a [`CompiledTable`]:
//! a class-to-group lookup plus the groups each group overrides. A
//! [`Cascader`] built over that table merges class lists so that the last
//! class of each group wins and general classes evict specific ones written
//! before them.
//!
//! ```
//! use std::sync::Arc;
//! use twcascade_core::{Cascader, Group, compile};
//!
//! let tree = Group::new().with_child(
//!     "padding",
//!     Group::new()
//!         .with_leaf("all", ["p-4", "p-8"])
//!         .with_leaf("t", ["pt-4"])
//!         .with_override("all", ["t"]),
//! );
//! let table = compile(&tree.into()).unwrap();
//! let cascader = Cascader::new(Arc::new(table));
//!
//! assert_eq!(cascader.resolve("pt-4 p-8"), "p-8");
//! assert_eq!(cascader.resolve("p-8 pt-4"), "p-8 pt-4");
//! ```

pub mod braces;
pub mod cascade;
pub mod classify;
pub mod classnames;
pub mod compile;
pub mod definition;
pub mod error;
pub mod path;
pub mod table;
pub mod taxonomy;

pub use cascade::{Cascader, merge};
pub use classify::{Classification, Classifier};
pub use classnames::{ClassValue, class_names};
pub use compile::compile;
pub use definition::{DefinitionNode, Group};
pub use error::{BraceError, DefinitionError, TableError, TaxonomyError};
pub use path::GroupPath;
pub use table::CompiledTable;
pub use taxonomy::{BUNDLED_TAXONOMY, compile_taxonomy, parse_taxonomy};
