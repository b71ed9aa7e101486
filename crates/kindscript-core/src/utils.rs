//! Utility functions shared by the binder and contract plugins.

pub mod builtins;
pub mod graph;
pub mod paths;

#[doc(inline)]
pub use builtins::is_node_builtin;
#[doc(inline)]
pub use graph::find_cycles;
#[doc(inline)]
pub use paths::{is_file_in_symbol, is_proper_scope_prefix, join_path, relative_path};
