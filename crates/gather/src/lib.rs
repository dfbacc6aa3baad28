//! Multi-query collection on top of the shell invoker.
//!
//! * [`aggregate`] fans one query out per scope, runs a side query for
//!   annotations alongside, and merges everything back in scope order.
//!   Failing scopes are dropped, not fatal.
//! * [`expand`] walks a tree one child listing at a time. Any failing
//!   listing is fatal.

mod aggregate;
mod hierarchy;

pub use aggregate::{aggregate, apply_annotations, Annotate};
pub use hierarchy::{children_of, expand, ChildSource, TreeNode};
