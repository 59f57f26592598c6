//! reference extraction from configuration syntax
//!
//! Structure (bodies, blocks, attributes) and source spans come from [hcl_edit]. Each expression is converted
//! into its [hcl] form and walked for traversals, every traversal rooted at a name that is
//! not locally bound becomes a [crate::addrs::Reference].
mod references;

pub(crate) use references::{dynamic_iterator, is_dynamic, Extractor};
pub use references::{references_in_body, references_in_expr};
