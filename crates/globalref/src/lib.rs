//! # globalref - references across module boundaries
//!
//! Static dependency discovery for hcl infrastructure configuration made of nested modules.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `globalref` works internally.
//!
//! ### Terms
//!
//! - a *module* is a directory of `.tf` files, it declares `resource`/`data` blocks, `variable`s, `locals`,
//!   `output`s, `provider` configurations and calls other modules via `module` blocks
//! - a *module instance* is one instantiation of a module: a module call with `count` or `for_each` creates
//!   many, each identified by an instance key (`module.app["eu"]`, `module.app[0]`)
//! - a *reference* is a traversal inside an expression that points at something declared: `local.a`,
//!   `var.a`, `test_thing.single.string`, `module.child.output_name`
//!
//! ### Loading
//!
//! Files are parsed with [hcl_edit] (keeping source spans) and collected in [configs::ModuleFiles]. Each
//! collection is decoded into a [configs::Module], collecting every problem in [configs::ConfigIssues] before
//! failing. [configs::Config] then builds the tree of called modules through a [configs::ModuleWalker].
//!
//! There is exactly one [configs::Config] per *declared* module. Instances only exist in addresses.
//!
//! ### Generalization
//!
//! All instances of a module (or resource) share their configuration. Before looking anything up, addresses
//! are stripped of their instance keys with [globalref::Generalize]: `module.app["eu"]` becomes `module.app`,
//! `test_thing.x[0]` becomes `test_thing.x`.
//!
//! ### Crossing module boundaries
//!
//! A reference is always relative to a module instance, but the expression that answers it is not
//! necessarily in the same one:
//!
//! | **subject**         | **answered in**  | **by**                                      |
//! |---------------------|------------------|---------------------------------------------|
//! | `local.a`           | same module      | `locals { a = ... }`                        |
//! | `test_thing.x[0]`   | same module      | body of `resource "test_thing" "x"`         |
//! | `var.a`             | calling module   | argument `a` of the `module` block          |
//! | `module.m[0].out`   | called module    | value of `output "out"`                     |
//! | `module.m`          | called module    | values of all outputs                       |
//! | `count.index`, ...  | nowhere          |                                             |
//!
//! see [globalref::boundary::resolve]
//!
//! ### Narrowing
//!
//! The attribute path after the subject (`test_thing.x.nested.attr`) is followed into the syntax of the
//! declaration: attributes, nested blocks (also `dynamic` ones), object keys and tuple positions. Whatever
//! the path selects is searched for references, when a step matches nothing the deepest match is used.
//!
//! ### Extraction
//!
//! [lang] converts each expression into [hcl::Expression] and walks it for traversals. Names bound by `for`
//! expressions and `dynamic` block iterators are not references.
//!
//! ### Querying
//!
//! [globalref::Analyzer::meta_references] combines the above. Its answers can be followed transitively, see
//! [globalref::Analyzer::contributing_resources].
//!
//! ```
//! use globalref::addrs::{parse_module_instance, parse_ref};
//! use globalref::globalref::Analyzer;
//!
//! let config = globalref::module_tree! {
//!     r#"
//!     module "child" {
//!       source = "./child"
//!       a      = local.value
//!     }
//!     locals {
//!       value = "x"
//!     }
//!     "#,
//!     "./child" => r#"variable "a" {}"#,
//! };
//!
//! let (module, references) = Analyzer::new(&config).meta_references(
//!     &parse_module_instance("module.child").unwrap(),
//!     &parse_ref("var.a").unwrap(),
//! );
//! assert!(module.is_root());
//! assert_eq!(references[0].to_string(), "local.value");
//! ```
pub mod addrs;
pub mod configs;
pub mod globalref;
pub mod lang;
mod visit;
