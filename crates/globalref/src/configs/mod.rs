//! static configuration: files, declarations and the module tree
mod config;
mod files;
mod module;

pub use config::{Config, DirWalker, MemoryWalker, ModuleRequest, ModuleWalker, MAX_MODULE_DEPTH};
pub use files::{LoadError, ModuleFiles, Source, SourceAttribute, SourceBlock};
pub(crate) use module::find_attribute;
pub use module::{
    ConfigIssues, Issue, Local, Module, ModuleCall, Output, Provider, Resource, Variable,
};
