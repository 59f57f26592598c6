//! addressing model
//!
//! Module instances ([ModuleInstance]) carry instance keys and identify one concrete instantiation.
//! Generalized modules ([Module]) do not, they identify the declaration that all instances share.
//! Keep those apart: configuration lookup always happens on the generalized form.
mod instance_key;
mod module_instance;
mod parse;
mod reference;
mod referenceable;
mod resource;

pub use instance_key::InstanceKey;
pub use module_instance::{Module, ModuleInstance, ModuleInstanceStep};
pub use parse::{parse_module_instance, parse_ref, AddrError};
pub use reference::{Reference, SourceRange, TraversalStep};
pub use referenceable::{
    LocalProviderConfig, ModuleCall, ModuleCallInstance, ModuleCallInstanceOutput, Referenceable,
};
pub use resource::{
    AbsOutputValue, AbsResource, AbsResourceInstance, ConfigResource, Resource, ResourceInstance,
    ResourceMode,
};
