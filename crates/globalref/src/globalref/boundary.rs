//! Which module instance answers a query, and which declaration in it
//!
//! Pure address arithmetic: nothing here looks at configuration.
use super::Generalize;
use crate::addrs::{LocalProviderConfig, ModuleInstance, Referenceable, Resource};

/// The declaration whose syntax holds the references of a subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `locals { NAME = ... }`
    Local(String),
    /// a `resource` or `data` block, regardless of instance key
    Resource(Resource),
    /// value of `output "NAME"`
    Output(String),
    /// argument `variable` of the `module "call"` block
    ModuleArgument { call: String, variable: String },
    /// every output of the module
    AllOutputs,
    Provider(LocalProviderConfig),
    /// nothing inside the configuration
    None,
}

/// Target of a query: module instance the results are relative to and where to find them
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct Resolution {
    pub module: ModuleInstance,
    pub declaration: Declaration,
}

/// Resolve a subject referenced from inside `module_instance`
pub fn resolve(module_instance: &ModuleInstance, subject: &Referenceable) -> Resolution {
    let same = |declaration| Resolution::new(module_instance.clone(), declaration);

    match subject {
        Referenceable::LocalValue { name } => same(Declaration::Local(name.clone())),
        Referenceable::Resource(resource) => same(Declaration::Resource(resource.clone())),
        Referenceable::ResourceInstance(instance) => {
            same(Declaration::Resource(instance.generalize()))
        }
        Referenceable::OutputValue { name } => same(Declaration::Output(name.clone())),
        Referenceable::ProviderConfig(config) => same(Declaration::Provider(config.clone())),
        Referenceable::InputVariable { name } => match module_instance.call() {
            // arguments are written in the calling module
            Some((parent, step)) => Resolution::new(
                parent,
                Declaration::ModuleArgument {
                    call: step.name,
                    variable: name.clone(),
                },
            ),
            // root variables are set from outside the configuration
            None => same(Declaration::None),
        },
        Referenceable::ModuleCallInstanceOutput(output) => Resolution::new(
            module_instance.child(&output.call.call.name, output.call.key.clone()),
            Declaration::Output(output.name.clone()),
        ),
        Referenceable::ModuleCallInstance(instance) => Resolution::new(
            module_instance.child(&instance.call.name, instance.key.clone()),
            Declaration::AllOutputs,
        ),
        Referenceable::ModuleCall(call) => Resolution::new(
            module_instance.child(&call.name, None),
            Declaration::AllOutputs,
        ),
        Referenceable::PathAttr { .. }
        | Referenceable::TerraformAttr { .. }
        | Referenceable::CountAttr { .. }
        | Referenceable::ForEachAttr { .. }
        | Referenceable::SelfRef => same(Declaration::None),
    }
}
