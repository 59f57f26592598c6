use super::{AbsReference, ConfigReference};
use crate::addrs::{
    AbsResource, AbsResourceInstance, ConfigResource, Module, ModuleCall, ModuleCallInstance,
    ModuleCallInstanceOutput, ModuleInstance, Reference, Referenceable, Resource,
    ResourceInstance,
};

/// Strip instance keys, leaving the address of the static declaration
///
/// There is no way back: a generalized address stands for all of its instances.
pub trait Generalize {
    type Output;

    fn generalize(&self) -> Self::Output;
}

impl Generalize for ModuleInstance {
    type Output = Module;

    fn generalize(&self) -> Module {
        Module::from_names(self.steps().iter().map(|step| step.name.clone()).collect())
    }
}

impl Generalize for ResourceInstance {
    type Output = Resource;

    fn generalize(&self) -> Resource {
        self.resource.clone()
    }
}

impl Generalize for AbsResource {
    type Output = ConfigResource;

    fn generalize(&self) -> ConfigResource {
        ConfigResource::new(self.module.generalize(), self.resource.clone())
    }
}

impl Generalize for AbsResourceInstance {
    type Output = ConfigResource;

    fn generalize(&self) -> ConfigResource {
        ConfigResource::new(self.module.generalize(), self.resource.generalize())
    }
}

impl Generalize for ModuleCallInstance {
    type Output = ModuleCall;

    fn generalize(&self) -> ModuleCall {
        self.call.clone()
    }
}

impl Generalize for ModuleCallInstanceOutput {
    type Output = ModuleCallInstanceOutput;

    fn generalize(&self) -> ModuleCallInstanceOutput {
        self.call.generalize().instance(None).output(&self.name)
    }
}

impl Generalize for Referenceable {
    type Output = Referenceable;

    fn generalize(&self) -> Referenceable {
        match self {
            Referenceable::ResourceInstance(instance) => {
                Referenceable::Resource(instance.generalize())
            }
            Referenceable::ModuleCallInstance(instance) => {
                Referenceable::ModuleCall(instance.generalize())
            }
            Referenceable::ModuleCallInstanceOutput(output) => {
                Referenceable::ModuleCallInstanceOutput(output.generalize())
            }
            other => other.clone(),
        }
    }
}

impl Generalize for Reference {
    type Output = Reference;

    fn generalize(&self) -> Reference {
        Reference {
            subject: self.subject.generalize(),
            remaining: self.remaining.clone(),
            source_range: self.source_range.clone(),
        }
    }
}

impl Generalize for AbsReference {
    type Output = ConfigReference;

    fn generalize(&self) -> ConfigReference {
        ConfigReference::new(self.module.generalize(), self.reference.generalize())
    }
}
