use super::{InstanceKey, Module, ModuleInstance};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceMode {
    /// `resource` blocks
    Managed,
    /// `data` blocks
    Data,
}

/// A resource as declared in a module: `aws_instance.web` or `data.aws_ami.base`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct Resource {
    pub mode: ResourceMode,
    pub type_name: String,
    pub name: String,
}

impl Resource {
    pub fn managed(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceMode::Managed, type_name.into(), name.into())
    }

    pub fn data(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceMode::Data, type_name.into(), name.into())
    }

    pub fn instance(&self, key: Option<InstanceKey>) -> ResourceInstance {
        ResourceInstance::new(self.clone(), key)
    }

    pub fn absolute(&self, module: ModuleInstance) -> AbsResource {
        AbsResource::new(module, self.clone())
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            ResourceMode::Managed => write!(f, "{}.{}", self.type_name, self.name),
            ResourceMode::Data => write!(f, "data.{}.{}", self.type_name, self.name),
        }
    }
}

/// A single instance of a [Resource], `key` is `None` when the resource does not repeat
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ResourceInstance {
    pub resource: Resource,
    pub key: Option<InstanceKey>,
}

impl Display for ResourceInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource)?;
        if let Some(key) = &self.key {
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// A [Resource] inside a concrete module instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct AbsResource {
    pub module: ModuleInstance,
    pub resource: Resource,
}

impl AbsResource {
    pub fn instance(&self, key: Option<InstanceKey>) -> AbsResourceInstance {
        AbsResourceInstance::new(self.module.clone(), self.resource.instance(key))
    }
}

impl Display for AbsResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        display_in_module(f, &self.module, &self.resource)
    }
}

/// Fully qualified resource instance: `module.a[0].aws_instance.web["x"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct AbsResourceInstance {
    pub module: ModuleInstance,
    pub resource: ResourceInstance,
}

impl AbsResourceInstance {
    pub fn containing_resource(&self) -> AbsResource {
        AbsResource::new(self.module.clone(), self.resource.resource.clone())
    }
}

impl Display for AbsResourceInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        display_in_module(f, &self.module, &self.resource)
    }
}

/// A resource declaration inside a (generalized) module
///
/// All instances of a resource, across its own and its modules' repetition, share one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ConfigResource {
    pub module: Module,
    pub resource: Resource,
}

impl Display for ConfigResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.module, self.resource)
        }
    }
}

/// An output value of a concrete module instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct AbsOutputValue {
    pub module: ModuleInstance,
    pub name: String,
}

impl Display for AbsOutputValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        display_in_module(f, &self.module, &format_args!("output.{}", self.name))
    }
}

fn display_in_module(
    f: &mut Formatter<'_>,
    module: &ModuleInstance,
    item: &dyn Display,
) -> std::fmt::Result {
    if module.is_root() {
        write!(f, "{item}")
    } else {
        write!(f, "{module}.{item}")
    }
}
