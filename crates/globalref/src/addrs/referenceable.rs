use super::{InstanceKey, Resource, ResourceInstance};
use std::fmt::{Display, Formatter};

/// A `module "name" {}` block as seen from the calling module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ModuleCall {
    pub name: String,
}

impl ModuleCall {
    pub fn instance(&self, key: Option<InstanceKey>) -> ModuleCallInstance {
        ModuleCallInstance::new(self.clone(), key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ModuleCallInstance {
    pub call: ModuleCall,
    pub key: Option<InstanceKey>,
}

impl ModuleCallInstance {
    pub fn output(&self, name: impl Into<String>) -> ModuleCallInstanceOutput {
        ModuleCallInstanceOutput::new(self.clone(), name.into())
    }
}

/// An output value read from a module call: `module.name[key].output`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ModuleCallInstanceOutput {
    pub call: ModuleCallInstance,
    pub name: String,
}

/// A provider configuration within a module, identified by local name and alias
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct LocalProviderConfig {
    pub local_name: String,
    pub alias: Option<String>,
}

/// The subject of a reference: everything an expression can point at
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Referenceable {
    /// `local.NAME`
    LocalValue { name: String },
    /// `var.NAME`
    InputVariable { name: String },
    /// an `output "NAME"` block in the same module
    ///
    /// Not reachable through expression syntax, only constructed by callers.
    OutputValue { name: String },
    /// `TYPE.NAME` or `data.TYPE.NAME`
    Resource(Resource),
    /// `TYPE.NAME[KEY]`
    ResourceInstance(ResourceInstance),
    /// `module.NAME`
    ModuleCall(ModuleCall),
    /// `module.NAME[KEY]`
    ModuleCallInstance(ModuleCallInstance),
    /// `module.NAME.OUTPUT` or `module.NAME[KEY].OUTPUT`
    ModuleCallInstanceOutput(ModuleCallInstanceOutput),
    /// `path.module`, `path.root`, `path.cwd`
    PathAttr { name: String },
    /// `terraform.workspace`
    TerraformAttr { name: String },
    /// `count.index`
    CountAttr { name: String },
    /// `each.key`, `each.value`
    ForEachAttr { name: String },
    /// `self`
    SelfRef,
    /// a `provider "NAME" {}` block
    ///
    /// Not reachable through expression syntax, only constructed by callers.
    ProviderConfig(LocalProviderConfig),
}

impl Referenceable {
    pub fn local(name: impl Into<String>) -> Self {
        Self::LocalValue { name: name.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::InputVariable { name: name.into() }
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self::OutputValue { name: name.into() }
    }

    /// The resource this subject points into, if any
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Referenceable::Resource(resource) => Some(resource),
            Referenceable::ResourceInstance(instance) => Some(&instance.resource),
            _ => None,
        }
    }
}

impl Display for Referenceable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Referenceable::LocalValue { name } => write!(f, "local.{name}"),
            Referenceable::InputVariable { name } => write!(f, "var.{name}"),
            Referenceable::OutputValue { name } => write!(f, "output.{name}"),
            Referenceable::Resource(resource) => write!(f, "{resource}"),
            Referenceable::ResourceInstance(instance) => write!(f, "{instance}"),
            Referenceable::ModuleCall(call) => write!(f, "module.{}", call.name),
            Referenceable::ModuleCallInstance(instance) => write!(f, "{instance}"),
            Referenceable::ModuleCallInstanceOutput(output) => {
                write!(f, "{}.{}", output.call, output.name)
            }
            Referenceable::PathAttr { name } => write!(f, "path.{name}"),
            Referenceable::TerraformAttr { name } => write!(f, "terraform.{name}"),
            Referenceable::CountAttr { name } => write!(f, "count.{name}"),
            Referenceable::ForEachAttr { name } => write!(f, "each.{name}"),
            Referenceable::SelfRef => f.write_str("self"),
            Referenceable::ProviderConfig(config) => match &config.alias {
                Some(alias) => write!(f, "provider.{}.{alias}", config.local_name),
                None => write!(f, "provider.{}", config.local_name),
            },
        }
    }
}

impl Display for ModuleCallInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "module.{}", self.call.name)?;
        if let Some(key) = &self.key {
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
