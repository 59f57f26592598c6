use super::InstanceKey;
use std::fmt::{Display, Formatter};

/// One step of a [ModuleInstance]: the name of a module call and the instance key, if the call repeats
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct ModuleInstanceStep {
    pub name: String,
    pub key: Option<InstanceKey>,
}

/// A concrete module instance, e.g. `module.network["eu"].module.subnet[0]`
///
/// The root module instance has no steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleInstance {
    steps: Vec<ModuleInstanceStep>,
}

impl ModuleInstance {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<ModuleInstanceStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ModuleInstanceStep] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Instance of the module call `name` declared inside this module instance
    pub fn child(&self, name: impl Into<String>, key: Option<InstanceKey>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(ModuleInstanceStep::new(name.into(), key));
        Self { steps }
    }

    /// The calling module instance, `None` for root
    pub fn parent(&self) -> Option<Self> {
        self.call().map(|(parent, _)| parent)
    }

    /// Split into the calling module instance and the call that created this instance
    ///
    /// Returns `None` for root, which was not created by any call.
    pub fn call(&self) -> Option<(Self, ModuleInstanceStep)> {
        let (last, rest) = self.steps.split_last()?;
        Some((Self::from_steps(rest.to_vec()), last.clone()))
    }

    /// Module instance made of the first `len` steps
    pub fn prefix(&self, len: usize) -> Self {
        Self::from_steps(self.steps[..len.min(self.steps.len())].to_vec())
    }
}

impl Display for ModuleInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "module.{}", step.name)?;
            if let Some(key) = &step.key {
                write!(f, "{key}")?;
            }
        }
        Ok(())
    }
}

impl serde::ser::Serialize for ModuleInstance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A module as declared, without instance keys: `module.network.module.subnet`
///
/// Static configuration is keyed on this. Obtain it from a [ModuleInstance] via
/// [crate::globalref::Generalize].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Module {
    names: Vec<String>,
}

impl Module {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_root(&self) -> bool {
        self.names.is_empty()
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut names = self.names.clone();
        names.push(name.into());
        Self { names }
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, name) in self.names.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "module.{name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested() -> ModuleInstance {
        ModuleInstance::root()
            .child("network", Some(InstanceKey::from("eu")))
            .child("subnet", Some(InstanceKey::Int(0)))
    }

    #[test]
    fn display() {
        assert_eq!(ModuleInstance::root().to_string(), "");
        assert_eq!(
            nested().to_string(),
            r#"module.network["eu"].module.subnet[0]"#
        );
        assert_eq!(
            Module::root().child("a").child("b").to_string(),
            "module.a.module.b"
        );
    }

    #[test]
    fn call_and_parent() {
        let (parent, step) = nested().call().expect("not root");
        assert_eq!(parent.to_string(), r#"module.network["eu"]"#);
        assert_eq!(step, ModuleInstanceStep::new("subnet".into(), Some(InstanceKey::Int(0))));
        assert_eq!(parent.parent(), Some(ModuleInstance::root()));
        assert_eq!(ModuleInstance::root().call(), None);
    }

    #[test]
    fn equality_includes_keys() {
        let a = ModuleInstance::root().child("m", Some(InstanceKey::Int(1)));
        let b = ModuleInstance::root().child("m", Some(InstanceKey::Int(2)));
        assert_ne!(a, b);
        assert_eq!(a.prefix(0), b.prefix(0));
    }
}
