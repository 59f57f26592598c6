use crate::addrs::{Module, ModuleInstance, Reference};
use serde::ser::SerializeMap;
use std::fmt::{Display, Formatter};

/// A [Reference] together with the module instance it is relative to
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct AbsReference {
    pub module: ModuleInstance,
    pub reference: Reference,
}

impl Display for AbsReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.reference)
        } else {
            write!(f, "{}.{}", self.module, self.reference)
        }
    }
}

impl serde::ser::Serialize for AbsReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_map(Some(3))?;
        ser.serialize_entry("module", &self.module)?;
        ser.serialize_entry("reference", &self.reference.display_string())?;
        ser.serialize_entry(
            "range",
            &self.reference.source_range.as_ref().map(ToString::to_string),
        )?;
        ser.end()
    }
}

/// Generalized form of an [AbsReference]: module and subject without instance keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct ConfigReference {
    pub module: Module,
    pub reference: Reference,
}

impl Display for ConfigReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.reference)
        } else {
            write!(f, "{}.{}", self.module, self.reference)
        }
    }
}
