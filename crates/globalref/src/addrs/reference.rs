use super::{AddrError, InstanceKey, ModuleCall, Referenceable, Resource};
use hcl::eval::Evaluate;
use hcl::{Expression, Traversal, TraversalOperator};
use serde::ser::SerializeMap;
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::path::PathBuf;

/// One step of an attribute-path remainder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraversalStep {
    /// `.name`
    Attr(String),
    /// `[0]` or `["key"]`
    Index(InstanceKey),
}

impl TraversalStep {
    /// Name this step selects when applied to an object or a block body
    ///
    /// `.name` and `["name"]` are equivalent in that position.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            TraversalStep::Attr(name) => Some(name),
            TraversalStep::Index(key) => key.as_str(),
        }
    }
}

impl Display for TraversalStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TraversalStep::Attr(name) => write!(f, ".{name}"),
            TraversalStep::Index(key) => write!(f, "{key}"),
        }
    }
}

/// Where in the configuration source a reference was found
///
/// `span` is the byte range of the expression containing the reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct SourceRange {
    pub filename: Option<PathBuf>,
    pub span: Range<usize>,
}

impl Display for SourceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(filename) = &self.filename {
            write!(f, "{}:", filename.display())?;
        }
        write!(f, "{}..{}", self.span.start, self.span.end)
    }
}

/// A single dependency edge: what is referenced, which part of it, and where the reference was written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub subject: Referenceable,
    pub remaining: Vec<TraversalStep>,
    pub source_range: Option<SourceRange>,
}

impl Reference {
    pub fn new(subject: Referenceable) -> Self {
        Self {
            subject,
            remaining: vec![],
            source_range: None,
        }
    }

    pub fn with_remaining(mut self, remaining: Vec<TraversalStep>) -> Self {
        self.remaining = remaining;
        self
    }

    pub fn with_source_range(mut self, source_range: Option<SourceRange>) -> Self {
        self.source_range = source_range;
        self
    }

    /// Build a reference from a traversal found in an expression
    ///
    /// The remainder stops at the first step that is not a constant (splat operators, index expressions that
    /// depend on other values). Use [super::parse_ref] when the whole traversal must be static.
    pub fn from_traversal(traversal: &Traversal) -> Result<Self, AddrError> {
        parse_traversal(traversal).map(|(reference, _complete)| reference)
    }

    /// Subject followed by the remainder, e.g. `test_thing.single.string`
    pub fn display_string(&self) -> String {
        let mut out = self.subject.to_string();
        for step in &self.remaining {
            out.push_str(&step.to_string());
        }
        out
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl serde::ser::Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_map(Some(2))?;
        ser.serialize_entry("reference", &self.display_string())?;
        ser.serialize_entry(
            "range",
            &self.source_range.as_ref().map(ToString::to_string),
        )?;
        ser.end()
    }
}

/// Parse a traversal into a reference
///
/// The flag is `false` if the remainder was cut short by a non-constant step.
pub(crate) fn parse_traversal(traversal: &Traversal) -> Result<(Reference, bool), AddrError> {
    let Expression::Variable(root) = &traversal.expr else {
        return Err(AddrError::NotATraversal);
    };

    let (subject, rest) = parse_subject(root.as_str(), &traversal.operators)?;

    let mut remaining = Vec::with_capacity(rest.len());
    for operator in rest {
        match operator {
            TraversalOperator::GetAttr(ident) => {
                remaining.push(TraversalStep::Attr(ident.as_str().to_string()))
            }
            other => match index_key(other) {
                Some(key) => remaining.push(TraversalStep::Index(key)),
                None => {
                    tracing::trace!(%subject, "remainder stops at non-constant step");
                    return Ok((Reference::new(subject).with_remaining(remaining), false));
                }
            },
        }
    }

    Ok((Reference::new(subject).with_remaining(remaining), true))
}

fn parse_subject<'t>(
    root: &str,
    operators: &'t [TraversalOperator],
) -> Result<(Referenceable, &'t [TraversalOperator]), AddrError> {
    let (resource, rest) = match root {
        "count" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::CountAttr { name }, rest));
        }
        "each" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::ForEachAttr { name }, rest));
        }
        "local" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::LocalValue { name }, rest));
        }
        "var" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::InputVariable { name }, rest));
        }
        "path" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::PathAttr { name }, rest));
        }
        "terraform" => {
            let (name, rest) = attr_name(root, operators)?;
            return Ok((Referenceable::TerraformAttr { name }, rest));
        }
        "self" => return Ok((Referenceable::SelfRef, operators)),
        "module" => return parse_module_call(operators),
        "template" | "lazy" | "arg" => {
            return Err(AddrError::Reserved {
                root: root.to_string(),
            })
        }
        "data" => {
            let (type_name, rest) = attr_name(root, operators)?;
            let (name, rest) = attr_name(&format!("data.{type_name}"), rest)?;
            (Resource::data(type_name, name), rest)
        }
        type_name => {
            let (name, rest) = attr_name(type_name, operators)?;
            (Resource::managed(type_name, name), rest)
        }
    };

    match rest.split_first() {
        Some((operator, after)) => match index_key(operator) {
            Some(key) => Ok((
                Referenceable::ResourceInstance(resource.instance(Some(key))),
                after,
            )),
            None => Ok((Referenceable::Resource(resource), rest)),
        },
        None => Ok((Referenceable::Resource(resource), rest)),
    }
}

fn parse_module_call(
    operators: &[TraversalOperator],
) -> Result<(Referenceable, &[TraversalOperator]), AddrError> {
    let (name, rest) = attr_name("module", operators)?;
    let call = ModuleCall::new(name);

    let Some((operator, after)) = rest.split_first() else {
        return Ok((Referenceable::ModuleCall(call), rest));
    };

    if let TraversalOperator::GetAttr(output) = operator {
        let output = call.instance(None).output(output.as_str());
        return Ok((Referenceable::ModuleCallInstanceOutput(output), after));
    }

    let Some(key) = index_key(operator) else {
        return Ok((Referenceable::ModuleCall(call), rest));
    };

    let instance = call.instance(Some(key));
    match after.split_first() {
        Some((TraversalOperator::GetAttr(output), after)) => Ok((
            Referenceable::ModuleCallInstanceOutput(instance.output(output.as_str())),
            after,
        )),
        _ => Ok((Referenceable::ModuleCallInstance(instance), after)),
    }
}

/// Take the attribute name following `object`
fn attr_name<'t>(
    object: &str,
    operators: &'t [TraversalOperator],
) -> Result<(String, &'t [TraversalOperator]), AddrError> {
    match operators.split_first() {
        Some((TraversalOperator::GetAttr(ident), rest)) => Ok((ident.as_str().to_string(), rest)),
        _ => Err(AddrError::AttributeRequired {
            object: object.to_string(),
        }),
    }
}

/// Constant key of an index operator, `None` for anything else
pub(crate) fn index_key(operator: &TraversalOperator) -> Option<InstanceKey> {
    match operator {
        TraversalOperator::LegacyIndex(index) => i64::try_from(*index).ok().map(InstanceKey::Int),
        TraversalOperator::Index(expr) => static_key(expr),
        _ => None,
    }
}

fn static_key(expr: &Expression) -> Option<InstanceKey> {
    match expr {
        Expression::Number(num) => num.as_i64().map(InstanceKey::Int),
        Expression::String(s) => Some(InstanceKey::String(s.clone())),
        Expression::Variable(_) | Expression::Traversal(_) => None,
        other => {
            // constant folding only, any variable makes this fail
            let value = other.evaluate(&hcl::eval::Context::new()).ok()?;
            InstanceKey::from_value(&value)
        }
    }
}
