use super::reference::{index_key, parse_traversal};
use super::{ModuleInstance, ModuleInstanceStep, Reference};
use hcl::{Expression, Traversal, TraversalOperator};

#[derive(thiserror::Error, Debug)]
pub enum AddrError {
    #[error("Unable to parse address")]
    Syntax(#[from] hcl_edit::parser::Error),
    #[error("Address must start with a name")]
    NotATraversal,
    #[error("\"{root}\" is reserved and cannot be referenced")]
    Reserved { root: String },
    #[error("\"{object}\" must be followed by an attribute name")]
    AttributeRequired { object: String },
    #[error("Address contains a step that is not a constant after {prefix}")]
    DynamicStep { prefix: String },
    #[error("Invalid module instance address: {0}")]
    InvalidModuleInstance(String),
}

/// Parse reference text such as `module.app["eu"].endpoint` or `aws_instance.web[0].id`
///
/// Every step must be constant.
pub fn parse_ref(text: &str) -> Result<Reference, AddrError> {
    let traversal = parse_traversal_str(text)?;
    let (reference, complete) = parse_traversal(&traversal)?;
    if !complete {
        return Err(AddrError::DynamicStep {
            prefix: reference.display_string(),
        });
    }
    Ok(reference)
}

/// Parse a module instance such as `module.a.module.b[0]`; the empty string is the root module instance
pub fn parse_module_instance(text: &str) -> Result<ModuleInstance, AddrError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ModuleInstance::root());
    }

    let invalid = || AddrError::InvalidModuleInstance(text.to_string());
    let traversal = parse_traversal_str(text)?;

    let Expression::Variable(root) = &traversal.expr else {
        return Err(invalid());
    };
    if root.as_str() != "module" {
        return Err(invalid());
    }

    let mut steps = vec![];
    let mut operators = traversal.operators.iter().peekable();
    loop {
        let Some(TraversalOperator::GetAttr(name)) = operators.next() else {
            return Err(invalid());
        };

        let key = match operators.peek() {
            Some(TraversalOperator::GetAttr(_)) | None => None,
            Some(operator) => Some(index_key(operator).ok_or_else(invalid)?),
        };
        if key.is_some() {
            operators.next();
        }
        steps.push(ModuleInstanceStep::new(name.as_str().to_string(), key));

        match operators.next() {
            None => break,
            Some(TraversalOperator::GetAttr(ident)) if ident.as_str() == "module" => continue,
            Some(_) => return Err(invalid()),
        }
    }

    Ok(ModuleInstance::from_steps(steps))
}

fn parse_traversal_str(text: &str) -> Result<Traversal, AddrError> {
    let expr: hcl_edit::expr::Expression = text.trim().parse()?;
    match Expression::from(expr) {
        Expression::Traversal(traversal) => Ok(*traversal),
        Expression::Variable(variable) => Ok(Traversal::new(
            Expression::Variable(variable),
            Vec::<TraversalOperator>::new(),
        )),
        _ => Err(AddrError::NotATraversal),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::addrs::{InstanceKey, ModuleCall, Referenceable, Resource, TraversalStep};
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_subjects() {
        let cases = [
            ("local.a", Referenceable::local("a")),
            ("var.a", Referenceable::variable("a")),
            (
                "path.module",
                Referenceable::PathAttr {
                    name: "module".into(),
                },
            ),
            (
                "terraform.workspace",
                Referenceable::TerraformAttr {
                    name: "workspace".into(),
                },
            ),
            (
                "count.index",
                Referenceable::CountAttr {
                    name: "index".into(),
                },
            ),
            (
                "each.value",
                Referenceable::ForEachAttr {
                    name: "value".into(),
                },
            ),
            ("self", Referenceable::SelfRef),
            (
                "test_thing.single",
                Referenceable::Resource(Resource::managed("test_thing", "single")),
            ),
            (
                "data.test_thing.lookup[1]",
                Referenceable::ResourceInstance(
                    Resource::data("test_thing", "lookup").instance(Some(InstanceKey::Int(1))),
                ),
            ),
            (
                "module.child",
                Referenceable::ModuleCall(ModuleCall::new("child".into())),
            ),
            (
                r#"module.child["k"]"#,
                Referenceable::ModuleCallInstance(
                    ModuleCall::new("child".into()).instance(Some("k".into())),
                ),
            ),
            (
                "module.child.out",
                Referenceable::ModuleCallInstanceOutput(
                    ModuleCall::new("child".into()).instance(None).output("out"),
                ),
            ),
        ];

        for (text, subject) in cases {
            let reference = parse_ref(text).unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_eq!(reference.subject, subject, "{text}");
            assert!(reference.remaining.is_empty(), "{text}");
            assert_eq!(reference.display_string(), text);
        }
    }

    #[test]
    fn parse_remaining() {
        let reference = parse_ref(r#"test_thing.for_each["whatever"].single.z"#).unwrap();
        assert_eq!(
            reference.subject,
            Referenceable::ResourceInstance(
                Resource::managed("test_thing", "for_each").instance(Some("whatever".into()))
            )
        );
        assert_eq!(
            reference.remaining,
            vec![
                TraversalStep::Attr("single".into()),
                TraversalStep::Attr("z".into())
            ]
        );

        let reference = parse_ref("module.count[0].a.b[2]").unwrap();
        assert_eq!(reference.display_string(), "module.count[0].a.b[2]");
        assert_eq!(reference.remaining.len(), 2);
    }

    #[test]
    fn folds_constant_index() {
        let reference = parse_ref("aws_instance.web[1 + 1]").unwrap();
        assert_eq!(reference.display_string(), "aws_instance.web[2]");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_ref("local"),
            Err(AddrError::AttributeRequired { .. })
        ));
        assert!(matches!(
            parse_ref("test_thing"),
            Err(AddrError::AttributeRequired { .. })
        ));
        assert!(matches!(
            parse_ref("template.x"),
            Err(AddrError::Reserved { .. })
        ));
        assert!(matches!(
            parse_ref("test_thing.x[var.k]"),
            Err(AddrError::DynamicStep { .. })
        ));
        assert!(matches!(parse_ref("\"str\""), Err(AddrError::NotATraversal)));
        assert!(matches!(parse_ref("local.a["), Err(AddrError::Syntax(_))));
    }

    #[test]
    fn parse_module_instances() {
        assert_eq!(parse_module_instance("").unwrap(), ModuleInstance::root());

        let instance = parse_module_instance(r#"module.a["x"].module.b.module.c[2]"#).unwrap();
        assert_eq!(
            instance,
            ModuleInstance::root()
                .child("a", Some("x".into()))
                .child("b", None)
                .child("c", Some(InstanceKey::Int(2)))
        );
        assert_eq!(instance.to_string(), r#"module.a["x"].module.b.module.c[2]"#);

        for invalid in ["module", "local.a", "module.a.b", "module.a[var.x]"] {
            assert!(
                matches!(
                    parse_module_instance(invalid),
                    Err(AddrError::InvalidModuleInstance(_))
                ),
                "{invalid}"
            );
        }
    }
}
