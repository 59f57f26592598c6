//! global reference analysis
//!
//! Configuration is written once per module but a module can be instantiated many times (`count`,
//! `for_each`, repeated module calls). [Analyzer] answers questions about instances by [Generalize]-ing them
//! to their declaration, looking up the syntax there and returning references relative to the module instance
//! they have to be interpreted in.
mod abs_reference;
mod analyzer;
pub mod boundary;
mod contributing;
mod generalize;
mod narrow;
mod shortcuts;

pub use abs_reference::{AbsReference, ConfigReference};
pub use analyzer::Analyzer;
pub use generalize::Generalize;

#[cfg(test)]
mod test {
    use super::*;
    use crate::addrs::{
        parse_module_instance, parse_ref, AbsOutputValue, AbsResourceInstance, ModuleInstance,
        Reference, Resource,
    };
    use crate::configs::Config;
    use crate::module_tree;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        module_tree! {
            r#"
            variable "root_var" {}

            locals {
              name = "x"
              combined = "${local.name}-${var.root_var}"
            }

            provider "test" {
              region = local.name
            }

            provider "test" {
              alias  = "other"
              region = var.root_var
            }

            resource "test_thing" "counted" {
              count    = length(local.combined)
              provider = test.other
              string   = local.name
              depends_on = [test_thing.ordered]
            }

            resource "test_thing" "ordered" {}

            module "child" {
              source = "./child"
              input  = test_thing.counted[0].id
            }

            module "nested" {
              for_each = toset(["a", "b"])
              source   = "./nested"
              value    = each.key
            }

            output "out" {
              value = module.child.result
            }
            "#,
            "./child" => r#"
            variable "input" {}
            variable "unset" {
              default = 1
            }

            resource "test_thing" "inner" {
              string = var.input
            }

            output "result" {
              value = test_thing.inner.id
            }

            output "other" {
              value = var.unset
            }
            "#,
            "./nested" => r#"
            variable "value" {}
            output "echo" {
              value = var.value
            }
            "#,
        }
    }

    fn query(config: &Config, module_instance: &str, reference: &str) -> (String, Vec<String>) {
        let (module, references) = Analyzer::new(config).meta_references(
            &parse_module_instance(module_instance).unwrap(),
            &parse_ref(reference).unwrap(),
        );
        let mut references: Vec<String> = references.iter().map(Reference::display_string).collect();
        references.sort();
        (module.to_string(), references)
    }

    #[test]
    fn template_references() {
        let config = config();
        assert_eq!(
            query(&config, "", "local.combined"),
            ("".into(), vec!["local.name".into(), "var.root_var".into()])
        );
    }

    #[test]
    fn meta_arguments_are_not_resource_references() {
        let config = config();
        assert_eq!(
            query(&config, "", "test_thing.counted[1]"),
            ("".into(), vec!["local.name".into()])
        );
    }

    #[test]
    fn repetition_references() {
        let config = config();
        let analyzer = Analyzer::new(&config);
        let addr = Resource::managed("test_thing", "counted").absolute(ModuleInstance::root());

        let references = analyzer.references_from_resource_repetition(&addr);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].display_string(), "local.combined");

        let addr = Resource::managed("test_thing", "ordered").absolute(ModuleInstance::root());
        assert!(analyzer.references_from_resource_repetition(&addr).is_empty());
    }

    #[test]
    fn resource_instance_shortcut() {
        let config = config();
        let analyzer = Analyzer::new(&config);
        let addr = AbsResourceInstance::new(
            parse_module_instance("module.child").unwrap(),
            Resource::managed("test_thing", "inner").instance(None),
        );

        let references = analyzer.references_from_resource_instance(&addr);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].display_string(), "var.input");
    }

    #[test]
    fn output_value_shortcut() {
        let config = config();
        let analyzer = Analyzer::new(&config);

        let references =
            analyzer.references_from_output_value(&AbsOutputValue::new(ModuleInstance::root(), "out".into()));
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].display_string(), "module.child.result");

        let references = analyzer.references_from_output_value(&AbsOutputValue::new(
            ModuleInstance::root(),
            "missing".into(),
        ));
        assert!(references.is_empty());
    }

    #[test]
    fn unset_variables() {
        let config = config();
        assert_eq!(query(&config, "module.child", "var.unset"), ("".into(), vec![]));
    }

    #[test]
    fn whole_module_reads_all_outputs() {
        let config = config();
        assert_eq!(
            query(&config, "", "module.child"),
            (
                "module.child".into(),
                vec!["test_thing.inner.id".into(), "var.unset".into()]
            )
        );
        assert_eq!(
            query(&config, "", "module.child.other"),
            ("module.child".into(), vec!["var.unset".into()])
        );
        assert_eq!(
            query(&config, "", r#"module.nested["a"]"#),
            (r#"module.nested["a"]"#.into(), vec!["var.value".into()])
        );
    }

    #[test]
    fn variables_of_repeated_modules() {
        let config = config();
        assert_eq!(
            query(&config, r#"module.nested["b"]"#, "var.value"),
            ("".into(), vec!["each.key".into()])
        );
    }

    #[test]
    fn provider_configs() {
        let config = config();
        let analyzer = Analyzer::new(&config);
        let provider = |alias: Option<&str>| {
            Reference::new(crate::addrs::Referenceable::ProviderConfig(
                crate::addrs::LocalProviderConfig::new("test".into(), alias.map(Into::into)),
            ))
        };

        let (_, references) = analyzer.meta_references(&ModuleInstance::root(), &provider(None));
        assert_eq!(references[0].display_string(), "local.name");

        let (_, references) =
            analyzer.meta_references(&ModuleInstance::root(), &provider(Some("other")));
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].display_string(), "var.root_var");
    }

    #[test]
    fn degrades_for_unknown_modules() {
        let config = config();
        assert_eq!(
            query(&config, "module.child.module.missing", "local.a"),
            ("module.child".into(), vec![])
        );
        assert_eq!(query(&config, "", "module.missing.out"), ("".into(), vec![]));
        assert_eq!(query(&config, "module.missing", "var.x"), ("".into(), vec![]));
        assert_eq!(query(&config, "", "local.missing"), ("".into(), vec![]));
    }

    #[test]
    fn contributing_resources() {
        let config = config();
        let analyzer = Analyzer::new(&config);
        let start = [AbsReference::new(
            ModuleInstance::root(),
            Reference::new(crate::addrs::Referenceable::output("out")),
        )];

        let references: Vec<String> = analyzer
            .contributing_resource_references(&start)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            references,
            vec![
                "module.child.test_thing.inner.id",
                "test_thing.counted[0].id",
            ]
        );

        let resources: Vec<String> = analyzer
            .contributing_resources(&start)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            resources,
            vec!["module.child.test_thing.inner", "test_thing.counted"]
        );
    }
}
