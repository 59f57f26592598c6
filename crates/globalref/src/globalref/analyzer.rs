use super::boundary::{self, Declaration, Resolution};
use super::narrow::{body_references, expr_references};
use super::Generalize;
use crate::addrs::{ModuleInstance, Reference, TraversalStep};
use crate::configs::{self, Config};
use crate::lang::Extractor;

/// Answers reference queries against a loaded module tree
///
/// Holds nothing but a borrow of the configuration, copying it around is free.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'c> {
    config: &'c Config,
}

impl<'c> Analyzer<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'c Config {
        self.config
    }

    /// Configuration shared by all instances of the module `module_instance` is an instance of
    pub fn module_config(&self, module_instance: &ModuleInstance) -> Option<&'c Config> {
        self.config.descendant(&module_instance.generalize())
    }

    /// Longest prefix of `module_instance` that exists in the configuration
    pub fn resolvable_prefix(&self, module_instance: &ModuleInstance) -> ModuleInstance {
        let depth = self.config.resolvable_depth(&module_instance.generalize());
        module_instance.prefix(depth)
    }

    /// References made by the configuration of the object `reference` points to
    ///
    /// `reference` is interpreted from inside `module_instance`. The returned references are relative to the
    /// returned module instance, which differs from the input for input variables (calling module) and module
    /// outputs (called module).
    ///
    /// The attribute path of `reference` narrows the result to the part of the configuration it selects.
    ///
    /// Queries that cannot be answered return no references: a module instance that does not exist resolves
    /// to its longest existing prefix, a declaration that does not exist to the module it was looked for in.
    #[tracing::instrument(level = "trace", skip_all, fields(module = %module_instance, reference = %reference))]
    pub fn meta_references(
        &self,
        module_instance: &ModuleInstance,
        reference: &Reference,
    ) -> (ModuleInstance, Vec<Reference>) {
        if self.module_config(module_instance).is_none() {
            let prefix = self.resolvable_prefix(module_instance);
            tracing::debug!(%module_instance, %prefix, "module instance not in configuration");
            return (prefix, vec![]);
        }

        let Resolution {
            module,
            declaration,
        } = boundary::resolve(module_instance, &reference.subject);

        let Some(config) = self.module_config(&module) else {
            let prefix = self.resolvable_prefix(&module);
            tracing::debug!(%module, %prefix, "target module not in configuration");
            return (prefix, vec![]);
        };

        let mut references = vec![];
        if !collect(&config.module, &declaration, &reference.remaining, &mut references) {
            tracing::debug!(%module, ?declaration, "declaration not found");
        }

        (module, references)
    }
}

/// Collect the references of `declaration`, returns `false` if it is not declared in `module`
fn collect(
    module: &configs::Module,
    declaration: &Declaration,
    path: &[TraversalStep],
    out: &mut Vec<Reference>,
) -> bool {
    match declaration {
        Declaration::Local(name) => {
            let Some(local) = module.locals.get(name) else {
                return false;
            };
            expr_references(&Extractor::new(&local.source), &local.expr, path, out);
        }
        Declaration::Resource(addr) => {
            let Some(resource) = module.resource(addr) else {
                return false;
            };
            body_references(
                &Extractor::new(&resource.source),
                &resource.block.body,
                path,
                configs::Resource::META_ARGUMENTS,
                out,
            );
        }
        Declaration::Output(name) => {
            let Some(output) = module.outputs.get(name) else {
                return false;
            };
            expr_references(&Extractor::new(&output.source), &output.value, path, out);
        }
        Declaration::ModuleArgument { call, variable } => {
            let Some(call) = module.module_calls.get(call) else {
                return false;
            };
            let Some(argument) = call.argument(variable) else {
                // unset, the variable's default applies
                return true;
            };
            expr_references(&Extractor::new(&call.source), argument, path, out);
        }
        Declaration::AllOutputs => {
            // reading a single output through the module object
            if let Some((output, rest)) = path
                .split_first()
                .and_then(|(head, rest)| Some((module.outputs.get(head.as_name()?)?, rest)))
            {
                expr_references(&Extractor::new(&output.source), &output.value, rest, out);
                return true;
            }

            for output in module.outputs.values() {
                Extractor::new(&output.source).expr(&output.value, out);
            }
        }
        Declaration::Provider(addr) => {
            let Some(provider) = module.provider_configs.get(addr) else {
                return false;
            };
            body_references(
                &Extractor::new(&provider.source),
                &provider.block.body,
                path,
                &["alias"],
                out,
            );
        }
        Declaration::None => {}
    }

    true
}
