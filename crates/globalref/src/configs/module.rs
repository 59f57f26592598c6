//! Declarations of a single module
use super::files::{ModuleFiles, Source};
use crate::addrs;
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, Body};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Root block types that exist in configuration but never declare anything referenceable
const IGNORED_BLOCK_TYPES: &[&str] = &["terraform", "moved", "import", "check", "removed"];

/// All declarations of one module, merged across its files
#[derive(Debug, Default)]
pub struct Module {
    pub source_dir: Option<PathBuf>,
    pub variables: IndexMap<String, Variable>,
    pub locals: IndexMap<String, Local>,
    pub outputs: IndexMap<String, Output>,
    pub module_calls: IndexMap<String, ModuleCall>,
    pub resources: IndexMap<addrs::Resource, Resource>,
    pub provider_configs: IndexMap<addrs::LocalProviderConfig, Provider>,
}

#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub block: Block,
    pub source: Source,
}

#[derive(Debug)]
pub struct Local {
    pub name: String,
    pub expr: Expression,
    pub source: Source,
}

#[derive(Debug)]
pub struct Output {
    pub name: String,
    pub value: Expression,
    pub block: Block,
    pub source: Source,
}

#[derive(Debug)]
pub struct ModuleCall {
    pub name: String,
    /// the `source` argument, e.g. `./child`
    pub source_addr: String,
    pub count: Option<Expression>,
    pub for_each: Option<Expression>,
    pub block: Block,
    pub source: Source,
}

impl ModuleCall {
    /// Argument expression bound to the called module's input variable `name`
    pub fn argument(&self, name: &str) -> Option<&Expression> {
        find_attribute(&self.block.body, name)
    }
}

#[derive(Debug)]
pub struct Resource {
    pub addr: addrs::Resource,
    pub count: Option<Expression>,
    pub for_each: Option<Expression>,
    pub block: Block,
    pub source: Source,
}

impl Resource {
    /// Arguments and blocks handled by the configuration language itself rather than the resource type
    pub const META_ARGUMENTS: &'static [&'static str] = &[
        "count",
        "for_each",
        "depends_on",
        "provider",
        "lifecycle",
        "provisioner",
        "connection",
    ];

    /// The `count` or `for_each` expression, whichever is set
    pub fn repetition(&self) -> Option<&Expression> {
        self.count.as_ref().or(self.for_each.as_ref())
    }
}

#[derive(Debug)]
pub struct Provider {
    pub addr: addrs::LocalProviderConfig,
    pub block: Block,
    pub source: Source,
}

impl Module {
    pub fn new(files: &ModuleFiles) -> Result<Self, ConfigIssues> {
        let mut module = Self {
            source_dir: files.dir().map(ToOwned::to_owned),
            ..Default::default()
        };

        let mut e = ConfigIssues::new();
        // first block index of each declaration, for collision reporting
        let mut declared: IndexMap<String, usize> = Default::default();
        let mut declare = |e: &mut ConfigIssues, key: String, index: usize| -> bool {
            if let Some(existing) = declared.get(&key) {
                e.log(Issue::DuplicateDeclaration {
                    name: key,
                    existing: *existing,
                    new: index,
                });
                return false;
            }
            declared.insert(key, index);
            true
        };

        for (index, _source, _attribute) in files.attributes() {
            e.log(Issue::RootAttribute(index))
        }

        for (index, source, block) in files.blocks() {
            let ident = block.ident.value().as_str();
            match ident {
                "resource" | "data" => {
                    if block.labels.len() != 2 {
                        e.log(Issue::WrongLabelCount {
                            block: index,
                            expected: 2,
                        });
                        continue;
                    }

                    let type_name = block.labels[0].as_str();
                    let name = block.labels[1].as_str();
                    let addr = match ident {
                        "data" => addrs::Resource::data(type_name, name),
                        _ => addrs::Resource::managed(type_name, name),
                    };

                    if !declare(&mut e, addr.to_string(), index) {
                        continue;
                    }

                    let count = find_attribute(&block.body, "count").cloned();
                    let for_each = find_attribute(&block.body, "for_each").cloned();
                    if count.is_some() && for_each.is_some() {
                        e.log(Issue::CountAndForEach(index));
                        continue;
                    }

                    module.resources.insert(
                        addr.clone(),
                        Resource {
                            addr,
                            count,
                            for_each,
                            block: block.clone(),
                            source: source.clone(),
                        },
                    );
                }
                "variable" => {
                    let Some(name) = single_label(&mut e, index, block) else {
                        continue;
                    };
                    if !declare(&mut e, format!("var.{name}"), index) {
                        continue;
                    }

                    module.variables.insert(
                        name.clone(),
                        Variable {
                            name,
                            block: block.clone(),
                            source: source.clone(),
                        },
                    );
                }
                "output" => {
                    let Some(name) = single_label(&mut e, index, block) else {
                        continue;
                    };
                    let Some(value) = find_attribute(&block.body, "value") else {
                        e.log(Issue::OutputValueMissing(index));
                        continue;
                    };
                    if !declare(&mut e, format!("output.{name}"), index) {
                        continue;
                    }

                    module.outputs.insert(
                        name.clone(),
                        Output {
                            name,
                            value: value.clone(),
                            block: block.clone(),
                            source: source.clone(),
                        },
                    );
                }
                "locals" => {
                    if !block.labels.is_empty() {
                        e.log(Issue::WrongLabelCount {
                            block: index,
                            expected: 0,
                        });
                        continue;
                    }

                    for attribute in block.body.attributes() {
                        let name = attribute.key.value().as_str().to_string();
                        if !declare(&mut e, format!("local.{name}"), index) {
                            continue;
                        }

                        module.locals.insert(
                            name.clone(),
                            Local {
                                name,
                                expr: attribute.value.clone(),
                                source: source.clone(),
                            },
                        );
                    }
                }
                "module" => {
                    let Some(name) = single_label(&mut e, index, block) else {
                        continue;
                    };
                    let Some(source_addr) =
                        find_attribute(&block.body, "source").and_then(string_literal)
                    else {
                        e.log(Issue::ModuleSourceMissing(index));
                        continue;
                    };
                    if !declare(&mut e, format!("module.{name}"), index) {
                        continue;
                    }

                    let count = find_attribute(&block.body, "count").cloned();
                    let for_each = find_attribute(&block.body, "for_each").cloned();
                    if count.is_some() && for_each.is_some() {
                        e.log(Issue::CountAndForEach(index));
                        continue;
                    }

                    module.module_calls.insert(
                        name.clone(),
                        ModuleCall {
                            name,
                            source_addr,
                            count,
                            for_each,
                            block: block.clone(),
                            source: source.clone(),
                        },
                    );
                }
                "provider" => {
                    let Some(local_name) = single_label(&mut e, index, block) else {
                        continue;
                    };
                    let alias = find_attribute(&block.body, "alias").and_then(string_literal);
                    let addr = addrs::LocalProviderConfig::new(local_name, alias);
                    let key = addrs::Referenceable::ProviderConfig(addr.clone()).to_string();
                    if !declare(&mut e, key, index) {
                        continue;
                    }

                    module.provider_configs.insert(
                        addr.clone(),
                        Provider {
                            addr,
                            block: block.clone(),
                            source: source.clone(),
                        },
                    );
                }
                ident if IGNORED_BLOCK_TYPES.contains(&ident) => {
                    tracing::trace!(ident, "ignoring block");
                }
                _ => e.log(Issue::UnknownBlockType(index)),
            }
        }

        if !e.issues.is_empty() {
            return Err(e);
        };

        Ok(module)
    }

    pub fn resource(&self, addr: &addrs::Resource) -> Option<&Resource> {
        self.resources.get(addr)
    }
}

fn single_label(e: &mut ConfigIssues, index: usize, block: &Block) -> Option<String> {
    if block.labels.len() != 1 {
        e.log(Issue::WrongLabelCount {
            block: index,
            expected: 1,
        });
        return None;
    }
    Some(block.labels[0].as_str().to_string())
}

/// Expression of the attribute `key` directly inside `body`
pub(crate) fn find_attribute<'b>(body: &'b Body, key: &str) -> Option<&'b Expression> {
    body.attributes()
        .find(|attribute| attribute.key.value().as_str() == key)
        .map(|attribute| &attribute.value)
}

fn string_literal(expr: &Expression) -> Option<String> {
    match hcl::Expression::from(expr.clone()) {
        hcl::Expression::String(s) => Some(s),
        _ => None,
    }
}

#[derive(derive_new::new, Debug)]
pub struct ConfigIssues {
    #[new(default)]
    issues: Vec<Issue>,
}

impl ConfigIssues {
    pub fn log(&mut self, issue: Issue) {
        tracing::trace!(?issue, "issue found");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

impl std::error::Error for ConfigIssues {}

impl std::fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Debug;
        match self.issues.first() {
            Some(first) => first.fmt(f)?,
            None => return f.write_str("no issues"),
        }
        if self.issues.len() > 1 {
            write!(f, " (and {} more)", self.issues.len() - 1)?;
        }
        Ok(())
    }
}

/// Problems found while decoding a module
///
/// Indices point to the root attributes/blocks of the [ModuleFiles] that were decoded.
#[derive(Debug, PartialEq)]
pub enum Issue {
    RootAttribute(usize),
    UnknownBlockType(usize),
    WrongLabelCount { block: usize, expected: usize },
    DuplicateDeclaration { name: String, existing: usize, new: usize },
    OutputValueMissing(usize),
    ModuleSourceMissing(usize),
    CountAndForEach(usize),
}
