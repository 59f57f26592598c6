//! The static module tree
use super::{LoadError, Module, ModuleFiles};
use crate::addrs;
use indexmap::IndexMap;
use std::path::Path;

/// Maximum depth of nested module calls
///
/// A module that calls itself (directly or via other modules) would otherwise load forever.
pub const MAX_MODULE_DEPTH: usize = 64;

/// A module and, recursively, every module it calls
///
/// There is exactly one [Config] per declared module, no matter how many instances `count` or `for_each`
/// produce at runtime.
#[derive(Debug)]
pub struct Config {
    pub path: addrs::Module,
    pub module: Module,
    pub children: IndexMap<String, Config>,
}

/// Everything a [ModuleWalker] gets to know about a module call it should load
#[derive(Debug, derive_new::new)]
pub struct ModuleRequest<'a> {
    /// name of the module call
    pub name: &'a str,
    /// generalized address of the module to load
    pub path: &'a addrs::Module,
    pub source_addr: &'a str,
    /// directory of the calling module, if it was loaded from disk
    pub parent_dir: Option<&'a Path>,
}

/// Loads the files of called modules
///
/// Returns `Ok(None)` for calls it cannot serve; those modules will be missing from the tree.
pub trait ModuleWalker {
    fn load_module(&mut self, request: &ModuleRequest<'_>) -> Result<Option<ModuleFiles>, LoadError>;
}

// blanket impl for FnMut
impl<F> ModuleWalker for F
where
    F: FnMut(&ModuleRequest<'_>) -> Result<Option<ModuleFiles>, LoadError>,
{
    fn load_module(&mut self, request: &ModuleRequest<'_>) -> Result<Option<ModuleFiles>, LoadError> {
        self(request)
    }
}

impl Config {
    pub fn build(root: Module, walker: &mut dyn ModuleWalker) -> Result<Self, LoadError> {
        Self::build_module(addrs::Module::root(), root, walker)
    }

    /// Load the module in `dir` and all local modules it calls
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let mut files = ModuleFiles::default();
        files.load_directory(dir)?;

        let root = Module::new(&files).map_err(|issues| LoadError::InvalidModule {
            module: "root module".to_string(),
            issues,
        })?;

        Self::build(root, &mut DirWalker)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(module = %path))]
    fn build_module(
        path: addrs::Module,
        module: Module,
        walker: &mut dyn ModuleWalker,
    ) -> Result<Self, LoadError> {
        let mut children = IndexMap::new();

        for (name, call) in &module.module_calls {
            let child_path = path.child(name);
            if child_path.names().len() > MAX_MODULE_DEPTH {
                return Err(LoadError::TooDeep {
                    module: child_path.to_string(),
                    max: MAX_MODULE_DEPTH,
                });
            }

            let request = ModuleRequest::new(
                name,
                &child_path,
                &call.source_addr,
                module.source_dir.as_deref(),
            );
            let Some(files) = walker.load_module(&request)? else {
                tracing::warn!(module=%child_path, source=%call.source_addr, "module source not loaded, skipping");
                continue;
            };

            let child = Module::new(&files).map_err(|issues| LoadError::InvalidModule {
                module: child_path.to_string(),
                issues,
            })?;

            let child = Self::build_module(child_path, child, walker)?;
            children.insert(name.clone(), child);
        }

        Ok(Self {
            path,
            module,
            children,
        })
    }

    /// Configuration of the module at `path`, relative to this one
    pub fn descendant(&self, path: &addrs::Module) -> Option<&Config> {
        let mut current = self;
        for name in path.names() {
            current = current.children.get(name)?;
        }
        Some(current)
    }

    /// Number of leading steps of `path` that exist in this tree
    pub fn resolvable_depth(&self, path: &addrs::Module) -> usize {
        let mut current = self;
        for (depth, name) in path.names().iter().enumerate() {
            match current.children.get(name) {
                Some(child) => current = child,
                None => return depth,
            }
        }
        path.names().len()
    }

    /// This module and all descendants, depth first
    pub fn all_modules(&self) -> Vec<&Config> {
        let mut all = vec![self];
        for child in self.children.values() {
            all.extend(child.all_modules());
        }
        all
    }
}

/// Loads modules from local directories, relative to the calling module
///
/// Registry and remote sources are not supported and get skipped.
#[derive(Debug, Default)]
pub struct DirWalker;

impl ModuleWalker for DirWalker {
    fn load_module(&mut self, request: &ModuleRequest<'_>) -> Result<Option<ModuleFiles>, LoadError> {
        if !is_local_source(request.source_addr) {
            tracing::warn!(source = request.source_addr, "only local module sources are supported");
            return Ok(None);
        }

        let Some(parent_dir) = request.parent_dir else {
            tracing::warn!(module=%request.path, "calling module has no directory");
            return Ok(None);
        };

        let mut files = ModuleFiles::default();
        files.load_directory(&parent_dir.join(request.source_addr))?;
        Ok(Some(files))
    }
}

fn is_local_source(source_addr: &str) -> bool {
    source_addr.starts_with("./") || source_addr.starts_with("../")
}

/// Serves module sources from memory, keyed on the `source` argument
#[derive(Debug, Default)]
pub struct MemoryWalker {
    sources: IndexMap<String, String>,
}

impl MemoryWalker {
    pub fn insert(&mut self, source_addr: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(source_addr.into(), text.into());
    }
}

impl ModuleWalker for MemoryWalker {
    fn load_module(&mut self, request: &ModuleRequest<'_>) -> Result<Option<ModuleFiles>, LoadError> {
        let Some(text) = self.sources.get(request.source_addr) else {
            return Ok(None);
        };
        ModuleFiles::parse(text).map(Some)
    }
}

/// Utility macro to create a [Config] from in-memory modules
///
/// The first document is the root module, the others are keyed on the `source` used to call them.
/// ```
/// # use globalref::module_tree;
/// let config = module_tree! {
///   r#"module "child" { source = "./child" }"#,
///   "./child" => "locals { a = 1 }",
/// };
/// assert!(config.children.contains_key("child"));
/// ```
///
/// # Panic
/// Panics on invalid input
#[macro_export]
macro_rules! module_tree {
    { $root:expr $(, $source:expr => $text:expr)* $(,)? } => {{
        #[allow(unused_mut)]
        let mut walker = $crate::configs::MemoryWalker::default();
        $(
            walker.insert($source, $text);
        )*
        let root = $crate::configs::Module::new(&$crate::module_files!($root)).expect("root module must be valid");
        $crate::configs::Config::build(root, &mut walker).expect("module tree must load")
    }};
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::module_files;

    fn nested() -> Config {
        module_tree! {
            r#"module "a" { source = "./a" }"#,
            "./a" => r#"module "b" { source = "./b" }"#,
            "./b" => "locals { x = 1 }",
        }
    }

    #[test]
    fn descendant() {
        let config = nested();
        let path = addrs::Module::root().child("a").child("b");

        let b = config.descendant(&path).expect("module exists");
        assert_eq!(b.path, path);
        assert!(b.module.locals.contains_key("x"));
        assert!(config
            .descendant(&addrs::Module::root().child("nope"))
            .is_none());
        assert_eq!(config.all_modules().len(), 3);
    }

    #[test]
    fn resolvable_depth() {
        let config = nested();
        let root = addrs::Module::root();

        assert_eq!(config.resolvable_depth(&root), 0);
        assert_eq!(config.resolvable_depth(&root.child("a").child("b")), 2);
        assert_eq!(config.resolvable_depth(&root.child("a").child("typo")), 1);
        assert_eq!(config.resolvable_depth(&root.child("typo").child("b")), 0);
    }

    #[test]
    fn unknown_sources_are_skipped() {
        let config = module_tree! {
            r#"module "remote" { source = "hashicorp/consul/aws" }"#,
        };
        assert!(config.children.is_empty());
    }

    #[test]
    fn recursive_modules_stop() {
        let mut walker = MemoryWalker::default();
        walker.insert("./self", r#"module "again" { source = "./self" }"#);
        let root = Module::new(&module_files!(r#"module "again" { source = "./self" }"#)).unwrap();

        assert!(matches!(
            Config::build(root, &mut walker),
            Err(LoadError::TooDeep { .. })
        ));
    }

    #[test]
    fn closure_walker() {
        let root = Module::new(&module_files!(r#"module "m" { source = "anything" }"#)).unwrap();
        let mut requested = vec![];
        let mut walker = |request: &ModuleRequest<'_>| -> Result<Option<ModuleFiles>, LoadError> {
            requested.push(request.path.to_string());
            ModuleFiles::parse("locals {}").map(Some)
        };

        let config = Config::build(root, &mut walker).unwrap();
        assert!(config.children.contains_key("m"));
        assert_eq!(requested, vec!["module.m"]);
    }
}
