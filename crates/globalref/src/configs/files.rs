//! collection of hcl files making up one module ([Body] and path to source file)
//!
//! [ModuleFiles] tracks
//! - the directory the module was loaded from
//! - the source path of each file
//! - the root blocks
//! - the root attributes
//! and defines a numeric index for each. Once added those indices are stable (removal is not possible)
use hcl_edit::structure::{Attribute, Block, Body, Structure};
use std::path::{Path, PathBuf};

#[derive(Default, Debug)]
pub struct ModuleFiles {
    dir: Option<PathBuf>,
    sources: Vec<Source>,
    root_attributes: Vec<(usize, Attribute)>,
    root_blocks: Vec<(usize, Block)>,
}

impl ModuleFiles {
    /// Inserts and indexes an hcl document
    pub fn insert(&mut self, document: Body, path: impl Into<Option<PathBuf>>) {
        let source_index = self.sources.len();
        self.sources.push(path.into());

        for structure in document.into_iter() {
            match structure {
                Structure::Block(block) => self.root_blocks.push((source_index, block)),
                Structure::Attribute(attribute) => {
                    self.root_attributes.push((source_index, attribute))
                }
            }
        }
    }

    /// Parse a single in-memory document
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Ok(hcl_edit::parser::parse_body(text)?.into())
    }

    pub fn get_attribute(&self, index: usize) -> SourceAttribute {
        let (source_index, attribute) = &self.root_attributes[index];
        (index, &self.sources[*source_index], attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = SourceAttribute> {
        self.root_attributes
            .iter()
            .enumerate()
            .map(|(index, (source_index, attribute))| {
                (index, &self.sources[*source_index], attribute)
            })
    }

    pub fn get_block(&self, index: usize) -> SourceBlock {
        let (source_index, block) = &self.root_blocks[index];
        (index, &self.sources[*source_index], block)
    }

    pub fn blocks(&self) -> impl Iterator<Item = SourceBlock> {
        self.root_blocks
            .iter()
            .enumerate()
            .map(|(index, (source_index, block))| (index, &self.sources[*source_index], block))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Directory the module was loaded from, `None` for in-memory modules
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl ModuleFiles {
    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let body = hcl_edit::parser::parse_body(&file_contents)?;

        self.insert(body, Some(file_path));
        Ok(())
    }

    /// Load all `*.tf` files of a directory, in file name order
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let dir_path = dir_path.canonicalize()?;

        let mut file_paths = vec![];
        for dir_entry in std::fs::read_dir(&dir_path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            let is_tf_file = dir_entry.file_name().to_string_lossy().ends_with(".tf");
            if !is_tf_file {
                continue;
            }

            file_paths.push(dir_entry.path());
        }

        if file_paths.is_empty() {
            return Err(LoadError::NoFilesFound(dir_path));
        }

        file_paths.sort();
        for file_path in &file_paths {
            self.load_file(file_path)?;
        }

        self.dir = Some(dir_path);
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No files found in directory {}", .0.display())]
    NoFilesFound(PathBuf),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse hcl file")]
    HclParseFailed(#[from] hcl_edit::parser::Error),
    #[error("Invalid configuration in {module}")]
    InvalidModule {
        module: String,
        #[source]
        issues: super::ConfigIssues,
    },
    #[error("Module calls nested deeper than {max} levels at {module}")]
    TooDeep { module: String, max: usize },
}

impl From<Body> for ModuleFiles {
    fn from(value: Body) -> Self {
        let mut files = ModuleFiles::default();
        files.insert(value, None);
        files
    }
}

/// Utility macro to create [ModuleFiles]
///
/// Create from a single document
/// ```
/// # use globalref::module_files;
/// module_files!(r#"locals { a = 42 }"#);
/// ```
///
/// Create from multiple documents (path required)
/// ```
/// # use globalref::module_files;
/// module_files! {
///   "one.tf" => "locals { one = 1 }",
///   "two.tf" => "locals { two = 2 }"
/// };
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use globalref::module_files;
/// module_files!("not = valid = hcl");
/// ```
#[macro_export]
macro_rules! module_files {
    // single document without source
    { $expr:expr } => {
        $crate::configs::ModuleFiles::parse($expr).expect("body must parse")
    };
    // multi document with sources
    { $($source:expr => $expr:expr),+ } => {{
        let mut files = $crate::configs::ModuleFiles::default();
        $(
            files.insert(
                $crate::configs::ModuleFiles::parse_body($expr).expect("body must parse"),
                Some($source.into()),
            );
        )+

        files
    }};
}

impl ModuleFiles {
    #[doc(hidden)]
    pub fn parse_body(text: &str) -> Result<Body, LoadError> {
        Ok(hcl_edit::parser::parse_body(text)?)
    }
}

pub type Source = Option<PathBuf>;
pub type SourceAttribute<'a> = (usize, &'a Source, &'a Attribute);
pub type SourceBlock<'a> = (usize, &'a Source, &'a Block);
