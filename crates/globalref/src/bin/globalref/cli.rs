//! globalref cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; globalref ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the references made by the object a reference points to
    ///
    /// Loads the root module from the work directory
    #[command(alias = "refs")]
    References(ReferencesCommand),

    /// Print all resources that contribute to the given references, transitively
    Contributing(ContributingCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct ReferencesCommand {
    #[clap(flatten)]
    pub module: ModuleArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Reference to analyze, e.g. `test_thing.single.string`
    pub reference: String,
}

#[derive(Parser, Debug)]
pub struct ContributingCommand {
    #[clap(flatten)]
    pub module: ModuleArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// References to start from
    #[arg(required = true)]
    pub references: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ModuleArgs {
    /// Module instance the references are relative to, e.g. `module.app["eu"]`
    ///
    /// Defaults to the root module
    #[clap(short = 'm', long = "module", default_value = "")]
    pub module: String,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Files of the root module
    Files,
    /// The loaded module tree
    Config,
}
