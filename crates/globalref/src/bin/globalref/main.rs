mod cli;

use globalref::addrs::{self, ModuleInstance, Reference};
use globalref::configs::{Config, ModuleFiles};
use globalref::globalref::{AbsReference, Analyzer};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("GLOBALREF_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::References(refs_cli) => references(refs_cli),
        cli::Command::Contributing(contributing_cli) => contributing(contributing_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

struct ReferencesOutput {
    module: ModuleInstance,
    references: Vec<Reference>,
}

impl serde::ser::Serialize for ReferencesOutput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser = serializer.serialize_map(Some(2))?;
        ser.serialize_entry("module", &self.module)?;
        ser.serialize_entry("references", &self.references)?;
        ser.end()
    }
}

struct ContributingOutput {
    references: Vec<AbsReference>,
    resources: Vec<String>,
}

impl serde::ser::Serialize for ContributingOutput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser = serializer.serialize_map(Some(2))?;
        ser.serialize_entry("references", &self.references)?;
        ser.serialize_entry("resources", &self.resources)?;
        ser.end()
    }
}

pub fn references(cli: cli::ReferencesCommand) -> anyhow::Result<()> {
    let config = load()?;
    let module_instance = addrs::parse_module_instance(&cli.module.module)?;
    let reference = addrs::parse_ref(&cli.reference)?;

    let (module, references) = Analyzer::new(&config).meta_references(&module_instance, &reference);

    output(
        &cli.output,
        &ReferencesOutput { module, references },
    )
}

pub fn contributing(cli: cli::ContributingCommand) -> anyhow::Result<()> {
    let config = load()?;
    let module_instance = addrs::parse_module_instance(&cli.module.module)?;

    let mut start = vec![];
    for text in &cli.references {
        start.push(AbsReference::new(
            module_instance.clone(),
            addrs::parse_ref(text)?,
        ));
    }

    let analyzer = Analyzer::new(&config);
    let resources: Vec<String> = analyzer
        .contributing_resources(&start)
        .iter()
        .map(ToString::to_string)
        .collect();

    output(
        &cli.output,
        &ContributingOutput {
            references: analyzer.contributing_resource_references(&start),
            resources,
        },
    )
}

fn load() -> anyhow::Result<Config> {
    Ok(Config::load_dir(&std::env::current_dir()?)?)
}

fn output(output: &cli::OutputArgs, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (globalref-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    match cli.command {
        cli::DevSubCommand::Files => {
            let mut files = ModuleFiles::default();
            files.load_directory(&std::env::current_dir()?)?;
            println!("{files:#?}")
        }
        cli::DevSubCommand::Config => println!("{:#?}", load()?),
    }

    Ok(())
}
