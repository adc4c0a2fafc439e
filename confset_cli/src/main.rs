use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use confset_engine::{Envelope, build, read_with_envelope, validate};
use confset_model::{ConfigNode, Diagnostics, ResourceSchema};
use confset_resources::{bgp_group, event_options_policy};

#[derive(Debug, Parser)]
#[command(name = "confset")]
#[command(about = "Transcode structured resource documents to and from Junos set lines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the set-line sequence for a JSON document
    Render {
        doc: PathBuf,

        #[arg(long, value_enum)]
        resource: CliResource,

        #[arg(long)]
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// Parse a set-line dump into a JSON document
    Parse {
        dump: PathBuf,

        #[arg(long, value_enum)]
        resource: CliResource,

        /// Treat the dump as absolute lines for the named resource instead
        /// of `display set relative` output
        #[arg(long)]
        absolute_name: Option<String>,
    },
    /// Validate a JSON document and print its diagnostics
    Check {
        doc: PathBuf,

        #[arg(long, value_enum)]
        resource: CliResource,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliResource {
    EventOptionsPolicy,
    BgpGroup,
}

impl CliResource {
    fn schema(self) -> ResourceSchema {
        match self {
            CliResource::EventOptionsPolicy => event_options_policy(),
            CliResource::BgpGroup => bgp_group(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            doc,
            resource,
            name,
            json,
        } => {
            let schema = resource.schema();
            let node = load_document(&doc)?;
            let lines = build(&schema, &name, &node)
                .map_err(|err| anyhow::anyhow!("{err} ({})", err.kind()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                for line in &lines {
                    println!("{line}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Parse {
            dump,
            resource,
            absolute_name,
        } => {
            let schema = resource.schema();
            let raw = fs::read_to_string(&dump)
                .with_context(|| format!("read dump {}", dump.display()))?;
            let envelope = match &absolute_name {
                Some(name) => Envelope::absolute(&schema, name),
                None => Envelope::relative(),
            };

            let mut node = ConfigNode::new();
            read_with_envelope(&schema, &raw, &envelope, &mut node)?;
            println!("{}", serde_json::to_string_pretty(&node)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            doc,
            resource,
            json,
        } => {
            let schema = resource.schema();
            let node = load_document(&doc)?;

            let mut diags = Diagnostics::new();
            validate(&schema, &node, &mut diags);

            if json {
                println!("{}", serde_json::to_string_pretty(&diags)?);
            } else if diags.is_empty() {
                println!("ok");
            } else {
                for diagnostic in diags.iter() {
                    println!("{diagnostic}");
                }
            }

            if diags.has_errors() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_document(path: &PathBuf) -> anyhow::Result<ConfigNode> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read document {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decode document {}", path.display()))
}
