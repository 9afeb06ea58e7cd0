//! saltclass cli interface

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
    /// This is equivalent to running { cd <directory>; saltclass ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[clap(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct SettingsArgs {
    /// Read settings from a yaml file
    #[clap(short = 'c', long = "config", global(true))]
    pub config: Option<PathBuf>,

    /// Storage root containing classes/ and nodes/
    ///
    /// Overrides `path` of the settings file. Defaults to the work directory.
    #[clap(short = 'p', long = "path", global(true))]
    pub path: Option<PathBuf>,

    /// File extension of class and node documents
    #[clap(short = 'e', long = "extension", global(true))]
    pub extension: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved pillar data of a node
    #[command(alias = "pillar")]
    Pillars(NodeCommand),

    /// Print the environment and states of a node
    #[command(alias = "top")]
    Tops(NodeCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct NodeCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Node id
    pub node: String,
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
    /// Effective settings
    Settings,
    /// Expansion order of a node, the node itself last
    Expansion { node: String },
}
