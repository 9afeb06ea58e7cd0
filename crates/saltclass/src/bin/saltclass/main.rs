mod cli;

use saltclass::{Resolver, Settings};
use serde::Serialize;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SALTCLASS_LOG"))
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
        cli::Command::Pillars(node_cli) => pillars(&cli.settings, node_cli),
        cli::Command::Tops(node_cli) => tops(&cli.settings, node_cli),
        cli::Command::Dev(dev_cli) => dev(&cli.settings, dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn pillars(settings: &cli::SettingsArgs, cli: cli::NodeCommand) -> anyhow::Result<()> {
    let resolver = Resolver::new(load_settings(settings)?);
    let pillars = resolver.resolve_pillars(&cli.node)?;

    output(&cli.output, &pillars)?;
    Ok(())
}

pub fn tops(settings: &cli::SettingsArgs, cli: cli::NodeCommand) -> anyhow::Result<()> {
    let resolver = Resolver::new(load_settings(settings)?);
    let tops = resolver.resolve_tops(&cli.node)?;

    output(&cli.output, &tops)?;
    Ok(())
}

fn load_settings(args: &cli::SettingsArgs) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(file) => Settings::from_file(file)?,
        None => Settings::default(),
    };

    if let Some(path) = &args.path {
        settings.path = path.clone();
    }

    if let Some(extension) = &args.extension {
        settings.extension = extension.clone();
    }

    anyhow::ensure!(
        settings.path.is_dir(),
        "Storage root {} is not a directory",
        settings.path.display()
    );

    Ok(settings)
}

fn output(output: &cli::OutputArgs, value: &impl Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (saltclass-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(settings: &cli::SettingsArgs, cli: cli::DevCommand) -> anyhow::Result<()> {
    let resolver = Resolver::new(load_settings(settings)?);

    match cli.command {
        cli::DevSubCommand::Settings => println!("{:#?}", resolver.settings()),
        cli::DevSubCommand::Expansion { node } => {
            let expansion = resolver.expand(&node)?;
            for entry in expansion.entries() {
                println!("{:?} {}", entry.kind, entry.name);
            }
        }
    }

    Ok(())
}
