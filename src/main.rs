use clap::Parser;
use mxzoo::cli::{Cli, Commands};
use mxzoo::model::{ModelDownloader, ModelRegistry};
use mxzoo::zoo::ModelFamily;
use mxzoo::{Config, ModelZoo, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let zoo = ModelZoo::new()?;

    match cli.command {
        Commands::Pull {
            model,
            artifact_version,
            alias,
        } => {
            let loader = zoo.loader(model);
            let mut downloader = ModelDownloader::new(config)?;
            let model_info = downloader.pull(loader, artifact_version.as_deref(), alias)?;

            println!("✓ Successfully pulled model: {}", model);
            println!("  Repository: {}", zoo.repository().name());
            println!("  Version: {}", model_info.version);
            println!("  Path: {:?}", model_info.model_path);
            if let Some(alias) = model_info.alias {
                println!("  Alias: {}", alias);
            }
        }

        Commands::Info { model } => {
            let loader = zoo.loader(model);
            let metadata = loader.metadata()?;

            println!("{} ({}:{})", metadata.name, metadata.group_id, metadata.artifact_id);
            if let Some(description) = &metadata.description {
                println!("  {}", description);
            }
            println!("  Application: {}", loader.application());
            println!(
                "  Repository: {} ({})",
                zoo.repository().name(),
                zoo.repository().base_url()
            );

            if metadata.artifacts.is_empty() {
                println!("\n  No artifacts published.");
            } else {
                println!("\n  Artifacts:");
                for artifact in &metadata.artifacts {
                    let marker = if artifact.snapshot { " (snapshot)" } else { "" };
                    println!("    {}{}  [{} bytes]", artifact.version, marker, artifact.total_size());
                    for (name, file) in &artifact.files {
                        println!("      {}: {}", name, file.uri);
                    }
                }
            }
        }

        Commands::List => {
            let registry = ModelRegistry::load(&config)?;

            println!(
                "Model zoo: {} ({})\n",
                zoo.repository().name(),
                zoo.repository().base_url()
            );
            for family in ModelFamily::ALL {
                let loader = zoo.loader(family);
                match registry.find_family(family) {
                    Some(installed) => {
                        println!("  {} [{}]", family, loader.application());
                        println!("    Installed: {} at {:?}", installed.version, installed.model_path);
                        if let Some(alias) = &installed.alias {
                            println!("    Alias: {}", alias);
                        }
                    }
                    None => {
                        println!("  {} [{}]", family, loader.application());
                        println!("    Not installed. Use 'mxzoo pull {}' to download.", family);
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}
