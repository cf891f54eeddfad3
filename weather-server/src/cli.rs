use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use weather_core::{Config, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Current weather for a city over HTTP")]
pub struct Cli {
    /// Config file path. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Listen address, overriding `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Look up the weather for one city and print it as JSON.
    Show {
        /// City name, e.g. "Paris".
        city_name: String,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Serve { bind } => {
                let mut config = Config::load_from(&path)?;
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                crate::server::start_server(config).await?;
            }
            Command::Show { city_name } => {
                let config = Config::load_from(&path)?;
                let service = WeatherService::from_config(&config)?;
                let current = service.current_weather(&city_name).await?;
                let json = serde_json::to_string_pretty(&current)
                    .context("Failed to serialize weather report")?;
                println!("{json}");
            }
            Command::InitConfig { force } => {
                if path.exists() && !force {
                    bail!(
                        "Config file already exists: {}\nHint: pass --force to overwrite it.",
                        path.display()
                    );
                }
                Config::default().save_to(&path)?;
                println!("Wrote default config to {}", path.display());
            }
        }

        Ok(())
    }
}
