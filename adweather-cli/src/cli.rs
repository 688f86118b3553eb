use adweather_core::{Config, ProviderId, StoredConfig, WeatherService};
use clap::{Parser, Subcommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "adweather", version, about = "Multi-day weather forecast by adcode or place name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store credentials for a provider in the local config file.
    Configure {
        /// Provider short name, e.g. "tencent" or "amap".
        provider: String,
    },

    /// Fetch the forecast for a 6-digit area code or a place name.
    Get {
        /// Area code (e.g. "330100") or place name (e.g. "杭州市").
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Get { query } => get(&query).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let provider = ProviderId::try_from(provider)?;

    let api_key = inquire::Password::new(&format!("API key for {provider}:"))
        .without_confirmation()
        .prompt()?;

    let stored = StoredConfig {
        api_type: Some(provider.to_string()),
        api_key: Some(api_key),
    };
    stored.save()?;

    println!(
        "Saved {provider} credentials to {}",
        StoredConfig::config_file_path()?.display()
    );

    Ok(())
}

async fn get(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::new(&config)?;

    let model = service.get_weather(query).await?;
    println!("{}", serde_json::to_string_pretty(&model)?);

    Ok(())
}
