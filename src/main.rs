//! CampaignForge binary - Run the full generation pipeline for a theme
//!
//! Usage: `campaignforge [theme]`
//!
//! Drives every stage in dependency order against the configured Ollama
//! endpoint and prints the finished campaign as JSON on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campaignforge::application::services::CampaignGenerator;
use campaignforge::infrastructure::config::AppConfig;
use campaignforge::infrastructure::ollama::OllamaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaignforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let theme = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "high fantasy".to_string());

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Ollama: {}", config.ollama_base_url);
    tracing::info!("  Model: {}", config.ollama_model);
    tracing::info!("  Theme: {}", theme);

    let chat = OllamaClient::new(&config.ollama_base_url, &config.ollama_model);
    let mut generator = CampaignGenerator::new(chat, &theme, config.generator);

    generator.create_overview().await?;
    generator.create_locations().await?;
    generator.create_characters().await?;
    generator.create_encounters().await?;

    // Flesh out every encounter with candidate actions
    let shape: Vec<usize> = generator
        .locations()
        .unwrap_or_default()
        .iter()
        .map(|location| {
            location
                .encounters
                .as_ref()
                .map(Vec::len)
                .unwrap_or_default()
        })
        .collect();
    for (location_index, encounter_count) in shape.into_iter().enumerate() {
        for encounter_index in 0..encounter_count {
            generator
                .create_actions(location_index, encounter_index)
                .await?;
        }
    }

    if !generator.anomalies().is_empty() {
        tracing::warn!(
            "{} correlation anomalies recorded during generation",
            generator.anomalies().len()
        );
    }

    let campaign = serde_json::json!({
        "theme": generator.theme(),
        "overview": generator.overview(),
        "characters": generator.characters(),
        "locations": generator.locations(),
    });
    println!("{}", serde_json::to_string_pretty(&campaign)?);

    Ok(())
}
