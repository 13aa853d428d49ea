//! Provider listing command handler.

use super::commands::OutputFormat;
use super::output::{emit, to_json};
use fablewright::{Capability, FablewrightConfig, FablewrightResult, ProviderManager};

/// List usable providers in preference order, then the skipped ones.
pub fn list_providers(config: &FablewrightConfig, format: OutputFormat) -> FablewrightResult<()> {
    let manager = ProviderManager::from_config(config);
    let described = manager.describe();

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = described
                .iter()
                .map(|(channel, descriptor)| {
                    serde_json::json!({
                        "channel": channel.to_string(),
                        "provider": descriptor,
                    })
                })
                .collect();
            emit(&to_json(&entries)?, None)?;
        }
        OutputFormat::Human => {
            println!("{:<8} {:<12} {:<12} capabilities", "channel", "provider", "status");
            println!("{:-<80}", "");
            for (channel, descriptor) in &described {
                let capabilities: Vec<String> =
                    [Capability::Text, Capability::Image, Capability::ImageAnalysis]
                        .into_iter()
                        .filter(|c| descriptor.capabilities().supports(*c))
                        .map(|c| c.to_string())
                        .collect();
                println!(
                    "{:<8} {:<12} {:<12} {}",
                    channel.to_string(),
                    descriptor.name(),
                    if *descriptor.available() { "available" } else { "unavailable" },
                    capabilities.join(", ")
                );
            }
        }
    }
    Ok(())
}
