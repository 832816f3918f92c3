//! Single-term lookup commands.

use console::style;

use crate::config::Settings;
use crate::semantic::{SemanticClient, SemanticLookup};

/// Print the identifier lookup result for one term as JSON.
pub async fn cmd_lookup(settings: &Settings, term: &str) -> anyhow::Result<()> {
    let client = SemanticClient::new(settings.lookup.clone(), settings.request_timeout)?;
    let result = client.lookup_identifier(term).await;

    match result.best() {
        Some(id) => eprintln!("{} {} -> {}", style("✓").green(), term, id),
        None => eprintln!("{} No identifiers found for '{}'", style("!").yellow(), term),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print the normalization response for one identifier as JSON.
pub async fn cmd_normalize(settings: &Settings, curie: &str) -> anyhow::Result<()> {
    let client = SemanticClient::new(settings.lookup.clone(), settings.request_timeout)?;
    let value = client.normalize(curie).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
