//! Configuration management commands.

use console::style;
use serde_json::json;

use crate::config::{Config, Settings};

/// Print the effective settings and where they came from.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => eprintln!("{} Config file: {}", style("→").dim(), path.display()),
        None => eprintln!("{} No config file found, using defaults", style("!").yellow()),
    }

    let effective = json!({
        "output_dir": settings.output_dir.display().to_string(),
        "format": settings.format,
        "request_timeout": settings.request_timeout.map(|t| t.as_secs()),
        "lookup": settings.lookup,
        "lexical": settings.lexical,
    });
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
