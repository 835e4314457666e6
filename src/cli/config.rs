//! Configuration CLI command handlers

use std::path::Path;

use crate::cli::commands::ConfigCommand;
use crate::core::config::{validate_and_fix, validate_strict, Config};
use crate::error::{Result, WeaveError};

/// Handle configuration commands against the file at `path`
pub fn handle_config(command: ConfigCommand, path: &Path) -> Result<()> {
    match command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Show => handle_show(path),
        ConfigCommand::Validate => handle_validate(path),
        ConfigCommand::Init { force } => handle_init(path, force),
    }
}

/// Print the configuration as it will be used, after repairs
fn handle_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn handle_validate(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(WeaveError::Config(format!(
            "No configuration file at {}\n\n  → Run 'weave config init' to create one.",
            path.display()
        )));
    }

    let raw = Config::read_raw(path)?;

    let mut repaired = raw.clone();
    let report = validate_and_fix(&mut repaired);
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }

    validate_strict(&raw)?;

    println!("✓ Configuration is valid: {}", path.display());
    Ok(())
}

fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(WeaveError::InvalidInput(format!(
            "Configuration already exists at {}\n\n  → Use --force to overwrite it.",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
