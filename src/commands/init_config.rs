use anyhow::Result;
use calboard_core::config::CalboardConfig;
use owo_colors::OwoColorize;

pub fn run(force: bool) -> Result<()> {
    let path = CalboardConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}\n\nUse --force to overwrite it.",
            path.display()
        );
    }

    CalboardConfig::create_default_config(&path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
