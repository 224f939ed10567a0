//! `legm config`: Configuration management commands.

use legm_config::AppConfig;

use super::CmdResult;

const REDACTED: &str = "***";

pub async fn init() -> CmdResult {
    let dir = AppConfig::config_dir();
    let path = dir.join("config.toml");
    if path.exists() {
        println!("  Config already exists at {}", path.display());
        return Ok(());
    }
    std::fs::create_dir_all(&dir)?;
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("  ✅ Wrote default config to {}", path.display());
    Ok(())
}

/// Replace every configured key with a placeholder.
fn redacted(mut config: AppConfig) -> AppConfig {
    for key in [
        &mut config.llm.anthropic_api_key,
        &mut config.llm.openai_api_key,
        &mut config.llm.openai_compat_api_key,
    ] {
        if key.is_some() {
            *key = Some(REDACTED.into());
        }
    }
    config
}

pub async fn show() -> CmdResult {
    let config = super::load_config()?;
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

pub async fn path() -> CmdResult {
    println!("{}", AppConfig::config_dir().join("config.toml").display());
    Ok(())
}

pub async fn validate() -> CmdResult {
    println!("🔍 Validating configuration...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   ✅ Config parsed successfully");

    let mut warnings = Vec::new();
    if config.llm.active_api_key().is_none() {
        warnings.push(format!("No API key for provider {:?}", config.llm.provider));
    }
    if config.stats.fixture_path.is_none() {
        warnings.push("No stats.fixture_path set; pass --stats-fixture to analyze".to_string());
    }
    if config.bot.proactive_enabled && config.bot.max_daily_proactive == 0 {
        warnings.push("Proactive loop enabled with a daily cap of 0".to_string());
    }

    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!("   Provider:  {:?}", config.llm.provider);
    println!("   Model:     {}", config.llm.model);
    println!("   Rounds:    {}", config.agent.max_rounds);
    println!(
        "   Cadence:   {} per {}s, {} per month",
        config.bot.max_per_window, config.bot.window_secs, config.bot.monthly_budget
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_hides_only_present_keys() {
        let mut config = AppConfig::default();
        config.llm.anthropic_api_key = Some("sk-ant-secret".into());
        let shown = toml::to_string_pretty(&redacted(config)).unwrap();
        assert!(!shown.contains("sk-ant-secret"));
        assert!(shown.contains("anthropic_api_key = \"***\""));
        assert!(!shown.contains("openai_api_key"));
    }
}
