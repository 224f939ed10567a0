//! `legm doctor`: Diagnose setup.

use legm_config::AppConfig;

use super::CmdResult;

pub async fn run() -> CmdResult {
    println!("🩺 LeGM Doctor — System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `legm config init` (using defaults)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Cannot continue without a valid config.");
            return Ok(());
        }
    };

    match super::fixture_path(&config, None) {
        Some(path) => match legm_stats::FixtureStats::from_path(&path) {
            Ok(_) => println!("  ✅ Stats fixture readable ({})", path.display()),
            Err(e) => {
                println!("  ❌ Stats fixture unusable: {e}");
                issues += 1;
            }
        },
        None => {
            println!("  ⚠️  No stats.fixture_path configured");
            issues += 1;
        }
    }

    match legm_providers::build_from_config(&config) {
        Ok(provider) => {
            println!("  ✅ API key configured for {}", provider.name());
            match provider.health_check().await {
                Ok(true) => println!("  ✅ Model provider reachable"),
                Ok(false) => {
                    println!("  ❌ Model provider rejected the credentials");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Model provider unreachable: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
