//! Runs a combat scenario and prints what happened.
use anyhow::Result;
use combat_content::ContentFactory;
use combat_harness::{Content, HarnessConfig, Scenario};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig::load()?;
    tracing::info!(data_dir = %config.data_dir.display(), scenario = %config.scenario.display(), "loading");

    let factory = ContentFactory::new(&config.data_dir);
    let hooks = match config.hooks.clone() {
        Some(hooks) => hooks,
        None => factory.load_config()?,
    };
    let content = Content::new(factory.load_skills()?, factory.load_items()?, hooks)?;

    let scenario = Scenario::load(&config.scenario)?;
    let mut pipeline = scenario.build(content)?;
    let report = scenario.run(&mut pipeline)?;

    if config.output_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for combat in &report.combats {
            println!(
                "{} vs {}: {} strikes, {} HP / {} HP",
                combat.attacker, combat.defender, combat.strikes, combat.attacker_hp, combat.defender_hp
            );
        }
        for trigger in &report.triggers {
            println!("event {} (actor {})", trigger.event, trigger.actor);
        }
        println!(
            "{} playback events, {} hook failures, {} rejected actions",
            report.playback.len(),
            report.hook_failures,
            report.rejected_actions
        );
    }
    Ok(())
}
