//! Battle simulator binary.
//!
//! Loads content (embedded, or from `BATTLE_DATA_DIR`), opens a standalone
//! encounter or a raid against an in-process ledger, and lets a scripted
//! player fight it out while the battle log streams to stdout.
//!
//! ```bash
//! RUST_LOG=runtime=debug BATTLE_ENCOUNTER=bandit_camp cargo run -p battle-cli
//! BATTLE_RAID=ashen_titan BATTLE_SEED=7 cargo run -p battle-cli
//! ```
mod autoplay;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};

use battle_content::loaders::embedded;
use battle_content::{ContentFactory, EncounterTable};
use battle_core::{AbilityCatalog, BattleConfig, Phase};
use battle_runtime::{
    BattleRuntime, ContentProvider, Encounter, LocalRaidLedger, RuntimeConfig,
};

use autoplay::AutoPlayer;
use config::CliConfig;

struct Content {
    battle: BattleConfig,
    abilities: AbilityCatalog,
    encounters: EncounterTable,
}

impl Content {
    fn load(cli: &CliConfig) -> Result<Self> {
        match &cli.data_dir {
            Some(dir) => {
                let factory = ContentFactory::new(dir);
                Ok(Self {
                    battle: factory.load_config()?,
                    abilities: factory.load_abilities()?,
                    encounters: factory.load_encounters()?,
                })
            }
            None => Ok(Self {
                battle: embedded::battle_config()?,
                abilities: embedded::ability_catalog()?,
                encounters: embedded::encounter_table()?,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = CliConfig::from_env();
    let content = Content::load(&cli).context("failed to load battle content")?;
    tracing::info!(
        abilities = content.abilities.len(),
        encounters = content.encounters.encounters.len(),
        raids = content.encounters.raids.len(),
        "content loaded"
    );

    let runtime_config = RuntimeConfig::from_env().with_battle(content.battle.clone());
    let mut builder = BattleRuntime::builder()
        .config(runtime_config)
        .catalog(content.abilities)
        .user_id(cli.user_id.clone());

    builder = match &cli.raid {
        Some(raid_id) => {
            let boss = content
                .encounters
                .raid(raid_id)
                .with_context(|| format!("unknown raid '{raid_id}'"))?;
            let ledger = Arc::new(LocalRaidLedger::new());
            ledger.open_raid(raid_id.clone(), boss.hp).await;
            builder
                .raid_channel(ledger)
                .encounter(Encounter::raid(raid_id.clone()))
        }
        None => builder.encounter(Encounter::standalone(cli.encounter.clone())),
    };

    let runtime = builder
        .provider(ContentProvider::new(content.encounters))
        .build()
        .await?;

    let result = AutoPlayer::new(runtime.handle(), cli.autoplay.clone(), &content.battle)
        .run()
        .await;
    runtime.shutdown().await?;

    match result? {
        Phase::Victory => println!("\nVictory!"),
        _ => println!("\nThe party has fallen."),
    }
    Ok(())
}
