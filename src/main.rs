use anyhow::{Context, Result};
use battle_worms::game::{ApplePlacement, GameConfig, Ruleset};
use battle_worms::modes::HumanMode;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "battle_worms")]
#[command(version, about = "Two-player worm battle in the terminal")]
struct Cli {
    /// Rules to play under
    #[arg(long)]
    ruleset: Option<RulesetArg>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Number of apples on the board
    #[arg(long)]
    apples: Option<usize>,

    /// Ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for apple placement
    #[arg(long)]
    seed: Option<u64>,

    /// Keep new apples off worms and stones
    #[arg(long)]
    avoid_occupied: bool,

    /// JSON file with a game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RulesetArg {
    /// One worm
    Solo,
    /// Two worms, no bites or stones
    Duel,
    /// Two worms that bite and petrify each other
    Battle,
}

impl From<RulesetArg> for Ruleset {
    fn from(arg: RulesetArg) -> Self {
        match arg {
            RulesetArg::Solo => Ruleset::Solo,
            RulesetArg::Duel => Ruleset::Duel,
            RulesetArg::Battle => Ruleset::Battle,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(ruleset) = self.ruleset {
            config.ruleset = ruleset.into();
        }
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(apples) = self.apples {
            config.apple_count = apples;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_hz = tick_rate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.avoid_occupied {
            config.apple_placement = ApplePlacement::AvoidOccupied { max_attempts: 100 };
        }

        Ok(config)
    }
}

/// The terminal belongs to the TUI, so logs only go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}
