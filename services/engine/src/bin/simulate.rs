//! Offline session simulator: runs an auto-play session against a seeded
//! game source and the configured durable storage, then reports the
//! session summary. Useful for eyeballing payout distributions without a
//! node or a UI.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine::autoplay::{AutoPlayController, AutoPlaySettings};
use engine::config::Config;
use engine::forms::AutoPlayForm;
use engine::games::mines::MinesGame;
use engine::games::plinko::{PlinkoGame, PlinkoRisk};
use engine::games::wheel::{WheelGame, WheelRisk};
use engine::games::OutcomeSource;
use engine::ledger::storage::FileStorage;
use engine::ledger::BalanceStore;
use engine::settlement::SettlementFlow;
use shared::GameKind;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "engine=info,simulate=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let game: GameKind = env_or("SIM_GAME", "wheel").parse()?;
    let seed: u64 = env_or("SIM_SEED", "42").parse()?;
    let starting_balance: i64 = env_or("SIM_STARTING_BALANCE", "10000000000").parse()?;

    let form = AutoPlayForm {
        wager_subunits: env_or("SIM_WAGER_SUBUNITS", "100000000").parse()?,
        rounds: env_or("SIM_ROUNDS", "100").parse()?,
        on_win: env_or("SIM_ON_WIN", "Reset"),
        on_loss: env_or("SIM_ON_LOSS", "Reset"),
        stop_profit_units: env_or("SIM_STOP_PROFIT", ""),
        stop_loss_units: env_or("SIM_STOP_LOSS", ""),
    };
    let settings: AutoPlaySettings =
        form.into_settings(game, Duration::from_millis(0))?;

    let mut source: Box<dyn OutcomeSource> = match game {
        GameKind::Wheel => Box::new(WheelGame::with_seed(
            env_or("SIM_WHEEL_SEGMENTS", "10").parse()?,
            WheelRisk::Medium,
            seed,
        )?),
        GameKind::Mines => Box::new(MinesGame::with_seed(
            env_or("SIM_MINES", "5").parse()?,
            env_or("SIM_REVEALS", "3").parse()?,
            seed,
        )?),
        GameKind::Plinko => Box::new(PlinkoGame::with_seed(
            env_or("SIM_PLINKO_ROWS", "16").parse()?,
            PlinkoRisk::Medium,
            seed,
        )?),
    };

    let mut ledger = BalanceStore::open(FileStorage::open(&config.storage_path)?);
    ledger.set_balance(starting_balance);
    let mut flow = SettlementFlow::new(ledger);

    tracing::info!(
        %game,
        rounds = settings.rounds,
        wager = settings.initial_wager.as_u64(),
        balance = flow.ledger().balance().as_u64(),
        "Starting simulated session"
    );

    let controller = AutoPlayController::new(settings);
    let summary = controller
        .run(&mut flow, source.as_mut(), CancellationToken::new())
        .await?;

    let stats = flow.history().stats();
    tracing::info!(
        status = ?summary.status,
        rounds_played = summary.rounds_played,
        profit_subunits = summary.profit,
        total_wagered = stats.total_wagered,
        biggest_payout = stats.biggest_payout,
        final_balance = flow.ledger().balance().as_u64(),
        "Session finished"
    );

    Ok(())
}
