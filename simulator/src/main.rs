use airlock_simulator::{ApiState, HarnessConfig, Scenario};
use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of simulated actors.
    #[arg(long)]
    actors: Option<usize>,

    /// Ticks to run before the scenario stops.
    #[arg(long)]
    ticks: Option<u64>,

    /// Milliseconds of scenario time per tick (must be > 0 when set).
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Seed for the deterministic action schedule.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick at which every actor registers an account.
    #[arg(long)]
    login_after_ticks: Option<u64>,

    /// First tick of an injected authority outage (inclusive).
    #[arg(long)]
    outage_from_tick: Option<u64>,

    /// Tick at which the injected outage ends (exclusive).
    #[arg(long)]
    outage_until_tick: Option<u64>,

    /// Bind address for the status API (disabled when omitted).
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) -> Result<()> {
    let level = tracing::Level::from_str(level)
        .with_context(|| format!("invalid log level: {level}"))?;
    tracing_subscriber::fmt().with_max_level(level).init();
    Ok(())
}

fn build_config(args: &Args) -> Result<HarnessConfig> {
    if let Some(0) = args.tick_interval_ms {
        anyhow::bail!("tick_interval_ms must be > 0 when set");
    }
    if let (Some(from), Some(until)) = (args.outage_from_tick, args.outage_until_tick) {
        if until <= from {
            anyhow::bail!("outage_until_tick must be greater than outage_from_tick");
        }
    }
    Ok(HarnessConfig {
        actors: args.actors,
        ticks: args.ticks,
        tick_interval_ms: args.tick_interval_ms,
        seed: args.seed,
        login_after_ticks: args.login_after_ticks,
        outage_from_tick: args.outage_from_tick,
        outage_until_tick: args.outage_until_tick,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = build_config(&args)?;
    info!(
        actors = config.actors(),
        ticks = config.ticks(),
        tick_interval_ms = config.tick_interval_ms(),
        seed = config.seed(),
        "starting scenario"
    );

    let scenario = Scenario::new(config);
    let gate = scenario.gate();

    let api_task = match args.listen {
        Some(addr) => {
            let router = airlock_simulator::router(ApiState { gate });
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind status api on {addr}"))?;
            info!(%addr, "status api listening");
            Some(tokio::spawn(async move {
                if let Err(err) = axum::serve(listener, router).await {
                    tracing::error!(error = %err, "status api failed");
                }
            }))
        }
        None => None,
    };

    let summary = tokio::task::spawn_blocking(move || scenario.run())
        .await
        .context("scenario task panicked")?;
    info!(
        evaluations = summary.evaluations,
        allowed = summary.allowed,
        denied = summary.denied,
        reminders_sent = summary.reminders_sent,
        authority_failures = summary.authority_failures,
        commands_executed = summary.commands_executed,
        chats_delivered = summary.chats_delivered,
        stacks_dropped = summary.stacks_dropped,
        stacks_restored = summary.stacks_restored,
        authenticated_at_end = summary.authenticated_at_end,
        "scenario complete"
    );

    if let Some(task) = api_task {
        info!("status api still serving; press ctrl-c to exit");
        tokio::signal::ctrl_c()
            .await
            .context("failed to wait for ctrl-c")?;
        task.abort();
    }
    Ok(())
}
