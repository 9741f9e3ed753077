use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use lessonbot_channel_telegram::TelegramPublisher;
use lessonbot_config::BotConfig;
use lessonbot_data::CsvDataLoader;
use lessonbot_schedule::{Scheduler, SchedulerConfig, compute_period};

#[derive(Parser)]
#[command(name = "lessonbot", about = "Class announcement bot for Telegram channels")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "lessonbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the announcement loop
    Run,
    /// Validate the configuration and today's schedule data, then exit
    Check,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = lessonbot_config::load_config_from(&cli.config)?;

    match cli.command {
        Commands::Run => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run(config))?;
        }
        Commands::Check => check(config)?,
    }

    Ok(())
}

fn scheduler_config(config: &BotConfig) -> SchedulerConfig {
    SchedulerConfig {
        number_of_periods: config.number_of_periods,
        period_duration: config.period_duration,
        start_of_first_period: config.start_of_first_period,
        subjects_path: config.subjects_dict_file_path.clone(),
        period_path_template: config.standard_period_file_path.clone(),
        timetable_path: config.time_table_file_path.clone(),
        channel_id: config.channel_id.clone(),
        reload_time: config.reload_time,
        on_delivery_error: config.on_delivery_error,
    }
}

async fn run(config: BotConfig) -> anyhow::Result<()> {
    let publisher = TelegramPublisher::new(&config.bot_token);
    publisher.authenticate().await?;

    let mut scheduler = Scheduler::new(
        scheduler_config(&config),
        Box::new(CsvDataLoader),
        Box::new(publisher),
    )?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_cancel.cancel();
        }
    });

    scheduler.run(cancel).await
}

fn check(config: BotConfig) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let period = compute_period(
        config.number_of_periods,
        config.period_duration,
        config.start_of_first_period,
        today,
    )?;

    let store = lessonbot_schedule::Scheduler::load_for_date(
        &scheduler_config(&config),
        &CsvDataLoader,
        today,
    )?;

    println!("configuration OK");
    println!("  channel: {}", config.channel_id);
    println!("  rotation period today: {period}");
    println!("  lesson slots today: {}", store.slot_count());
    println!("  subjects in catalog: {}", store.catalog().len());
    Ok(())
}
