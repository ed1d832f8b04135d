mod config;
mod plan_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use studyplan_core::FillPolicy;

use config::StudyplanConfig;
use plan_cmd::{OutputFormat, PlanArgs};
use serve_cmd::AppState;

#[derive(Parser)]
#[command(name = "studyplan", about = "Spread learning topics across a day-by-day study schedule")]
struct Cli {
    /// IANA time zone used to resolve "today" (overrides STUDYPLAN_TIMEZONE)
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default studyplan config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a schedule and print it
    Plan {
        /// Comma-separated topics, e.g. "Lists, Tuples, Sets"
        #[arg(long, conflicts_with = "topic")]
        topics: Option<String>,
        /// A single topic; repeat to build an ordered list
        #[arg(long)]
        topic: Vec<String>,
        /// Number of days to spread the topics over
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
        /// Study hours budgeted per day (default from config, else 2)
        #[arg(long, allow_negative_numbers = true)]
        hours_per_day: Option<i64>,
        /// First day of the schedule as YYYY-MM-DD (default: today)
        #[arg(long)]
        start_date: Option<String>,
        /// What to do with leftover days: pad_with_empty_days or cycle_topics
        #[arg(long)]
        fill_policy: Option<FillPolicy>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Serve the schedule generator over HTTP
    Serve {
        /// Address to bind (default from config, else 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default from config, else 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Execute the `studyplan init` command: write config file.
fn cmd_init(timezone: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    if let Some(tz) = timezone {
        config::parse_timezone(tz)?;
        cfg.schedule.timezone = tz.trim().to_string();
    }

    config::save_config(&cfg, &path)?;

    println!("Config written to {}", path.display());
    println!("  schedule.hours_per_day = {}", cfg.schedule.hours_per_day);
    println!("  schedule.fill_policy = {}", cfg.schedule.fill_policy);
    println!("  schedule.timezone = {}", cfg.schedule.timezone);
    println!("  server = {}:{}", cfg.server.bind, cfg.server.port);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli.timezone.as_deref(), force)?;
        }
        Commands::Plan {
            topics,
            topic,
            days,
            hours_per_day,
            start_date,
            fill_policy,
            format,
        } => {
            let resolved = StudyplanConfig::resolve(cli.timezone.as_deref())?;
            let args = PlanArgs {
                topics,
                topic,
                days,
                hours_per_day,
                start_date,
                fill_policy,
            };
            plan_cmd::run_plan(&resolved, args, format)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = StudyplanConfig::resolve(cli.timezone.as_deref())?;
            let bind = bind.unwrap_or_else(|| resolved.server.bind.clone());
            let port = port.unwrap_or(resolved.server.port);
            let state = AppState {
                defaults: resolved.defaults,
                timezone: resolved.timezone,
            };
            serve_cmd::run_serve(state, &bind, port).await?;
        }
    }

    Ok(())
}
