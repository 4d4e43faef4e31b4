mod output;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use socdash_core::{AppConfig, Platform};
use socdash_ingest::PostTable;
use socdash_metrics::{
    render, resolve_period, resolve_range, summarize, ActiveView, RenderOptions, Session,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "socdash-cli")]
#[command(about = "Social post performance dashboards")]
struct Cli {
    /// Dataset platform (linkedin or instagram); overrides `SOCDASH_PLATFORM`
    #[arg(long, global = true)]
    platform: Option<Platform>,
    /// CSV export to load; overrides the profile's path
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// YAML file with custom dataset profiles
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,
    /// Profile name to pick from the profiles file
    #[arg(long, global = true)]
    profile: Option<String>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print headline totals for the dataset
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the views available for the platform
    Views,
    /// Render one dashboard view
    View {
        /// View name, e.g. `top_companies` or `posts-per-day`
        name: ActiveView,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Generate a markdown report covering every view
    Report {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Date filters shared by the rendering commands.
#[derive(Debug, Default, Args)]
struct FilterArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Year for the posts-per-day view
    #[arg(long)]
    year: Option<i32>,
    /// Month (1-12) for the posts-per-day view
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

impl Cli {
    /// Command-line flags take precedence over environment configuration.
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = Some(dataset.clone());
        }
        if let Some(profiles) = &self.profiles {
            config.profiles_path = Some(profiles.clone());
        }
        if let Some(profile) = &self.profile {
            config.profile_name = Some(profile.clone());
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = socdash_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.apply_overrides(config);
    let options = RenderOptions {
        top_k: config.top_k,
        histogram_bins: config.histogram_bins,
    };

    if matches!(cli.command, Commands::Views) {
        let platform = profile_platform(&config)?;
        let views = ActiveView::for_platform(platform);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(views)?);
        } else {
            output::write_views(&mut std::io::stdout().lock(), platform, views)?;
        }
        return Ok(());
    }

    let table = load_table(&config)?;

    match &cli.command {
        Commands::Summary { filter } => {
            let session = build_session(&table, None, filter)?;
            let filtered = match &session.range {
                Some(range) => socdash_metrics::filter_by_range(&table, range),
                None => table,
            };
            let summary = summarize(&filtered);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::write_summary(&mut std::io::stdout().lock(), &summary, session.range)?;
            }
        }
        Commands::View { name, filter } => {
            let session = build_session(&table, Some(*name), filter)?;
            let dashboard = render(&session, &table, options);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                output::write_dashboard(&mut std::io::stdout().lock(), &dashboard)?;
            }
        }
        Commands::Report { filter } => {
            let session = build_session(&table, None, filter)?;
            report::write_report(
                &mut std::io::stdout().lock(),
                &table,
                &session,
                options,
                Utc::now(),
            )?;
        }
        Commands::Views => {}
    }

    Ok(())
}

/// Platform of the profile `config` selects, without reading its CSV.
///
/// # Errors
///
/// Returns an error if the profile cannot be resolved.
fn profile_platform(config: &AppConfig) -> anyhow::Result<Platform> {
    Ok(socdash_core::resolve_profile(config)?.platform)
}

/// Resolves the dataset profile and loads its CSV.
///
/// # Errors
///
/// Returns an error if the profile cannot be resolved or the file cannot be
/// loaded.
fn load_table(config: &AppConfig) -> anyhow::Result<PostTable> {
    let profile = socdash_core::resolve_profile(config)?;
    tracing::debug!(profile = %profile.name, path = %profile.path.display(), "loading dataset");
    socdash_ingest::load_dataset(&profile, Utc::now())
        .with_context(|| format!("failed to load {} dataset", profile.platform))
}

/// Builds a session for the table's platform with the requested view and
/// filters applied.
///
/// # Errors
///
/// Returns an error if the view belongs to another platform or the filters
/// are invalid.
fn build_session(
    table: &PostTable,
    view: Option<ActiveView>,
    filter: &FilterArgs,
) -> anyhow::Result<Session> {
    let mut session = Session::new(table.platform);
    if let Some(view) = view {
        session.select(view)?;
    }
    session.set_range(resolve_range(table, filter.start, filter.end)?);
    session.set_period(resolve_period(table, filter.year, filter.month)?);
    Ok(session)
}
