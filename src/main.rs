use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DB_PATH, DEFAULT_LOG_DATA, DEFAULT_SONG_DATA,
};
use sparkify_etl::extract::DEFAULT_DATA_EXTENSION;
use sparkify_etl::{LoadCoordinator, SqliteWarehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolves `s` to an absolute path; the path itself does not have to exist yet.
fn parse_path(s: &str) -> Result<PathBuf> {
    let path = PathBuf::from(s);
    let resolved = match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => path,
        Err(err) => return Err(err).with_context(|| format!("Error resolving path: {}", s)),
    };
    if resolved.is_absolute() {
        return Ok(resolved);
    }
    Ok(std::env::current_dir()?.join(resolved))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song catalog and activity logs into the Sparkify star schema")]
struct CliArgs {
    /// Path to the SQLite warehouse database file.
    #[clap(long = "db", value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Root directory of the song catalog files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA)]
    pub song_data: PathBuf,

    /// Root directory of the activity log files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA)]
    pub log_data: PathBuf,

    /// Extension of the data files to load.
    #[clap(long, default_value = DEFAULT_DATA_EXTENSION)]
    pub extension: String,

    /// Optional TOML config file; its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            data_extension: self.extension.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Sparkify ETL");
    info!("Warehouse: {}", config.db_path.display());
    info!("Song data: {}", config.song_data.display());
    info!("Log data: {}", config.log_data.display());

    let mut warehouse = SqliteWarehouse::open(&config.db_path).with_context(|| {
        format!(
            "Failed to open warehouse database {}",
            config.db_path.display()
        )
    })?;

    let report = {
        let mut coordinator = LoadCoordinator::from_config(&mut warehouse, &config);
        coordinator
            .run(&config.song_data, &config.log_data)
            .context("ETL run aborted")?
    };

    info!("");
    info!("Run Summary");
    info!("===========");
    report.log_summary();

    let counts = warehouse.get_counts()?;
    info!("");
    info!("Warehouse contains:");
    info!("  {} artists", counts.artists);
    info!("  {} songs", counts.songs);
    info!("  {} time rows", counts.time);
    info!("  {} users", counts.users);
    info!("  {} songplays", counts.songplays);

    if report.files_failed() > 0 {
        warn!("{} files failed to load.", report.files_failed());
    }
    if report.entries_unreadable() > 0 {
        warn!("{} entries could not be read.", report.entries_unreadable());
    }
    if report.files_failed() == 0 && report.entries_unreadable() == 0 {
        info!("All files loaded successfully!");
    }

    Ok(())
}
