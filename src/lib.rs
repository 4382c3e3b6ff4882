pub mod cli;
pub mod coach;
pub mod db;
pub mod decisions;
pub mod habits;
pub mod models;
pub mod settings;
pub mod storage;
pub mod today;
pub mod utils;
pub mod weekly;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use db::Database;
use decisions::DecisionJournal;
use habits::HabitTracker;
use settings::SettingsStore;
use storage::Storage;
use today::TodayController;
use weekly::WeeklyPlanner;

const DATABASE_FILE: &str = "pathfinder.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub settings: SettingsStore,
    pub today: TodayController,
    pub decisions: DecisionJournal,
    pub weekly: WeeklyPlanner,
    pub habits: HabitTracker,
}

impl AppState {
    /// Open (or create) the database and settings under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(DATABASE_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        Ok(Self::with_storage(Arc::new(database), settings))
    }

    /// Wire the page controllers over any storage backend.
    pub fn with_storage(storage: Arc<dyn Storage>, settings: SettingsStore) -> Self {
        let limits = settings.limits();

        Self {
            today: TodayController::new(storage.clone(), limits.pulses),
            decisions: DecisionJournal::new(storage.clone(), limits.decisions),
            weekly: WeeklyPlanner::new(storage.clone(), limits.weekly_plans),
            habits: HabitTracker::new(storage.clone(), limits.habits, settings.habit_defaults()),
            storage,
            settings,
        }
    }
}

/// `--data-dir`, then `PATHFINDER_DATA_DIR`, then the platform data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| dirs::data_dir().map(|dir| dir.join("pathfinder")))
        .unwrap_or_else(|| PathBuf::from(".pathfinder"))
}

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    utils::logging::init(cli.verbose);
    log::debug!("Pathfinder starting up...");

    let data_dir = resolve_data_dir(cli.data_dir.clone());
    let state = AppState::open(&data_dir)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(cli::dispatch(cli, &state))
}
