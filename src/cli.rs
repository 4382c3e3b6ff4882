//! Command-line surface over the four pages.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::{
    coach::Suggestion,
    decisions::RECENT_DECISIONS,
    habits::{handoff, SeedOutcome},
    models::{DailyPulse, DecisionDraft, DecisionGuidanceInput, Habit, Rating, WeeklySummary},
    settings::{HabitDefaults, UserSettings},
    utils::dates::{self, days_left, parse_iso_date},
    AppState,
};

#[derive(Debug, Parser)]
#[command(
    name = "pathfinder",
    version,
    about = "Daily pulse, decision journal, weekly plan and habits, stored locally"
)]
pub struct Cli {
    /// Directory holding the database and settings
    #[arg(long, env = "PATHFINDER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug-level logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long = "as-of", global = true, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Daily check-in and best move
    #[command(subcommand)]
    Today(TodayCommand),
    /// Decision journal
    #[command(subcommand)]
    Decisions(DecisionsCommand),
    /// Automatic weekly plan
    #[command(subcommand)]
    Weekly(WeeklyCommand),
    /// Habits with due dates
    #[command(subcommand)]
    Habits(HabitsCommand),
    /// History caps and habit due defaults
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct PulseArgs {
    /// Energy, 1 (very low) to 5 (very high)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub energy: u8,
    /// Calm, 1 (high stress) to 5 (calm)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub calm: u8,
    /// Mood, 1 to 5
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub mood: u8,
    /// Focus, 1 to 5
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub focus: u8,
    /// Date of the check-in (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

impl PulseArgs {
    fn to_pulse(&self, today: NaiveDate) -> Result<DailyPulse> {
        Ok(DailyPulse {
            date: self.date.unwrap_or(today),
            energy: Rating::new(self.energy)?,
            calm: Rating::new(self.calm)?,
            mood: Rating::new(self.mood)?,
            focus: Rating::new(self.focus)?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum TodayCommand {
    /// Show today's stored pulse (or a neutral draft) and its best move
    Show,
    /// Best move for the given ratings without saving
    Preview(PulseArgs),
    /// Save the check-in; replaces any earlier one for the same date
    Save(PulseArgs),
    /// List stored check-ins, most recent first
    History {
        #[arg(short = 'n', long, default_value_t = 7)]
        limit: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum DecisionsCommand {
    /// Log a decision
    Add {
        /// The decision, e.g. "accept role / stay / renegotiate"
        decision: String,
        /// Options, comma-separated
        #[arg(long, default_value = "")]
        options: String,
        /// Key assumptions / what would change your mind
        #[arg(long, default_value = "")]
        assumptions: String,
        /// One concrete next step
        #[arg(long, default_value = "")]
        next_action: String,
    },
    /// Show recent decisions
    List {
        #[arg(short = 'n', long, default_value_t = RECENT_DECISIONS)]
        limit: usize,
    },
    /// Rule-based guidance for a pending decision
    Guide {
        title: String,
        #[arg(long, default_value = "general")]
        domain: String,
        /// How easy it is to undo, e.g. "easy", "medium", "hard"
        #[arg(long, default_value = "medium")]
        reversibility: String,
        /// Confidence 0-100
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        confidence: u8,
        #[arg(long, default_value = "")]
        assumption: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum WeeklyCommand {
    /// Summary of the last 7 check-ins with the suggested plan
    Show,
    /// Confirm this week's plan; omit --habit to keep the proposals
    Confirm {
        #[arg(long = "habit")]
        habits: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HabitsCommand {
    /// List habits by due date
    List,
    /// Add a habit by hand
    Add {
        text: String,
        /// Due date (defaults to a few days out)
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
    },
    /// Add the habit carried by a hand-off link (`/habits?seed=…&due=…&sid=…`)
    Open { link: String },
    /// Toggle today's completion
    Done { id: String },
    /// Delete a habit
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings and write them to settings.json
    Set(SettingsArgs),
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Check-ins kept
    #[arg(long)]
    pub pulses: Option<usize>,
    /// Decisions kept
    #[arg(long)]
    pub decisions: Option<usize>,
    /// Weekly plans kept
    #[arg(long)]
    pub weekly_plans: Option<usize>,
    /// Habits kept
    #[arg(long)]
    pub habits: Option<usize>,
    /// Days until a hand-added habit is due
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=HabitDefaults::MAX_DUE_DAYS))]
    pub manual_due_days: Option<i64>,
    /// Days until a seeded habit without a date is due
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=HabitDefaults::MAX_DUE_DAYS))]
    pub seed_due_days: Option<i64>,
}

impl SettingsArgs {
    fn apply(self, settings: &mut UserSettings) {
        let limits = &mut settings.limits;
        limits.pulses = self.pulses.unwrap_or(limits.pulses);
        limits.decisions = self.decisions.unwrap_or(limits.decisions);
        limits.weekly_plans = self.weekly_plans.unwrap_or(limits.weekly_plans);
        limits.habits = self.habits.unwrap_or(limits.habits);

        let habits = &mut settings.habits;
        habits.manual_due_days = self.manual_due_days.unwrap_or(habits.manual_due_days);
        habits.seed_due_days = self.seed_due_days.unwrap_or(habits.seed_due_days);
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).map_err(|err| err.to_string())
}

fn emit<T, F>(json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("failed to encode output")?
        );
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn render_summary(summary: &WeeklySummary) -> String {
    format!(
        "{} day(s): energy {:.1} · calm {:.1} · mood {:.1} · focus {:.1}",
        summary.count_days, summary.avg_energy, summary.avg_calm, summary.avg_mood, summary.avg_focus
    )
}

fn saved_status(saved: bool, done: &str) -> String {
    if saved {
        done.to_string()
    } else {
        "Not saved: storage unavailable.".to_string()
    }
}

fn render_settings(settings: &UserSettings) -> String {
    let limits = &settings.limits;
    format!(
        "Keep: {} check-ins · {} decisions · {} weekly plans · {} habits\nHabits due: {} day(s) when added by hand, {} day(s) from a suggestion",
        limits.pulses,
        limits.decisions,
        limits.weekly_plans,
        limits.habits,
        settings.habits.manual_due_days,
        settings.habits.seed_due_days
    )
}

fn render_pulse(pulse: &DailyPulse) -> String {
    format!(
        "{}  energy {} ({}) · calm {} ({}) · mood {} ({}) · focus {} ({})",
        pulse.date,
        pulse.energy,
        pulse.energy.label(),
        pulse.calm,
        pulse.calm.label(),
        pulse.mood,
        pulse.mood.label(),
        pulse.focus,
        pulse.focus.label()
    )
}

fn render_suggestion(suggestion: &Suggestion) -> String {
    let rec = &suggestion.recommendation;
    format!(
        "Today's best move: {}\n  {}\n  1) {}\n  2) {}\n  {}\nRecent average, {}",
        rec.title,
        rec.primary_action,
        rec.micro_steps.0,
        rec.micro_steps.1,
        rec.rationale,
        render_summary(&suggestion.recent)
    )
}

fn render_habit(habit: &Habit, today: NaiveDate) -> String {
    let left = days_left(habit.due, today);
    let remaining = if left >= 0 {
        format!("{left} day(s) left")
    } else {
        format!("{} day(s) overdue", left.abs())
    };
    let done = if habit.is_done_on(today) { "[x]" } else { "[ ]" };
    format!(
        "{done} {}  due {} ({remaining})  id {}",
        habit.text, habit.due, habit.id
    )
}

pub async fn dispatch(cli: Cli, state: &AppState) -> Result<()> {
    let today = cli.as_of.unwrap_or_else(dates::today);
    let json = cli.json;

    match cli.command {
        Command::Today(command) => run_today(command, state, today, json).await,
        Command::Decisions(command) => run_decisions(command, state, today, json).await,
        Command::Weekly(command) => run_weekly(command, state, today, json).await,
        Command::Habits(command) => run_habits(command, state, today, json).await,
        Command::Settings(command) => run_settings(command, state, json),
    }
}

async fn run_today(
    command: TodayCommand,
    state: &AppState,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    match command {
        TodayCommand::Show => {
            let view = state.today.load(today).await?;
            emit(json, &view, || {
                let status = if view.already_checked_in {
                    "checked in"
                } else {
                    "not checked in yet"
                };
                format!(
                    "{} ({status})\n\n{}\n\nAdd micro-step #1 as a habit:\n  pathfinder habits open '{}'",
                    render_pulse(&view.draft),
                    render_suggestion(&view.suggestion),
                    view.habit_link
                )
            })
        }
        TodayCommand::Preview(args) => {
            let pulse = args.to_pulse(today)?;
            let suggestion = state.today.preview(&pulse).await;
            emit(json, &suggestion, || render_suggestion(&suggestion))
        }
        TodayCommand::Save(args) => {
            let pulse = args.to_pulse(today)?;
            let outcome = state.today.save(pulse, today).await?;
            emit(json, &outcome, || {
                let status = if outcome.saved {
                    "Saved."
                } else {
                    "Not saved: storage unavailable."
                };
                format!(
                    "{status}\n{}\n\n{}\n\nTurn this into a habit (due tomorrow):\n  pathfinder habits open '{}'",
                    render_pulse(&outcome.pulse),
                    render_suggestion(&outcome.suggestion),
                    outcome.habit_link
                )
            })
        }
        TodayCommand::History { limit } => {
            let history: Vec<_> = state.today.history().await.into_iter().take(limit).collect();
            emit(json, &history, || {
                if history.is_empty() {
                    "No check-ins yet.".to_string()
                } else {
                    history.iter().map(render_pulse).collect::<Vec<_>>().join("\n")
                }
            })
        }
    }
}

async fn run_decisions(
    command: DecisionsCommand,
    state: &AppState,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    match command {
        DecisionsCommand::Add {
            decision,
            options,
            assumptions,
            next_action,
        } => {
            let draft = DecisionDraft {
                id: None,
                decision,
                options,
                assumptions,
                next_action,
            };
            let submitted = state.decisions.submit(draft, today).await?;
            emit(json, &submitted, || {
                let status = saved_status(submitted.saved, "Saved.");
                format!(
                    "{status} Decision {}. Next: pathfinder weekly show",
                    submitted.record.id
                )
            })
        }
        DecisionsCommand::List { limit } => {
            let decisions = state.decisions.recent(limit).await;
            emit(json, &decisions, || {
                if decisions.is_empty() {
                    return "No decisions yet.".to_string();
                }
                decisions
                    .iter()
                    .map(|d| {
                        if d.next_action.is_empty() {
                            format!("{}  {}", d.date, d.decision)
                        } else {
                            format!("{}  {}\n    Next: {}", d.date, d.decision, d.next_action)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        DecisionsCommand::Guide {
            title,
            domain,
            reversibility,
            confidence,
            assumption,
        } => {
            let input = DecisionGuidanceInput {
                title,
                domain,
                reversibility,
                confidence,
                assumption,
            };
            let guidance = state.decisions.guide(&input);
            emit(json, &guidance, || {
                format!(
                    "{}\n{}\nGuardrail: {}\n{}",
                    guidance.headline, guidance.next_step, guidance.guardrail, guidance.note
                )
            })
        }
    }
}

async fn run_weekly(
    command: WeeklyCommand,
    state: &AppState,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    match command {
        WeeklyCommand::Show => {
            let draft = state.weekly.draft(today).await;
            emit(json, &draft, || {
                let habits = draft
                    .habits
                    .iter()
                    .enumerate()
                    .map(|(idx, habit)| format!("  {}. {habit}", idx + 1))
                    .collect::<Vec<_>>()
                    .join("\n");
                let saved = match &draft.saved {
                    Some(plan) if plan.confirmed => {
                        format!("\nSaved for week starting {}.", plan.week_start)
                    }
                    _ => String::new(),
                };
                format!(
                    "Week of {}\nLast 7 days, {}\n\nSuggested weekly best move:\n  {}\n\nHabits:\n{habits}{saved}",
                    draft.week_start,
                    render_summary(&draft.summary),
                    draft.best_move
                )
            })
        }
        WeeklyCommand::Confirm { habits } => {
            let plan = state.weekly.confirm(habits, today).await;
            emit(json, &plan, || {
                format!(
                    "{} Weekly plan for week starting {}. Next: pathfinder habits list",
                    saved_status(plan.saved, "Saved."),
                    plan.record.week_start
                )
            })
        }
    }
}

async fn run_habits(
    command: HabitsCommand,
    state: &AppState,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    match command {
        HabitsCommand::List => {
            let habits = state.habits.upcoming().await;
            emit(json, &habits, || {
                if habits.is_empty() {
                    "No habits yet.".to_string()
                } else {
                    habits
                        .iter()
                        .map(|habit| render_habit(habit, today))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            })
        }
        HabitsCommand::Add { text, due } => {
            let added = state.habits.add(&text, due, today).await;
            emit(json, &added, || match &added {
                Some(habit) => format!(
                    "{}\n{}",
                    saved_status(habit.saved, "Added."),
                    render_habit(&habit.record, today)
                ),
                None => "Nothing added: habit text is empty.".to_string(),
            })
        }
        HabitsCommand::Open { link } => {
            let seed = handoff::parse_link(&link)?;
            let outcome = state.habits.seed(&seed, today).await;
            emit(json, &outcome, || match &outcome {
                SeedOutcome::Inserted(habit) => format!(
                    "{}\n{}",
                    saved_status(habit.saved, "Added."),
                    render_habit(&habit.record, today)
                ),
                SeedOutcome::Duplicate => "Already added from this suggestion.".to_string(),
                SeedOutcome::Ignored => "Nothing added: link has no seed text.".to_string(),
            })
        }
        HabitsCommand::Done { id } => {
            let habit = state.habits.toggle_done(&id, today).await?;
            emit(json, &habit, || {
                let line = render_habit(&habit.record, today);
                if habit.saved {
                    line
                } else {
                    format!("{}\n{line}", saved_status(false, ""))
                }
            })
        }
        HabitsCommand::Remove { id } => {
            let saved = state.habits.remove(&id).await?;
            let removed = serde_json::json!({ "id": id, "saved": saved });
            emit(json, &removed, || {
                format!("{} {id}", saved_status(saved, "Removed."))
            })
        }
    }
}

fn run_settings(command: SettingsCommand, state: &AppState, json: bool) -> Result<()> {
    let settings = match command {
        SettingsCommand::Show => state.settings.snapshot(),
        SettingsCommand::Set(args) => {
            let mut settings = state.settings.snapshot();
            args.apply(&mut settings);
            let stored = state.settings.update(settings)?;
            log::info!("settings written to {}", state.settings.path().display());
            stored
        }
    };
    emit(json, &settings, || render_settings(&settings))
}
