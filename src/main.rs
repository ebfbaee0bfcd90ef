use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use training_journal::commands::{coach, entries, health, parse_date, profile};
use training_journal::models::{CheckIn, Decision, Entry, GoalCategory, Mood, ProfileUpdate, SupportStyle, WorkoutType};
use training_journal::sync::SyncReport;
use training_journal::{logging, Clock, Journal, JournalConfig, JournalError, SqliteStore, SystemClock};

#[derive(Parser)]
#[command(
  name = "training-journal",
  about = "Daily training journal",
  long_about = "Import Apple Health exports, keep a training log, and get a rule-based plan for today."
)]
struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Database path or sqlite URL (overrides TRAINING_JOURNAL_DB)
  #[arg(long, global = true)]
  db: Option<String>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  verbose: bool,
}

#[derive(Subcommand)]
enum Command {
  /// Import an Apple Health export.xml (replaces previously imported data)
  Import { file: PathBuf },

  /// Show what the startup health -> log sync did, plus the auto-log status
  Sync,

  /// Save a manual entry for a day
  Log(LogArgs),

  /// Read or write the note for a day
  Note {
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Text to store; omit to print the current note
    text: Option<String>,
  },

  /// Suggest a plan for today
  Suggest(SuggestArgs),

  /// Trend stats and the health summary for a date
  Insights {
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
  },

  /// Recent log rows, newest first
  History,

  /// Show or edit the profile
  Profile {
    #[command(subcommand)]
    action: ProfileCommand,
  },
}

#[derive(Args)]
struct LogArgs {
  #[arg(long, value_parser = parse_date)]
  date: Option<NaiveDate>,

  /// Record a rest day (default is an exercise day)
  #[arg(long)]
  rest: bool,

  #[arg(long = "type", default_value = "cardio")]
  workout_type: WorkoutType,

  #[arg(long, default_value_t = 0.0)]
  minutes: f64,

  #[arg(long)]
  intensity: Option<f64>,

  #[arg(long)]
  sleep: Option<f64>,

  #[arg(long)]
  energy: Option<f64>,

  #[arg(long)]
  soreness: Option<f64>,

  #[arg(long, default_value = "")]
  notes: String,
}

#[derive(Args)]
struct SuggestArgs {
  /// Ask for a rest-day plan instead of a workout
  #[arg(long)]
  rest: bool,

  #[arg(long, value_parser = parse_date)]
  date: Option<NaiveDate>,

  #[arg(long)]
  sleep: Option<f64>,

  #[arg(long)]
  energy: Option<f64>,

  #[arg(long)]
  soreness: Option<f64>,

  #[arg(long, default_value = "neutral")]
  mood: Mood,

  /// 1-10
  #[arg(long, default_value_t = 5.0)]
  motivation: f64,
}

#[derive(Subcommand)]
enum ProfileCommand {
  Show,
  Set {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    goal: Option<String>,

    /// look_fit | half_marathon | gain_muscle | general
    #[arg(long)]
    category: Option<GoalCategory>,

    /// encouraging | calm | direct
    #[arg(long)]
    style: Option<SupportStyle>,
  },
}

#[tokio::main]
async fn main() -> ExitCode {
  dotenvy::dotenv().ok();

  let cli = Cli::parse();
  let (mut config, rejected) = JournalConfig::from_env_checked();
  if let Some(db) = cli.db.clone() {
    config.database = db;
  }

  logging::init_logging(config.log_json, if cli.verbose { "debug" } else { "info" });
  for var in &rejected {
    var.log();
  }

  match run(cli, &config).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed");
      eprintln!("Error: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli, config: &JournalConfig) -> Result<(), JournalError> {
  let store = SqliteStore::connect(&config.database).await?;
  let journal = Journal::new(store);
  let clock = SystemClock;

  // Startup sync, so every command sees a log consistent with stored health data
  let startup_sync = entries::sync_entries(&journal).await?;

  let result = dispatch(cli.command, &journal, &clock, config, startup_sync).await;
  journal.store().close().await;
  result
}

async fn dispatch(
  command: Command,
  journal: &Journal<SqliteStore>,
  clock: &dyn Clock,
  config: &JournalConfig,
  startup_sync: SyncReport,
) -> Result<(), JournalError> {
  let window_days = config.window_days;

  match command {
    Command::Import { file } => {
      let summary = health::import_health_file(journal, &file).await?;
      println!("{}", summary.status);
      println!("{}", summary.auto_log_status);
    }

    Command::Sync => {
      println!("{}", entries::auto_log_status_text(journal, Some(startup_sync)).await?);
    }

    Command::Log(args) => {
      let date = args.date.unwrap_or_else(|| clock.today());
      let entry = Entry {
        did_exercise: !args.rest,
        workout_type: if args.rest { WorkoutType::Rest } else { args.workout_type },
        duration_min: if args.rest { 0.0 } else { args.minutes.max(0.0) },
        intensity: args.intensity,
        sleep_hours: args.sleep,
        energy: args.energy,
        soreness: args.soreness,
        notes: args.notes,
        ..Entry::new(date)
      };
      let replaced = entries::log_entry(journal, entry).await?;
      println!("{} entry for {}.", if replaced { "Updated" } else { "Saved" }, date);
    }

    Command::Note { date, text } => {
      let date = date.unwrap_or_else(|| clock.today());
      match text {
        Some(text) => {
          entries::save_note(journal, date, &text).await?;
          println!("Note saved for {}.", date);
        }
        None => println!("{}", entries::note_for_date(journal, date).await?),
      }
    }

    Command::Suggest(args) => {
      let decision = if args.rest { Decision::Rest } else { Decision::Exercise };
      let check_in = CheckIn {
        date: args.date,
        sleep_hours: args.sleep,
        energy: args.energy,
        soreness: args.soreness,
        mood: args.mood,
        motivation: args.motivation,
      };
      let response = coach::recommend(journal, clock, decision, &check_in, window_days).await?;
      println!("{}", response.suggestion_line);
      println!("{}", response.coach_message);
      println!("{}", response.stats_line);
    }

    Command::Insights { date } => {
      let insights = coach::insights(journal, clock, date, window_days).await?;
      println!("{}", training_journal::coach::stats_line(&insights));
      println!("{}", health::health_insight(journal, clock, date, window_days).await?);
    }

    Command::History => {
      let rows = entries::history(journal).await?;
      if rows.is_empty() {
        println!("No history yet.");
      }
      for row in rows {
        println!(
          "{}  {:<3}  {:<8}  {:>4} min  sleep {:>2}  energy {:>2}  soreness {:>2}  {:<8}  steps {}",
          row.date,
          if row.exercised { "yes" } else { "no" },
          row.workout_type,
          row.duration,
          row.sleep,
          row.energy,
          row.soreness,
          row.source.as_str(),
          row.steps
        );
      }
    }

    Command::Profile { action } => {
      let current = match action {
        ProfileCommand::Show => profile::get_profile(journal).await?,
        ProfileCommand::Set {
          name,
          goal,
          category,
          style,
        } => {
          let update = ProfileUpdate {
            name,
            goal,
            goal_category: category,
            support_style: style,
          };
          if update.is_empty() {
            return Err(JournalError::InvalidInput(
              "profile set needs at least one of --name, --goal, --category, --style".to_string(),
            ));
          }
          profile::update_profile(journal, update).await?
        }
      };
      println!("{}", current.headline());
      println!("{}", current.focus_line());
    }
  }

  Ok(())
}
