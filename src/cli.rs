use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "liftlog", version, about = "Local-first training journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Override "today" (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, global = true, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Debug diagnostics on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Ten years of daily points.
const MAX_VOLUME_DAYS: i64 = 3660;

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    liftlog::core::dates::parse_calendar_date(raw).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize profile and data directory
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Log a record
    Log {
        #[command(subcommand)]
        what: LogCommand,
    },

    /// Strength timeline grouped by month
    Sessions {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Progression of one exercise
    Progress {
        /// Exercise name (omit to list known exercises)
        exercise: Option<String>,
    },

    /// Daily tonnage for the recent window
    Volume {
        /// Window length in days (1-3660)
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=MAX_VOLUME_DAYS))]
        days: u32,
    },

    /// Cardio journal grouped by month
    Cardio,

    /// Nutrition journal
    Nutrition,

    /// Manage routines
    Routine {
        #[command(subcommand)]
        action: DefinitionAction,
    },

    /// Manage nutrient definitions
    Nutrient {
        #[command(subcommand)]
        action: DefinitionAction,
    },

    /// Manage cardio types
    CardioType {
        #[command(subcommand)]
        action: DefinitionAction,
    },

    /// Delete a record or definition (run twice to confirm)
    Delete {
        #[command(subcommand)]
        target: Option<DeleteTarget>,

        /// Disarm a pending deletion
        #[arg(long)]
        cancel: bool,
    },

    /// Export selected records to CSV
    Export {
        /// strength, cardio or nutrition
        view: String,

        /// Select everything visible
        #[arg(long)]
        all: bool,

        /// Select every visible item of a month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Select every visible item of a category (session or cardio type)
        #[arg(long)]
        category: Option<String>,

        /// Only show items matching this text
        #[arg(long)]
        search: Option<String>,

        /// Select individual items by id
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Write the CSV to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Import strength sets from an exported CSV file
    Import {
        /// Path to the CSV file
        file: String,
    },

    /// Ask the coach
    Coach {
        #[command(subcommand)]
        action: CoachAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Strength sets, e.g. `log set --session "Push A" --exercise Bench 60x8 70x8`
    Set {
        #[arg(long)]
        session: String,
        #[arg(long)]
        exercise: String,
        /// Sets as WEIGHTxREPS
        #[arg(required = true)]
        sets: Vec<String>,
    },

    /// A cardio session of a defined type
    Cardio {
        /// Cardio type name
        #[arg(long = "type")]
        cardio_type: String,
        #[arg(long, default_value_t = 0.0)]
        distance: f64,
        /// Minutes
        #[arg(long, default_value_t = 0.0)]
        duration: f64,
        #[arg(long, default_value_t = 0.0)]
        elevation: f64,
        #[arg(long)]
        heart_rate: Option<u32>,
        #[arg(long)]
        power: Option<u32>,
        #[arg(long)]
        cadence: Option<u32>,
        #[arg(long)]
        calories: Option<u32>,
        /// Interval segment, e.g. distance=0.4,duration=1.5,hr=165 (repeatable)
        #[arg(long = "interval")]
        intervals: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Perceived effort 1-10
        #[arg(long)]
        effort: u8,
    },

    /// Last night's sleep
    Sleep {
        #[arg(long)]
        score: u8,
        #[arg(long)]
        hours: f64,
    },

    /// Add to a nutrient's total for the day
    Nutrient {
        /// Nutrient id or name
        nutrient: String,
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum DefinitionAction {
    /// Add or replace a definition
    Add {
        name: String,
        /// Routine exercises, comma separated
        #[arg(long)]
        exercises: Option<String>,
        /// Nutrient unit
        #[arg(long)]
        unit: Option<String>,
        /// Nutrient daily goal
        #[arg(long)]
        goal: Option<f64>,
        /// Cardio mode (continuous/interval)
        #[arg(long)]
        mode: Option<String>,
        /// Cardio metrics, comma separated
        #[arg(long)]
        metrics: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// List definitions
    List,
}

#[derive(Subcommand)]
pub enum DeleteTarget {
    /// A whole strength session
    Session {
        /// Session date
        #[arg(value_parser = parse_date)]
        day: NaiveDate,
        name: String,
    },
    /// A cardio session by id
    Cardio { id: String },
    /// A routine by name or id
    Routine { name: String },
    /// A nutrient definition by name or id
    Nutrient { name: String },
    /// A cardio type by name or id
    CardioType { name: String },
}

#[derive(Subcommand)]
pub enum CoachAction {
    /// Structured analysis of the last weeks
    Analyze,
    /// Show the last stored analysis
    Last,
    /// One chat turn
    Chat {
        message: String,
        /// Forget the previous conversation first
        #[arg(long)]
        reset: bool,
    },
    /// Print the context block sent to the coach
    Context,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g. weight, coach.command, export.directory)
        key: String,
        /// Config value
        value: String,
    },
}
