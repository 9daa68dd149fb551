mod cli;
mod cmd;

use chrono::Local;
use clap::{CommandFactory, Parser};
use cli::{Cli, CoachAction, Commands, ConfigAction};
use std::process;

use liftlog::output;

fn main() {
    let cli = Cli::parse();
    liftlog::diagnostics::init(cli.verbose);
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let human = cli.human;

    let result = match cli.command {
        Commands::Init { skip } => cmd::init::run(skip),
        Commands::Log { what } => cmd::log::run(what, today, human),
        Commands::Sessions { month } => cmd::views::run_sessions(month.as_deref(), human),
        Commands::Progress { exercise } => cmd::views::run_progress(exercise.as_deref(), human),
        Commands::Volume { days } => cmd::views::run_volume(days, today, human),
        Commands::Cardio => cmd::views::run_cardio(human),
        Commands::Nutrition => cmd::views::run_nutrition(human),
        Commands::Routine { action } => cmd::definitions::run_routine(action, human),
        Commands::Nutrient { action } => cmd::definitions::run_nutrient(action, human),
        Commands::CardioType { action } => cmd::definitions::run_cardio_type(action, human),
        Commands::Delete { target, cancel } => cmd::delete::run(target, cancel, human),
        Commands::Export {
            view,
            all,
            month,
            category,
            search,
            ids,
            stdout,
        } => cmd::export::run_export(
            &view,
            cmd::export::SelectionArgs {
                all,
                month,
                category,
                search,
                ids,
            },
            stdout,
            today,
            human,
        ),
        Commands::Import { file } => cmd::export::run_import(&file, human),
        Commands::Coach { action } => match action {
            CoachAction::Analyze => cmd::coach::run_analyze(today, human),
            CoachAction::Last => cmd::coach::run_last(human),
            CoachAction::Chat { message, reset } => {
                cmd::coach::run_chat(&message, reset, today, human)
            }
            CoachAction::Context => cmd::coach::run_context(today),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd::config::run_show(human),
            ConfigAction::Set { key, value } => cmd::config::run_set(&key, &value),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "liftlog", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        let err = output::error("", "general_error", &e.to_string());
        eprintln!("{}", err);
        process::exit(1);
    }
}
