use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use tracing::warn;

use liftlog::core::coach::{self, CoachOutcome, CommandGenerator};
use liftlog::core::context;
use liftlog::models::coaching::{ChatTurn, CoachingSummary};
use liftlog::models::config::{Config, write_private};
use liftlog::output::human;

use super::{now_for, open_store, print_ok};

/// Last successful analysis, kept so `coach last` works offline.
#[derive(Debug, Serialize, Deserialize)]
struct StoredAnalysis {
    generated_at: DateTime<Local>,
    summary: CoachingSummary,
}

fn analysis_path() -> PathBuf {
    Config::data_dir().join("analysis.json")
}

fn chat_path() -> PathBuf {
    Config::data_dir().join("chat.json")
}

fn generator(config: &Config) -> Result<CommandGenerator> {
    let line = config.coach.command.as_deref().ok_or_else(|| {
        anyhow::anyhow!("no coach configured (run `liftlog config set coach.command <program>`)")
    })?;
    CommandGenerator::from_command_line(line)
}

fn context_text(config: &Config, today: NaiveDate) -> Result<String> {
    let store = open_store()?;
    Ok(context::build(
        store.state(),
        config.profile.body_weight_kg,
        now_for(today),
        config.coach.context_days,
    ))
}

fn load_history() -> Vec<ChatTurn> {
    let Ok(raw) = std::fs::read_to_string(chat_path()) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable chat history");
        Vec::new()
    })
}

pub fn run_analyze(today: NaiveDate, human_flag: bool) -> Result<()> {
    let config = Config::load()?;
    let generator = generator(&config)?;
    let context = context_text(&config, today)?;
    let outcome = coach::analyze(&generator, &context);

    if let CoachOutcome::Summary(summary) = &outcome {
        let stored = StoredAnalysis {
            generated_at: now_for(today),
            summary: summary.clone(),
        };
        write_private(&analysis_path(), serde_json::to_string_pretty(&stored)?.as_bytes())?;
    }

    if human_flag {
        match &outcome {
            CoachOutcome::Summary(s) => println!("{}", human::format_summary(s)),
            CoachOutcome::Error => println!("The coach could not produce an analysis right now."),
        }
    } else {
        print_ok("coach", json!({ "analysis": outcome }))?;
    }
    Ok(())
}

pub fn run_last(human_flag: bool) -> Result<()> {
    let stored: Option<StoredAnalysis> = match std::fs::read_to_string(analysis_path()) {
        Ok(raw) => Some(serde_json::from_str(&raw)?),
        Err(_) => None,
    };
    if human_flag {
        match &stored {
            Some(a) => {
                println!("{}", a.generated_at.format("%Y-%m-%d %H:%M"));
                println!("{}", human::format_summary(&a.summary));
            }
            None => println!("No analysis yet. Run `liftlog coach analyze`."),
        }
    } else {
        print_ok("coach", json!({ "last": stored }))?;
    }
    Ok(())
}

pub fn run_chat(message: &str, reset: bool, today: NaiveDate, human_flag: bool) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("message must not be empty");
    }
    let config = Config::load()?;
    let generator = generator(&config)?;
    let context = context_text(&config, today)?;
    let mut history = if reset { Vec::new() } else { load_history() };

    let reply = coach::chat(&generator, message, &history, &context);
    if reply != coach::CHAT_FALLBACK {
        history.push(ChatTurn::user(message));
        history.push(ChatTurn::coach(reply.clone()));
    }
    write_private(&chat_path(), serde_json::to_string_pretty(&history)?.as_bytes())?;

    if human_flag {
        println!("{}", reply);
    } else {
        print_ok("coach", json!({ "reply": reply, "turns": history.len() }))?;
    }
    Ok(())
}

pub fn run_context(today: NaiveDate) -> Result<()> {
    let config = Config::load()?;
    print!("{}", context_text(&config, today)?);
    Ok(())
}
