use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::json;
use std::path::PathBuf;
use tracing::warn;

use liftlog::core::confirm::{ConfirmEffect, ConfirmEvent, ConfirmState, DeleteConfirm};
use liftlog::core::sessions::session_key;
use liftlog::core::store::{AppState, Patch};
use liftlog::models::config::{Config, write_private};

use super::{open_store, print_ok};
use crate::cli::DeleteTarget;

fn pending_path() -> PathBuf {
    Config::data_dir().join("pending_delete.json")
}

fn load_pending() -> ConfirmState {
    let path = pending_path();
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return ConfirmState::Idle;
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable pending deletion");
        ConfirmState::Idle
    })
}

fn save_pending(state: &ConfirmState) -> Result<()> {
    write_private(&pending_path(), serde_json::to_string(state)?.as_bytes())
}

fn find_definition<'a, T>(
    items: &'a [T],
    needle: &str,
    fields: impl Fn(&'a T) -> (&'a str, &'a str),
    kind: &str,
) -> Result<&'a str> {
    items
        .iter()
        .map(|item| fields(item))
        .find(|(id, name)| *id == needle || name.eq_ignore_ascii_case(needle))
        .map(|(id, _)| id)
        .ok_or_else(|| anyhow::anyhow!("no {} named '{}'", kind, needle))
}

/// The confirmation id, the patch to run once confirmed, and a label.
fn resolve(state: &AppState, target: DeleteTarget) -> Result<(String, Patch, String)> {
    match target {
        DeleteTarget::Session { day, name } => {
            if !state
                .strength_sets
                .iter()
                .any(|e| e.date == day && e.session_name == name)
            {
                anyhow::bail!("no session '{}' on {}", name, day);
            }
            let key = session_key(day, &name);
            Ok((
                format!("session:{}", key),
                Patch::DeleteSession {
                    date: day,
                    session_name: name.clone(),
                },
                format!("session {} on {}", name, day),
            ))
        }
        DeleteTarget::Cardio { id } => {
            let session = state
                .cardio_sessions
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| anyhow::anyhow!("no cardio session with id {}", id))?;
            Ok((
                format!("cardio:{}", id),
                Patch::DeleteCardio { id: id.clone() },
                format!("{} on {}", session.cardio_type_name, session.date),
            ))
        }
        DeleteTarget::Routine { name } => {
            let id = find_definition(
                &state.routines,
                &name,
                |r| (r.id.as_str(), r.name.as_str()),
                "routine",
            )?;
            Ok((
                format!("routine:{}", id),
                Patch::DeleteRoutine { id: id.to_string() },
                format!("routine {}", name),
            ))
        }
        DeleteTarget::Nutrient { name } => {
            let id = find_definition(
                &state.nutrients,
                &name,
                |n| (n.id.as_str(), n.name.as_str()),
                "nutrient",
            )?;
            Ok((
                format!("nutrient:{}", id),
                Patch::DeleteNutrientDefinition { id: id.to_string() },
                format!("nutrient {}", name),
            ))
        }
        DeleteTarget::CardioType { name } => {
            let id = find_definition(
                &state.cardio_types,
                &name,
                |t| (t.id.as_str(), t.name.as_str()),
                "cardio type",
            )?;
            Ok((
                format!("cardio-type:{}", id),
                Patch::DeleteCardioType { id: id.to_string() },
                format!("cardio type {}", name),
            ))
        }
    }
}

pub fn run(target: Option<DeleteTarget>, cancel: bool, human: bool) -> Result<()> {
    let config = Config::load()?;
    let timeout = Duration::seconds(config.confirm.timeout_secs as i64);
    let mut confirm = DeleteConfirm::with_state(load_pending(), timeout);

    if cancel {
        confirm.handle(ConfirmEvent::Navigate);
        save_pending(confirm.state())?;
        if human {
            println!("Pending deletion cancelled");
        } else {
            print_ok("delete", json!({ "status": "cancelled" }))?;
        }
        return Ok(());
    }

    let target =
        target.ok_or_else(|| anyhow::anyhow!("nothing to delete (see `liftlog delete --help`)"))?;
    let mut store = open_store()?;
    let (id, patch, label) = resolve(store.state(), target)?;

    let now = Utc::now();
    confirm.handle(ConfirmEvent::Tick(now));
    let effect = confirm.handle(ConfirmEvent::Press { id, now });
    save_pending(confirm.state())?;

    match effect {
        ConfirmEffect::Execute(id) => {
            let report = store.mutate(patch)?;
            if human {
                println!("Deleted {}", label);
            } else {
                print_ok(
                    "delete",
                    json!({ "status": "deleted", "id": id, "affected": report.affected }),
                )?;
            }
        }
        ConfirmEffect::Armed(id) => {
            if human {
                println!(
                    "Run the same command again within {}s to delete {}",
                    config.confirm.timeout_secs, label
                );
            } else {
                print_ok(
                    "delete",
                    json!({
                        "status": "armed",
                        "id": id,
                        "timeout_secs": config.confirm.timeout_secs,
                    }),
                )?;
            }
        }
        ConfirmEffect::None => {}
    }
    Ok(())
}
