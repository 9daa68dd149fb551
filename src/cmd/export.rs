use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use liftlog::core::export::{self, Delivery, DeliveryOutcome, ExportFile};
use liftlog::core::journal::{cardio_timeline, nutrition_journal};
use liftlog::core::logging;
use liftlog::core::selection::{Selectable, Selection, SmartCriterion};
use liftlog::core::sessions::group_sessions_by_key;
use liftlog::core::store::AppState;
use liftlog::models::config::Config;

use super::{open_store, print_ok};

/// How the command line picks records.
pub struct SelectionArgs {
    pub all: bool,
    pub month: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub ids: Vec<String>,
}

/// Stdout plays the share target; the export directory is the download.
struct CliDelivery {
    to_stdout: bool,
    dir: PathBuf,
}

impl Delivery for CliDelivery {
    fn can_share(&self) -> bool {
        self.to_stdout
    }

    fn share(&self, _filename: &str, bytes: &[u8]) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()?;
        Ok(())
    }

    fn download(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(filename), bytes)?;
        Ok(())
    }
}

fn select<T: Selectable>(items: &[T], args: &SelectionArgs) -> Result<Selection> {
    let mut selection = Selection::new();
    if let Some(q) = &args.search {
        selection.set_search(q);
    }
    for id in &args.ids {
        if !items.iter().any(|i| i.selection_id() == *id) {
            anyhow::bail!("unknown id: {}", id);
        }
        selection.select(id);
    }
    let mut criteria = Vec::new();
    if let Some(month) = &args.month {
        liftlog::core::dates::parse_month_key(month)?;
        criteria.push(SmartCriterion::SameMonth(month.clone()));
    }
    if let Some(category) = &args.category {
        criteria.push(SmartCriterion::SameCategory(category.clone()));
    }
    if args.all {
        criteria.push(SmartCriterion::AllVisible);
    }
    // Flags given together add up; none of them deselects.
    for criterion in &criteria {
        if selection.include(criterion, items) == 0 {
            tracing::debug!(?criterion, "criterion added nothing");
        }
    }
    Ok(selection)
}

/// CSV content for the selected records of one view, with the number of
/// selected items.
fn build(view: &str, state: &AppState, args: &SelectionArgs) -> Result<(String, usize)> {
    match view {
        "strength" => {
            let sessions = group_sessions_by_key(&state.strength_sets, &state.routines);
            let selection = select(&sessions, args)?;
            let chosen = selection.selected_items(&sessions);
            let sets: Vec<_> = chosen
                .iter()
                .flat_map(|s| s.entries.iter().cloned())
                .collect();
            Ok((export::strength_csv(&sets), chosen.len()))
        }
        "cardio" => {
            let timeline = cardio_timeline(&state.cardio_sessions, &state.cardio_types);
            let selection = select(&timeline, args)?;
            let chosen: Vec<_> = selection
                .selected_items(&timeline)
                .into_iter()
                .map(|i| i.session.clone())
                .collect();
            Ok((export::cardio_csv(&chosen, &state.cardio_types), chosen.len()))
        }
        "nutrition" => {
            let days = nutrition_journal(&state.nutrient_logs, &state.nutrients);
            let selection = select(&days, args)?;
            let chosen: Vec<NaiveDate> = selection
                .selected_items(&days)
                .into_iter()
                .map(|d| d.date)
                .collect();
            let logs: Vec<_> = state
                .nutrient_logs
                .iter()
                .filter(|l| chosen.contains(&l.date))
                .cloned()
                .collect();
            Ok((export::nutrition_csv(&logs, &state.nutrients), chosen.len()))
        }
        other => anyhow::bail!("unknown view: {} (expected strength, cardio or nutrition)", other),
    }
}

pub fn run_export(
    view: &str,
    args: SelectionArgs,
    stdout: bool,
    today: NaiveDate,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let store = open_store()?;
    let (content, selected) = build(view, store.state(), &args)?;
    if selected == 0 {
        anyhow::bail!("nothing selected (use --all, --month, --category or --id)");
    }

    let file = ExportFile {
        filename: export::export_filename(view, today),
        content,
    };
    let target = CliDelivery {
        to_stdout: stdout,
        dir: config.export_dir(),
    };
    let outcome = export::deliver(&target, &file)?;
    if outcome == DeliveryOutcome::Shared {
        return Ok(());
    }

    let path = target.dir.join(&file.filename);
    if human {
        println!("Exported {} item(s) to {}", selected, path.display());
    } else {
        print_ok(
            "export",
            json!({
                "view": view,
                "selected": selected,
                "outcome": outcome,
                "path": path.display().to_string(),
            }),
        )?;
    }
    Ok(())
}

pub fn run_import(file: &str, human: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", file, e))?;
    let rows = export::parse_strength_csv(&text)?;
    if rows.is_empty() {
        anyhow::bail!("no strength rows in {}", file);
    }
    let mut store = open_store()?;
    let imported = logging::import_sets(&mut store, rows)?;
    if human {
        println!("Imported {} set(s) from {}", imported, file);
    } else {
        print_ok("import", json!({ "imported": imported }))?;
    }
    Ok(())
}
