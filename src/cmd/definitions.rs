use anyhow::Result;
use serde_json::json;

use liftlog::core::store::Patch;
use liftlog::models::{
    CardioMode, CardioTypeDefinition, MetricKind, NutrientDefinition, RoutineDefinition,
};

use super::{open_store, print_ok};
use crate::cli::DefinitionAction;

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

pub fn run_routine(action: DefinitionAction, human: bool) -> Result<()> {
    let mut store = open_store()?;
    match action {
        DefinitionAction::Add {
            name,
            exercises,
            color,
            ..
        } => {
            let mut routine = RoutineDefinition::new(name, split_list(exercises.as_deref()), color);
            if let Some(existing) = store
                .state()
                .routines
                .iter()
                .find(|r| r.name.eq_ignore_ascii_case(&routine.name))
            {
                routine.id = existing.id.clone();
            }
            store.mutate(Patch::UpsertRoutine(routine.clone()))?;
            if human {
                println!("Saved routine {} ({})", routine.name, routine.exercises.join(", "));
            } else {
                print_ok("routine", json!({ "routine": routine }))?;
            }
        }
        DefinitionAction::List => {
            let routines = &store.state().routines;
            if human {
                if routines.is_empty() {
                    println!("No routines defined");
                }
                for r in routines {
                    println!("{} [{}]: {}", r.name, r.color, r.exercises.join(", "));
                }
            } else {
                print_ok("routine", json!({ "routines": routines }))?;
            }
        }
    }
    Ok(())
}

pub fn run_nutrient(action: DefinitionAction, human: bool) -> Result<()> {
    let mut store = open_store()?;
    match action {
        DefinitionAction::Add {
            name,
            unit,
            goal,
            color,
            icon,
            ..
        } => {
            let unit = unit.ok_or_else(|| anyhow::anyhow!("--unit is required for nutrients"))?;
            let goal = goal.unwrap_or(0.0);
            if !goal.is_finite() || goal < 0.0 {
                anyhow::bail!("invalid goal: {} (must be >= 0)", goal);
            }
            let mut def = NutrientDefinition::new(name, unit, goal);
            if let Some(existing) = store
                .state()
                .nutrients
                .iter()
                .find(|n| n.name.eq_ignore_ascii_case(&def.name))
            {
                def.id = existing.id.clone();
            }
            if let Some(c) = color {
                def.color = c;
            }
            def.icon = icon;
            store.mutate(Patch::UpsertNutrientDefinition(def.clone()))?;
            if human {
                println!("Saved nutrient {} ({}, goal {})", def.name, def.unit, def.goal);
            } else {
                print_ok("nutrient", json!({ "nutrient": def }))?;
            }
        }
        DefinitionAction::List => {
            let defs = &store.state().nutrients;
            if human {
                if defs.is_empty() {
                    println!("No nutrients defined");
                }
                for n in defs {
                    println!("{} ({}) goal {} {} [{}]", n.name, n.id, n.goal, n.unit, n.color);
                }
            } else {
                print_ok("nutrient", json!({ "nutrients": defs }))?;
            }
        }
    }
    Ok(())
}

pub fn run_cardio_type(action: DefinitionAction, human: bool) -> Result<()> {
    let mut store = open_store()?;
    match action {
        DefinitionAction::Add {
            name,
            mode,
            metrics,
            color,
            icon,
            ..
        } => {
            let mode: CardioMode = mode.as_deref().unwrap_or("continuous").parse()?;
            let metrics = split_list(metrics.as_deref())
                .iter()
                .map(|m| m.parse::<MetricKind>())
                .collect::<Result<Vec<_>>>()?;
            let metrics = if metrics.is_empty() {
                vec![MetricKind::Distance, MetricKind::Duration]
            } else {
                metrics
            };
            let mut def = CardioTypeDefinition::new(name, mode, metrics);
            if let Some(existing) = store
                .state()
                .cardio_types
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(&def.name))
            {
                def.id = existing.id.clone();
            }
            if let Some(c) = color {
                def.color = c;
            }
            def.icon = icon;
            store.mutate(Patch::UpsertCardioType(def.clone()))?;
            if human {
                let names: Vec<String> = def.metrics.iter().map(|m| m.to_string()).collect();
                println!("Saved cardio type {} ({}: {})", def.name, def.mode, names.join(", "));
            } else {
                print_ok("cardio-type", json!({ "cardio_type": def }))?;
            }
        }
        DefinitionAction::List => {
            let types = &store.state().cardio_types;
            if human {
                for t in types {
                    let names: Vec<String> = t.metrics.iter().map(|m| m.to_string()).collect();
                    println!("{} [{}] {}: {}", t.name, t.color, t.mode, names.join(", "));
                }
            } else {
                print_ok("cardio-type", json!({ "cardio_types": types }))?;
            }
        }
    }
    Ok(())
}
