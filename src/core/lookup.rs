//! Resolve-or-default lookups for the soft references between records and
//! user-defined metadata. Deleted definitions leave historical records intact;
//! these helpers supply the fallback label and color in one place.

use crate::models::{CardioTypeDefinition, NutrientDefinition, RoutineDefinition};

pub const DEFAULT_COLOR: &str = "slate";
pub const UNKNOWN_NUTRIENT: &str = "Unknown nutrient";

pub fn routine<'a>(routines: &'a [RoutineDefinition], name: &str) -> Option<&'a RoutineDefinition> {
    routines.iter().find(|r| r.name == name)
}

pub fn routine_color(routines: &[RoutineDefinition], session_name: &str) -> String {
    routine(routines, session_name)
        .map(|r| r.color.clone())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

pub fn cardio_type<'a>(
    types: &'a [CardioTypeDefinition],
    name: &str,
) -> Option<&'a CardioTypeDefinition> {
    types.iter().find(|t| t.name == name)
}

pub fn cardio_type_color(types: &[CardioTypeDefinition], name: &str) -> String {
    cardio_type(types, name)
        .map(|t| t.color.clone())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

/// Display label for a cardio type. Orphaned sessions keep their stored name.
pub fn cardio_type_label(types: &[CardioTypeDefinition], name: &str) -> String {
    cardio_type(types, name)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| name.to_string())
}

pub fn nutrient<'a>(defs: &'a [NutrientDefinition], id: &str) -> Option<&'a NutrientDefinition> {
    defs.iter().find(|n| n.id == id)
}

pub fn nutrient_label(defs: &[NutrientDefinition], id: &str) -> String {
    nutrient(defs, id)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| UNKNOWN_NUTRIENT.to_string())
}

pub fn nutrient_unit(defs: &[NutrientDefinition], id: &str) -> String {
    nutrient(defs, id).map(|n| n.unit.clone()).unwrap_or_default()
}

pub fn nutrient_color(defs: &[NutrientDefinition], id: &str) -> String {
    nutrient(defs, id)
        .map(|n| n.color.clone())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}
