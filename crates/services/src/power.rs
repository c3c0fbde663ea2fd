//! # Power Calculator
//!
//! Derives the leaderboard score from a character sheet. Only the stat
//! fields are read; the rest of the document is ignored.

use serde_json::Value;

/// Base stat used when a character omits `attack`, `defense` or `speed`.
pub const DEFAULT_BASE_STAT: f64 = 10.0;

const ATTACK_WEIGHT: f64 = 3.0;
const DEFENSE_WEIGHT: f64 = 2.0;
const SPEED_WEIGHT: f64 = 1.5;
const MAX_HP_WEIGHT: f64 = 0.5;

/// Computes `floor(maxHp*0.5 + atk*3 + def*2 + spd*1.5)` with equipment
/// bonuses folded into the base stats.
///
/// Base stats that are missing, non-numeric or zero fall back to
/// [`DEFAULT_BASE_STAT`]; a stored `0` is indistinguishable from "absent".
/// A missing `maxHp` counts as zero. `None` or `null` yields `0`.
pub fn compute_power(character: Option<&Value>) -> i64 {
    let Some(character) = character.filter(|c| !c.is_null()) else {
        return 0;
    };

    let mut attack = base_stat(character, "attack");
    let mut defense = base_stat(character, "defense");
    let mut speed = base_stat(character, "speed");

    if let Some(equipment) = character.get("equipment").and_then(Value::as_array) {
        for item in equipment {
            attack += bonus(item, "attack");
            defense += bonus(item, "defense");
            speed += bonus(item, "speed");
        }
    }

    let max_hp = number(character, "maxHp").unwrap_or(0.0);

    let score = max_hp * MAX_HP_WEIGHT
        + attack * ATTACK_WEIGHT
        + defense * DEFENSE_WEIGHT
        + speed * SPEED_WEIGHT;

    // `as` saturates on overflow and maps NaN to 0
    score.floor() as i64
}

fn number(doc: &Value, field: &str) -> Option<f64> {
    doc.get(field).and_then(Value::as_f64)
}

fn base_stat(doc: &Value, field: &str) -> f64 {
    number(doc, field)
        .filter(|v| *v != 0.0)
        .unwrap_or(DEFAULT_BASE_STAT)
}

fn bonus(item: &Value, field: &str) -> f64 {
    number(item, field).unwrap_or(0.0)
}
