use serde_json::Value;

use crate::data::ResourceClass;
use crate::error::{FieldError, SchemaError};

/// Validate a decoded payload against the shape its resource class
/// requires.
///
/// This is schema validation, not "is it JSON": a payload that decoded
/// fine but is missing required fields or carries the wrong types is
/// rejected here with one [`FieldError`] per problem, and never reaches
/// the cache.
pub fn validate(class: ResourceClass, payload: &Value) -> Result<(), SchemaError> {
    let errors = match class {
        ResourceClass::PlayerDirectory => validate_player_directory(payload),
        ResourceClass::LeagueInfo => validate_league_info(payload),
    };
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { errors })
    }
}

/// The player directory is an object mapping player id to a record with
/// string `name`, `team`, and `position`.
fn validate_player_directory(payload: &Value) -> Vec<FieldError> {
    let Some(players) = payload.as_object() else {
        return vec![FieldError::new("$", "expected an object of player records")];
    };

    let mut errors = Vec::new();
    for (id, record) in players {
        let Some(record) = record.as_object() else {
            errors.push(FieldError::new(id.clone(), "expected a player record object"));
            continue;
        };
        for field in ["name", "team", "position"] {
            match record.get(field) {
                Some(v) if v.is_string() => {}
                Some(_) => errors.push(FieldError::new(format!("{id}.{field}"), "expected a string")),
                None => errors.push(FieldError::new(format!("{id}.{field}"), "missing")),
            }
        }
    }
    errors
}

/// A league record requires a string `leagueName`; `endDate` and
/// `matchups` are optional but must be a string and an array when present.
fn validate_league_info(payload: &Value) -> Vec<FieldError> {
    let Some(record) = payload.as_object() else {
        return vec![FieldError::new("$", "expected a league record object")];
    };

    let mut errors = Vec::new();
    match record.get("leagueName") {
        Some(v) if v.is_string() => {}
        Some(_) => errors.push(FieldError::new("leagueName", "expected a string")),
        None => errors.push(FieldError::new("leagueName", "missing")),
    }
    if let Some(v) = record.get("endDate")
        && !v.is_string()
    {
        errors.push(FieldError::new("endDate", "expected a string date"));
    }
    if let Some(v) = record.get("matchups")
        && !v.is_array()
    {
        errors.push(FieldError::new("matchups", "expected an array"));
    }
    errors
}
