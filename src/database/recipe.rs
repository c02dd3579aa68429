use serde_json::{Map, Value};

use super::error::TypeError;
use super::schema::Ingredient;

/* Accepted payload shapes:

    {"name": "water", "color": "blue", "parts": 1}
    [{"name": "rum", "color": "amber", "parts": "2"}, ...]

`parts` may arrive as an integer, a float (truncated) or an integer-formatted
string. Anything else invalidates the whole payload.
*/

impl TryFrom<&Value> for Ingredient {
    type Error = TypeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let entry = value
            .as_object()
            .ok_or_else(|| TypeError::new("Failed to parse value as object"))?;

        let name = get_str(entry, "name")?;
        let color = get_str(entry, "color")?;
        let parts = get_parts(entry)?;

        Ok(Self { name, color, parts })
    }
}

fn get_str(entry: &Map<String, Value>, key: &str) -> Result<String, TypeError> {
    match entry.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(TypeError::new("Failed to parse value as string")),
        None => Err(TypeError::new("Invalid key")),
    }
}

fn get_parts(entry: &Map<String, Value>) -> Result<i64, TypeError> {
    match entry.get("parts") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| TypeError::new("Failed to parse value as integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| TypeError::new("Failed to parse value as integer")),
        Some(_) => Err(TypeError::new("Failed to parse value as integer")),
        None => Err(TypeError::new("Invalid key")),
    }
}

/// Validates a recipe payload (single entry or list of entries) into the
/// canonical ingredient list. All-or-nothing: one bad entry rejects the
/// whole payload.
pub fn validate_recipe(input: &Value) -> Result<Vec<Ingredient>, TypeError> {
    match input {
        Value::Object(_) => Ok(vec![Ingredient::try_from(input)?]),
        Value::Array(entries) => entries.iter().map(Ingredient::try_from).collect(),
        _ => Err(TypeError::new("Failed to parse value as object or list")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_single_entry_object() {
        let recipe = validate_recipe(&json!({"name": "water", "color": "blue", "parts": 1})).unwrap();

        assert_eq!(
            recipe,
            vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }]
        );
    }

    #[test]
    fn accepts_entry_list_and_keeps_order() {
        let recipe = validate_recipe(&json!([
            {"name": "rum", "color": "amber", "parts": "2"},
            {"name": "cola", "color": "brown", "parts": 5.9},
        ]))
        .unwrap();

        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe[0].name, "rum");
        assert_eq!(recipe[0].parts, 2);
        assert_eq!(recipe[1].name, "cola");
        assert_eq!(recipe[1].parts, 5);
    }

    #[test]
    fn float_parts_truncate_toward_zero() {
        let recipe = validate_recipe(&json!({"name": "x", "color": "y", "parts": -1.7})).unwrap();
        assert_eq!(recipe[0].parts, -1);
    }

    #[test]
    fn numeric_string_parts_may_carry_whitespace() {
        let recipe = validate_recipe(&json!({"name": "x", "color": "y", "parts": " 7 "})).unwrap();
        assert_eq!(recipe[0].parts, 7);
    }

    #[test]
    fn empty_list_is_an_empty_recipe() {
        assert_eq!(validate_recipe(&json!([])).unwrap(), vec![]);
    }

    #[test]
    fn rejects_non_object_non_list_input() {
        assert!(validate_recipe(&json!("water")).is_err());
        assert!(validate_recipe(&json!(3)).is_err());
        assert!(validate_recipe(&json!(null)).is_err());
    }

    #[test]
    fn rejects_missing_keys() {
        assert!(validate_recipe(&json!({"color": "blue", "parts": 1})).is_err());
        assert!(validate_recipe(&json!({"name": "water", "parts": 1})).is_err());
        assert!(validate_recipe(&json!({"name": "water", "color": "blue"})).is_err());
        assert!(validate_recipe(&json!({})).is_err());
    }

    #[test]
    fn rejects_mistyped_fields() {
        assert!(validate_recipe(&json!({"name": 3, "color": "blue", "parts": 1})).is_err());
        assert!(validate_recipe(&json!({"name": "water", "color": [], "parts": 1})).is_err());
        assert!(validate_recipe(&json!({"name": "water", "color": "blue", "parts": true})).is_err());
        assert!(validate_recipe(&json!({"name": "water", "color": "blue", "parts": null})).is_err());
    }

    #[test]
    fn rejects_non_integer_string_parts() {
        assert!(validate_recipe(&json!({"name": "x", "color": "y", "parts": "7.5"})).is_err());
        assert!(validate_recipe(&json!({"name": "x", "color": "y", "parts": "many"})).is_err());
        assert!(validate_recipe(&json!({"name": "x", "color": "y", "parts": ""})).is_err());
    }

    #[test]
    fn one_bad_entry_rejects_the_whole_list() {
        let result = validate_recipe(&json!([
            {"name": "rum", "color": "amber", "parts": 2},
            {"name": "cola", "color": "brown"},
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn idempotent_on_normalized_output() {
        let normalized = validate_recipe(&json!([
            {"name": "gin", "color": "clear", "parts": "2"},
            {"name": "tonic", "color": "clear", "parts": 4.2},
        ]))
        .unwrap();

        let again = validate_recipe(&serde_json::to_value(&normalized).unwrap()).unwrap();
        assert_eq!(normalized, again);
    }
}
