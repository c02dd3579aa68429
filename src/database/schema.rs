use serde::{Deserialize, Serialize};

use super::error::TypeError;

pub type Uuid = i32;

/// Raw `drinks` row. The recipe column holds the ingredient list in its
/// serialized text form.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DrinkRow {
    pub id: Uuid,
    pub title: String,
    pub recipe: String,
}

/// Single recipe entry. `parts` is always an integer once an ingredient has
/// passed validation, whatever numeric form the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = TypeError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe: Vec<Ingredient> = serde_json::from_str(&row.recipe)
            .map_err(|_| TypeError::new("Failed to parse stored recipe"))?;

        Ok(Self {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: i64,
}

/// Public projection; ingredient names are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct DrinkShort {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

/// Privileged projection with full ingredient detail.
#[derive(Debug, Clone, Serialize)]
pub struct DrinkLong {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Drink {
        Drink {
            id: 1,
            title: "Water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        }
    }

    #[test]
    fn short_view_omits_ingredient_name() {
        let value = serde_json::to_value(water().short()).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Water");
        assert_eq!(value["recipe"][0]["color"], "blue");
        assert_eq!(value["recipe"][0]["parts"], 1);
        assert!(value["recipe"][0].get("name").is_none());
    }

    #[test]
    fn long_view_keeps_ingredient_name() {
        let value = serde_json::to_value(water().long()).unwrap();

        assert_eq!(value["recipe"][0]["name"], "water");
        assert_eq!(value["recipe"][0]["color"], "blue");
        assert_eq!(value["recipe"][0]["parts"], 1);
    }

    #[test]
    fn row_parses_into_drink() {
        let row = DrinkRow {
            id: 7,
            title: "Matcha".to_string(),
            recipe: r#"[{"name":"matcha","color":"green","parts":3}]"#.to_string(),
        };

        let drink = Drink::try_from(row).unwrap();
        assert_eq!(drink.recipe[0].parts, 3);
    }

    #[test]
    fn corrupt_recipe_column_is_an_error() {
        let row = DrinkRow {
            id: 7,
            title: "Matcha".to_string(),
            recipe: "not json".to_string(),
        };

        assert!(Drink::try_from(row).is_err());
    }
}
