use sqlx::{Pool, Postgres};

use super::error::QueryError;
use super::schema::{Drink, DrinkRow, Ingredient, Uuid};

/// Lists every drink, oldest first.
pub async fn list_drinks(pool: &Pool<Postgres>) -> Result<Vec<Drink>, QueryError> {
    let rows: Vec<DrinkRow> = sqlx::query_as("SELECT * FROM drinks ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    rows.into_iter()
        .map(|row| Drink::try_from(row).map_err(|e| QueryError::new(e.to_string())))
        .collect()
}

pub async fn get_drink(id: Uuid, pool: &Pool<Postgres>) -> Result<Option<Drink>, QueryError> {
    let row: Option<DrinkRow> = sqlx::query_as("SELECT * FROM drinks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    row.map(|row| Drink::try_from(row).map_err(|e| QueryError::new(e.to_string())))
        .transpose()
}

/// Inserts a validated drink; the store assigns the id.
pub async fn insert_drink(
    title: &str,
    recipe: Vec<Ingredient>,
    pool: &Pool<Postgres>,
) -> Result<Drink, QueryError> {
    let serialized = serde_json::to_string(&recipe).map_err(|e| QueryError::new(e.to_string()))?;

    let id: (Uuid,) =
        sqlx::query_as("INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id")
            .bind(title)
            .bind(&serialized)
            .fetch_one(pool)
            .await
            .map_err(QueryError::from)?;

    Ok(Drink {
        id: id.0,
        title: title.to_string(),
        recipe,
    })
}

/// Persists the drink's current title and recipe in one statement.
pub async fn update_drink(drink: &Drink, pool: &Pool<Postgres>) -> Result<(), QueryError> {
    let serialized =
        serde_json::to_string(&drink.recipe).map_err(|e| QueryError::new(e.to_string()))?;

    sqlx::query("UPDATE drinks SET title = $1, recipe = $2 WHERE id = $3")
        .bind(&drink.title)
        .bind(&serialized)
        .bind(drink.id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}

pub async fn delete_drink(id: Uuid, pool: &Pool<Postgres>) -> Result<(), QueryError> {
    sqlx::query("DELETE FROM drinks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}
