use serde::Deserialize;
use serde_json::Value;
use sqlx::{Pool, Postgres};
use warp::{reject, Rejection, Reply};

use crate::database::actions;
use crate::database::recipe::validate_recipe;
use crate::database::schema::{Drink, Uuid};
use crate::jwt::Claims;

use super::reply::{self, ApiError};

/// Create/edit request body. Both fields are optional so that an edit can
/// replace the title and the recipe independently; creation enforces
/// presence itself.
#[derive(Debug, Deserialize)]
pub struct DrinkPayload {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

/// GET /drinks: public, short representation.
pub async fn list_drinks(pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let drinks = actions::list_drinks(&pool).await.map_err(|e| {
        log::error!("Failed to list drinks: {e}");
        reject::custom(ApiError::internal())
    })?;

    Ok(reply::drinks(drinks.iter().map(Drink::short).collect()))
}

/// GET /drinks-detail: long representation for privileged callers.
pub async fn list_drinks_detail(_claims: Claims, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let drinks = actions::list_drinks(&pool).await.map_err(|e| {
        log::error!("Failed to list drinks: {e}");
        reject::custom(ApiError::internal())
    })?;

    Ok(reply::drinks(drinks.iter().map(Drink::long).collect()))
}

/// POST /drinks: creates a drink from a title and a validated recipe.
pub async fn create_drink(
    _claims: Claims,
    payload: DrinkPayload,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let title = payload
        .title
        .ok_or_else(|| reject::custom(ApiError::unprocessable()))?;
    let recipe = payload
        .recipe
        .ok_or_else(|| reject::custom(ApiError::unprocessable()))?;

    let recipe = validate_recipe(&recipe).map_err(|_| reject::custom(ApiError::unprocessable()))?;

    let drink = actions::insert_drink(&title, recipe, &pool).await.map_err(|e| {
        log::error!("Failed to insert drink: {e}");
        reject::custom(ApiError::unprocessable())
    })?;

    Ok(reply::drinks(vec![drink.long()]))
}

/// PATCH /drinks/{id}: replaces the title and/or recipe. A present but
/// invalid recipe rejects the whole request; there is no partial update.
pub async fn edit_drink(
    id: Uuid,
    _claims: Claims,
    payload: DrinkPayload,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let drink = actions::get_drink(id, &pool).await.map_err(|e| {
        log::error!("Failed to load drink {id}: {e}");
        reject::custom(ApiError::internal())
    })?;
    let mut drink = drink.ok_or_else(|| reject::custom(ApiError::not_found()))?;

    if let Some(title) = payload.title {
        drink.title = title;
    }

    if let Some(recipe) = payload.recipe {
        drink.recipe =
            validate_recipe(&recipe).map_err(|_| reject::custom(ApiError::unprocessable()))?;
    }

    actions::update_drink(&drink, &pool).await.map_err(|e| {
        log::error!("Failed to update drink {id}: {e}");
        reject::custom(ApiError::bad_request())
    })?;

    Ok(reply::drinks(vec![drink.long()]))
}

/// DELETE /drinks/{id}: hard delete, echoes the removed id.
pub async fn delete_drink(
    id: Uuid,
    _claims: Claims,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let drink = actions::get_drink(id, &pool).await.map_err(|e| {
        log::error!("Failed to load drink {id}: {e}");
        reject::custom(ApiError::internal())
    })?;
    let drink = drink.ok_or_else(|| reject::custom(ApiError::not_found()))?;

    actions::delete_drink(drink.id, &pool).await.map_err(|e| {
        log::error!("Failed to delete drink {id}: {e}");
        reject::custom(ApiError::internal())
    })?;

    Ok(reply::deleted(drink.id))
}
