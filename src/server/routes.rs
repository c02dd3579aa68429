use std::convert::Infallible;
use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{Filter, Rejection, Reply};

use crate::database::schema::Uuid;
use crate::jwt::TokenVerifier;
use crate::middleware::with_permission;
use crate::permissions;

use super::handlers;
use super::reply::handle_rejection;

fn with_pool(
    pool: Pool<Postgres>,
) -> impl Filter<Extract = (Pool<Postgres>,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

/// Assembles the full filter tree: the five operations, CORS, and the
/// uniform error envelope.
pub fn build(
    pool: Pool<Postgres>,
    verifier: Arc<TokenVerifier>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let list = warp::path!("drinks")
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_drinks);

    let list_detail = warp::path!("drinks-detail")
        .and(warp::get())
        .and(with_permission(
            permissions::GET_DRINKS_DETAIL,
            verifier.clone(),
        ))
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_drinks_detail);

    let create = warp::path!("drinks")
        .and(warp::post())
        .and(with_permission(permissions::POST_DRINKS, verifier.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(handlers::create_drink);

    let edit = warp::path!("drinks" / Uuid)
        .and(warp::patch())
        .and(with_permission(permissions::PATCH_DRINKS, verifier.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(handlers::edit_drink);

    let delete = warp::path!("drinks" / Uuid)
        .and(warp::delete())
        .and(with_permission(permissions::DELETE_DRINKS, verifier))
        .and(with_pool(pool))
        .and_then(handlers::delete_drink);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["authorization", "content-type"])
        .allow_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"]);

    list.or(list_detail)
        .or(create)
        .or(edit)
        .or(delete)
        .recover(handle_rejection)
        .with(cors)
}
