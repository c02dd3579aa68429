use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use drink_catalog::jwt::TokenVerifier;
use drink_catalog::{routes, Config, MAX_DB_CONNECTIONS};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::from_env().expect("Environment misconfigured");
    let secrets = config.parse_keys().expect("JWT_KEYS is not a valid key map");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let verifier = Arc::new(
        TokenVerifier::new(
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            &secrets,
        )
        .expect("Invalid signing key"),
    );

    let api = routes::build(pool, verifier);

    log::info!("Listening on 0.0.0.0:{}", config.port);
    warp::serve(api).run(([0, 0, 0, 0], config.port)).await;
}
