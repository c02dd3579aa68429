mod database {
    pub mod actions;
    pub mod error;
    pub mod recipe;
    pub mod schema;
}
mod authentication {
    pub mod jwt;
    pub mod middleware;
    pub mod permissions;
}
mod server {
    pub mod handlers;
    pub mod reply;
    pub mod routes;
}
mod config;
mod constants;

pub use authentication::*;
pub use config::*;
pub use constants::*;
pub use database::*;
pub use server::*;
