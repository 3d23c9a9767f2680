// conference-export-service/src/api/mod.rs

mod error;
mod handlers;
mod routes;

pub use routes::router;
