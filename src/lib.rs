// conference-export-service/src/lib.rs

pub mod api;
pub mod composer;
pub mod config;
pub mod countries;
pub mod error;
pub mod formatter;
pub mod models;
pub mod persistence;
pub mod pipeline;
pub mod renderers;

#[cfg(test)]
pub(crate) mod testing;
