//! Terminal Pokédex: browse the PokeAPI catalog with a paginated, searchable
//! list and a detail view.

pub mod app;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod logging;
pub mod models;
pub mod terminal;
pub mod toast;
pub mod ui;
pub mod utils;
