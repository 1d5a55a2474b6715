//! Gallery web shop: catalog pages, sessions, favorites, cart and orders.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod routes;
pub mod state;
pub mod uploads;
pub mod views;
