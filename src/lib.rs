//! Restaurant menu catalog service.
//!
//! CRUD, filtered listing and category grouping over a menu store, plus
//! AI-generated descriptions and recommendations reconciled against the
//! live catalog.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;
