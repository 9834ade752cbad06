//! Employee, task and assignment records with a duty-roster report generator,
//! served as a JSON API for a local browser front end.

pub mod api;
pub mod app_state;
pub mod config;
pub mod db;
pub mod middleware;
pub mod schedule;
pub mod service;
pub mod utils;
