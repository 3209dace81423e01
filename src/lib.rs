pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod media;
pub mod middleware;
pub mod prefs;
pub mod routes;
pub mod search;
pub mod workflows;
