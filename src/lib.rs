pub mod auth;
pub mod config;
pub mod database;
pub mod models;
pub mod repository;
pub mod services;
pub mod shutdown;
pub mod tracing;
pub mod utils;
pub mod web;
