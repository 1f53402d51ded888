pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod pagination;
pub mod password;
pub mod services;
pub mod state;
pub mod telemetry;
