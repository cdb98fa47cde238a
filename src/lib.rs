//! Library crate for cyberoscope-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
mod dto;
mod error;
pub mod import;
pub mod roll_no;
pub mod routes;
pub mod services;
pub mod state;
