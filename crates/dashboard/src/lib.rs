//! Parceldeck Dashboard library.
//!
//! This crate provides the dashboard functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod board;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scanner;
pub mod services;
pub mod state;
