//! Vendora - A demonstration e-commerce platform
//!
//! This library provides the core functionality for the Vendora platform:
//! authentication, orders, and simulated payments over a dual-driver
//! persistence layer (PostgreSQL or MongoDB).

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
