//! Dandeline server library.
//!
//! This crate provides the web application as a library, allowing the
//! request handlers, services, and integration clients to be tested and
//! reused outside the binary.
//!
//! # Architecture
//!
//! Layering follows the data flow:
//!
//! - [`db`] - repositories, one per entity, speaking SQL to `PostgreSQL`
//! - [`models`] - plain domain records and their relation enums
//! - [`services`] - domain services wrapping the repositories, plus the
//!   checkout reconciliation, catalog import, email, and event dispatch
//! - [`stripe`] / [`usps`] - outbound integration clients
//! - [`routes`] - axum handlers for the public storefront actions and the
//!   `/admin` JSON surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;
pub mod usps;
