//! Lead Scoring API Library
//!
//! This library provides the rule-based lead scoring engine and the HTTP
//! service around it. Factor weights are not hardcoded: they are fetched per
//! client from an external config service on every request.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `config_client`: Config service client (per-client factor weights).
//! - `dates`: Lead date normalization.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Lead, factor and API data models.
//! - `router`: Route table and middleware.
//! - `scoring`: Factor extraction and score aggregation.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod config_client;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod router;
pub mod scoring;
