//! KopiStart - coffee education service
//!
//! This library provides the core functionality for KopiStart: a coffee
//! catalog, a glossary, and a barista course with quizzes and a certificate.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line management interface
//!
//! # Architecture
//! - `course`: Course content, progression rules, quiz scoring, certificates
//! - `storage`: SeaORM storage backends and data models
//! - `services`: Business logic shared by HTTP and CLI
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI command implementations
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod course;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod seed;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
