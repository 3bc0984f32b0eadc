//! EssaySystem - AI-assisted ENEM essay correction backend.
//!
//! A high performance essay transcription and evaluation service built on
//! Actix Web. Students upload a photograph of a handwritten essay, a
//! vision backend extracts the raw text, a generative backend reconstructs
//! it and scores it against the five ENEM competencies.
//!
//! # Architecture
//! - `cache`: object cache layer (Moka)
//! - `config`: configuration management
//! - `entity`: SeaORM database entities
//! - `errors`: unified error handling
//! - `middlewares`: authentication middleware
//! - `models`: data model definitions
//! - `routes`: API routing layer
//! - `runtime`: runtime lifecycle management
//! - `services`: business logic (essay pipeline, AI clients, auth)
//! - `storage`: data storage layer (SeaORM) and the image store
//! - `utils`: helper functions

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
