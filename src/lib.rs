//! Lead Scoring API Library
//!
//! Scores B2B leads with a hosted chat-completion model, summarises their
//! goals, and appends qualifying leads to a CSV file.
//!
//! # Modules
//!
//! - `analysis`: The score, summarise, store workflow.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `lead_store`: Append-only CSV lead store.
//! - `models`: Request, result and record types.
//! - `prompts`: Prompt templates.
//! - `provider`: Completion provider client.
//! - `scoring`: Score/reason extraction from provider text.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lead_store;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod scoring;
