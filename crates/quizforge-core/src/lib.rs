//! quizforge-core — Quiz model, completion parser, and generation engine.
//!
//! This crate defines the data model, the parser that turns a model
//! completion into multiple-choice questions, and the provider and store
//! traits the rest of quizforge builds on.

pub mod chat;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod traits;
