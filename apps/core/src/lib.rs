//! Maternal Risk Core
//!
//! Rule-based pregnancy symptom risk assessment. The `engine` is a pure
//! function over static pattern tables; everything else is host plumbing
//! around it (optional remote scorers, validation, storage).

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod scoring;
pub mod service;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use engine::{assess, AssessmentVerdict, RiskEngine, RiskLevel, SymptomReport, Urgency};
pub use error::{AppError, AppResult};
pub use service::AssessmentService;
