//! Admission formula evaluation for Polish university programs: formula
//! model, candidate scores, the calculator, builders and reports.

pub mod builders;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod formula;
pub mod report;
pub mod scores;
pub mod types;

pub use calculator::{evaluate, CalculationResult, Calculator, EngineOptions};
pub use error::{RekrutError, Result};
pub use formula::Formula;
pub use scores::CandidateScores;
