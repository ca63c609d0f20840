pub mod assessment;
pub mod cli;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod recommend;
pub mod relations;
pub mod report;
pub mod transcript;
pub mod util;

pub use error::AnalysisError;
pub use pipeline::{Pipeline, analyze_transcript};
pub use report::AnalysisResult;
