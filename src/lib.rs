pub mod classifier;
pub mod components;
pub mod config;
pub mod domain_utils;
pub mod entropy;
pub mod error;
pub mod features;
pub mod models;
pub mod normalization;

pub use classifier::ThreatClassifier;
pub use config::Settings;
pub use error::RequestError;
pub use models::{
    AnalyzeRequest, ClassificationLabel, ClassificationResult, EmailHeaders, FeedbackRequest,
    HealthResponse,
};
