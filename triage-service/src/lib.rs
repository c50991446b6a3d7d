pub mod config;
pub mod error;
pub mod gateway;
pub mod language;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod tasks;
pub mod translator;
pub mod workflow;

pub use config::{ServiceConfig, TriageConfig};
pub use error::{GenerationError, MalformedModelOutput, StageError, TriageError};
pub use gateway::{GenerationOptions, LlmGateway, RigGateway};
pub use language::{LanguageLabels, LanguageTag};
pub use models::*;
pub use service::{AppState, create_app};
pub use translator::ReportTranslator;
pub use workflow::DecisionEngine;
