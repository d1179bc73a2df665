//! Text analysis and classification of incoming work notes

pub mod bayes;
pub mod classifier;
pub mod date_utils;
pub mod text_analyzer;

pub use classifier::ContentClassifier;
pub use text_analyzer::TextAnalyzer;
