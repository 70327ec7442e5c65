// Public modules
pub mod analyzer;
pub mod config;
pub mod extractor;
pub mod io;
pub mod models;
pub mod news;
pub mod openai;
pub mod update;
pub mod weather;

// Re-export commonly used types
pub use analyzer::ArticleAnalyzer;
pub use config::{AnalyzerConfig, MorningConfig};
pub use extractor::ArticleExtractor;
pub use io::{ensure_output_dir, load_analysis, sanitize_filename, save_analysis, save_audio};
pub use models::{
    AnalysisRecord, AnalysisResult, ExtractionResult, Headline, Sentiment, TokensUsed,
    UpdateResult, WeatherSnapshot,
};
pub use news::NewsClient;
pub use openai::{calculate_cost, OpenAiClient};
pub use update::UpdateGenerator;
pub use weather::WeatherClient;
