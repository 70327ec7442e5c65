use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{AnalysisRecord, AnalysisResult, ExtractionResult};

/// Convert a title or arbitrary string into a safe filename: lowercase,
/// spaces to hyphens, everything outside [a-z0-9-_] dropped.
pub fn sanitize_filename(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect();

    if cleaned.is_empty() {
        "article".to_string()
    } else {
        cleaned
    }
}

/// Ensure the outputs/ directory exists and return its path.
pub fn ensure_output_dir() -> Result<PathBuf> {
    let output_dir = PathBuf::from("outputs");
    fs::create_dir_all(&output_dir).context("Failed to create outputs directory")?;
    Ok(output_dir)
}

/// Save the combined extraction + analysis data as pretty JSON.
///
/// Filename pattern: `<sanitized-title>-<YYYYMMDD-HHMMSS>.json`
pub fn save_analysis(
    output_dir: &Path,
    article: &ExtractionResult,
    analysis: &AnalysisResult,
) -> Result<PathBuf> {
    let title = article.title.as_deref().unwrap_or("article");
    let safe_title = sanitize_filename(title);

    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let filepath = output_dir.join(format!("{}-{}.json", safe_title, timestamp));

    let record = AnalysisRecord {
        article: article.clone(),
        analysis: analysis.clone(),
        saved_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    };

    // to_string_pretty keeps non-ASCII characters as-is, matching the
    // human-readable file contract
    let json = serde_json::to_string_pretty(&record).context("Failed to serialize analysis")?;
    fs::write(&filepath, json).context("Failed to write analysis file")?;

    Ok(filepath)
}

/// Load a previously saved analysis file.
pub fn load_analysis(filepath: &Path) -> Result<AnalysisRecord> {
    if !filepath.exists() {
        anyhow::bail!("Analysis file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read analysis file: {}", filepath.display()))?;

    let record: AnalysisRecord = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse analysis JSON from {}. The file may be corrupted.",
            filepath.display()
        )
    })?;

    Ok(record)
}

/// Write raw MP3 bytes under the output directory.
///
/// Filename pattern: `morning_update_<YYYYMMDD_HHMMSS>.mp3`
pub fn save_audio(output_dir: &Path, audio: &[u8]) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filepath = output_dir.join(format!("morning_update_{}.mp3", timestamp));

    fs::write(&filepath, audio).context("Failed to write audio file")?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisResult, ExtractionResult};

    // ==================== Filename Sanitization Tests ====================

    #[test]
    fn test_sanitize_lowercases_and_hyphenates() {
        assert_eq!(sanitize_filename("My Great Article"), "my-great-article");
    }

    #[test]
    fn test_sanitize_strips_special_characters() {
        assert_eq!(
            sanitize_filename("AI: The Future?! (2026)"),
            "ai-the-future-2026"
        );
    }

    #[test]
    fn test_sanitize_keeps_underscores_and_digits() {
        assert_eq!(sanitize_filename("part_2 of 3"), "part_2-of-3");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "article");
        assert_eq!(sanitize_filename("???!!!"), "article");
    }

    // ==================== Save/Load Round-Trip Tests ====================

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("ai-briefing-io-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut article = ExtractionResult::pending("https://example.com/story");
        article.title = Some("Round Trip".to_string());
        article.text = Some("t".repeat(80));
        article.success = true;

        let mut analysis = AnalysisResult::empty();
        analysis.summary = "A summary.".to_string();
        analysis.success = true;

        let filepath = save_analysis(&dir, &article, &analysis).unwrap();
        assert!(filepath
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("round-trip-"));

        let record = load_analysis(&filepath).unwrap();
        assert_eq!(record.article, article);
        assert_eq!(record.analysis, analysis);
        assert!(!record.saved_at.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/analysis.json");
        let err = load_analysis(&missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_save_audio_uses_timestamped_name() {
        let dir =
            std::env::temp_dir().join(format!("ai-briefing-audio-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let filepath = save_audio(&dir, b"ID3 fake mp3 payload").unwrap();
        let name = filepath.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("morning_update_"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(fs::read(&filepath).unwrap(), b"ID3 fake mp3 payload");

        fs::remove_dir_all(&dir).unwrap();
    }
}
