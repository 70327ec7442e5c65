use anyhow::Result;
use clap::Parser;
use shared::{
    ensure_output_dir, save_analysis, AnalysisResult, AnalyzerConfig, ArticleAnalyzer,
    ArticleExtractor, ExtractionResult, OpenAiClient,
};
use std::io::{self, Write};
use std::path::Path;

#[derive(Parser)]
#[command(name = "analyze-content")]
#[command(about = "Extract an article from a URL and analyze it with OpenAI")]
struct Args {
    /// Analyze a single URL and exit (otherwise runs interactively)
    #[arg(short, long)]
    url: Option<String>,

    /// Language code sent with the article request
    #[arg(short, long, default_value = "en")]
    language: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AnalyzerConfig::from_env()?;

    let openai = OpenAiClient::new(config.openai_api_key)?;
    let extractor = ArticleExtractor::new()?;
    let analyzer = ArticleAnalyzer::new(&openai);
    let output_dir = ensure_output_dir()?;

    if let Some(url) = args.url {
        let cost = analyze_one(&extractor, &analyzer, &output_dir, &url, &args.language)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Analysis did not complete"))?;
        println!("\nTotal cost: ${:.6} USD", cost);
        return Ok(());
    }

    run_interactive(&extractor, &analyzer, &output_dir, &args.language).await
}

async fn run_interactive(
    extractor: &ArticleExtractor,
    analyzer: &ArticleAnalyzer<'_>,
    output_dir: &Path,
    language: &str,
) -> Result<()> {
    let mut total_articles = 0u32;
    let mut total_cost = 0.0f64;

    println!("===============================================");
    println!("AI Content Analyzer - Article Extraction & Analysis");
    println!("Model: gpt-4o-mini | Temperature: 0.3");
    println!("===============================================");

    loop {
        print!("\nEnter article URL (or 'q' to quit): ");
        io::stdout().flush()?;

        let Some(url) = read_line()? else {
            break; // EOF ends the session
        };

        if url.is_empty() {
            println!("Please enter a non-empty URL.");
            continue;
        }

        if matches!(url.to_lowercase().as_str(), "q" | "quit" | "exit") {
            break;
        }

        match analyze_one(extractor, analyzer, output_dir, &url, language).await {
            Ok(Some(cost)) => {
                total_articles += 1;
                total_cost += cost;
            }
            Ok(None) => continue,
            Err(e) => {
                // Validation errors: bad scheme, empty URL
                println!("Error: {}", e);
                println!("Please try again with a valid URL.");
                continue;
            }
        }

        print!("\nAnalyze another article? (y/n): ");
        io::stdout().flush()?;
        match read_line()? {
            Some(answer) if matches!(answer.to_lowercase().as_str(), "y" | "yes") => {}
            _ => break,
        }
    }

    println!("\n===============================================");
    println!("Session Summary");
    println!("===============================================");
    println!("Articles analyzed: {}", total_articles);
    println!("Total cost: ${:.6} USD", total_cost);
    println!("Thank you for using AI Content Analyzer!");

    Ok(())
}

/// One full extract -> analyze -> display -> save pass.
///
/// Returns `Ok(None)` when a stage reported failure (the loop re-prompts)
/// and `Err` only for input-validation problems.
async fn analyze_one(
    extractor: &ArticleExtractor,
    analyzer: &ArticleAnalyzer<'_>,
    output_dir: &Path,
    url: &str,
    language: &str,
) -> Result<Option<f64>> {
    let article = extractor.extract(url, language).await?;

    if !article.success {
        let error = article.error.as_deref().unwrap_or("Unknown extraction error.");
        println!("Article extraction failed: {}", error);
        println!("Please try another URL.");
        return Ok(None);
    }

    let analysis = analyzer.analyze(&article).await;

    if !analysis.success {
        let error = analysis.error.as_deref().unwrap_or("Unknown analysis error.");
        println!("Article analysis failed: {}", error);
        println!("You can try another article.");
        return Ok(None);
    }

    display_results(&article, &analysis);

    let output_path = save_analysis(output_dir, &article, &analysis)?;
    println!("Results saved to: {}", output_path.display());

    Ok(Some(analysis.cost_usd))
}

fn display_results(article: &ExtractionResult, analysis: &AnalysisResult) {
    let separator = "═".repeat(47);
    let sub_separator = "─".repeat(47);

    let authors = article
        .authors
        .as_ref()
        .map(|a| a.join(", "))
        .unwrap_or_else(|| "Unknown".to_string());

    println!("{}", separator);
    println!("ARTICLE ANALYSIS RESULTS");
    println!("{}", separator);
    println!("Title: {}", article.title.as_deref().unwrap_or("Untitled article"));
    println!("Authors: {}", authors);
    println!(
        "Published: {}",
        article.publish_date.as_deref().unwrap_or("Unknown")
    );
    println!("SUMMARY:");
    println!("{}", analysis.summary);
    println!(
        "SENTIMENT: {} (confidence: {:.2}%)",
        analysis.sentiment.label,
        analysis.sentiment.confidence * 100.0
    );
    println!("KEY POINTS:");
    for point in &analysis.key_points {
        println!("• {}", point);
    }
    println!("READING TIME: {} minutes", analysis.reading_time_minutes);
    println!("{}", sub_separator);
    println!("COST ANALYSIS");
    println!("{}", sub_separator);
    println!(
        "Tokens Used: {} input + {} output = {} total",
        analysis.tokens_used.prompt, analysis.tokens_used.completion, analysis.tokens_used.total
    );
    println!("Cost: ${:.6} USD", analysis.cost_usd);
    println!("{}", separator);
}

/// Read one trimmed line from stdin; None on EOF.
fn read_line() -> Result<Option<String>> {
    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
