use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_analyzer::config::Config;
use resume_analyzer::llm_client::{self, ConcurrencyLimited, GenerativeTextProvider, LlmClient};
use resume_analyzer::ResumeAnalyzer;

/// Analyze plain resume text and print the assessment as JSON.
#[derive(Debug, Parser)]
#[command(name = "analyzer", version, about)]
struct Args {
    /// Path to a UTF-8 text file with the extracted resume, or `-` for stdin
    input: PathBuf,

    /// File name recorded in the result (defaults to the input's file name)
    #[arg(long)]
    file_name: Option<String>,

    /// Override MAX_SKILLS
    #[arg(long)]
    max_skills: Option<usize>,

    /// Override MAX_RECOMMENDATIONS
    #[arg(long)]
    max_recommendations: Option<usize>,

    /// Skip the generative provider even when ANTHROPIC_API_KEY is set
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "resume_analyzer={level},{}={level}",
                env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    let mut analyzer_config = config.analyzer_config();
    if let Some(max) = args.max_skills {
        analyzer_config.max_skills = max;
    }
    if let Some(max) = args.max_recommendations {
        analyzer_config.max_recommendations = max;
    }

    let provider = if args.offline {
        info!("Offline mode: keyword strategies only");
        None
    } else {
        build_provider(&config)?
    };

    let analyzer = ResumeAnalyzer::new(analyzer_config, provider)?;

    let text = read_input(&args.input).await?;
    let file_name = args
        .file_name
        .unwrap_or_else(|| default_file_name(&args.input));

    let result = analyzer.analyze(&text, &file_name).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// Builds the Anthropic provider when an API key is configured.
fn build_provider(config: &Config) -> Result<Option<Arc<dyn GenerativeTextProvider>>> {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        info!("ANTHROPIC_API_KEY not set; using keyword strategies only");
        return Ok(None);
    };

    let client = LlmClient::new(api_key, config.provider_timeout)
        .context("Failed to build HTTP client for the LLM provider")?;
    info!(
        "LLM client initialized (model: {}, max concurrency: {})",
        llm_client::MODEL,
        config.provider_max_concurrency
    );

    Ok(Some(Arc::new(ConcurrencyLimited::new(
        client,
        config.provider_max_concurrency,
    ))))
}

async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read resume text from stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read resume text from {}", path.display()))
}

fn default_file_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
