use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use ai_client::OpenAi;
use anyhow::{bail, Result};
use browser_session::ChromeBrowser;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commentlens::{
    AnalysisReport, AnalyzeResult, AppConfig, Analyzer, BrowserCommentSource, GroqInsightGenerator,
};

const URL_PROMPT: &str = "Enter Instagram or YouTube URL: ";

#[derive(Parser)]
#[command(name = "commentlens")]
#[command(about = "Scrape Instagram or YouTube comments and summarize engagement with AI")]
#[command(version)]
struct Cli {
    /// Instagram or YouTube post URL (prompted for when omitted)
    url: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the AI call when no comments are found
    #[arg(long)]
    skip_empty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("commentlens=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, url) = prepare(
        cli.url,
        AppConfig::from_env,
        io::stdin().lock(),
        io::stdout(),
    )?;

    let ai = OpenAi::new(&config.groq_api_key, &config.groq_model)
        .with_base_url(&config.groq_api_url)
        .with_timeout(config.request_timeout);

    let browser = ChromeBrowser::new(config.chrome_options());

    let analyzer = Analyzer::new(
        Box::new(BrowserCommentSource::new(
            Box::new(browser),
            config.scrape_settings(),
        )),
        Box::new(GroqInsightGenerator::new(ai, config.insight_settings())),
    )
    .skip_empty(cli.skip_empty || config.skip_empty_analysis);

    info!(url, "Detecting platform and scraping comments...");
    let report = analyzer.analyze(&url).await?;

    println!("{}", render(&report, cli.json)?);
    Ok(())
}

/// Load config first so a missing credential fails before any prompt.
fn prepare<L, R, W>(arg: Option<String>, load: L, input: R, output: W) -> Result<(AppConfig, String)>
where
    L: FnOnce() -> AnalyzeResult<AppConfig>,
    R: BufRead,
    W: Write,
{
    let config = load()?;
    let url = resolve_url(arg, input, output)?;
    Ok((config, url))
}

/// Use the argument when given, otherwise read one line from `input`.
fn resolve_url<R: BufRead, W: Write>(arg: Option<String>, mut input: R, mut output: W) -> Result<String> {
    let raw = match arg {
        Some(url) => url,
        None => {
            write!(output, "{URL_PROMPT}")?;
            output.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            line
        }
    };

    let url = raw.trim();
    if url.is_empty() {
        bail!("Please enter a valid URL.");
    }
    Ok(url.to_string())
}

fn render(report: &AnalysisReport, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.to_string())
    }
}
