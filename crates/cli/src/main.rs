use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokenscope_core::{AnalysisResult, Analyzer, FetchConfig, Impact, fetch_url};

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source URL assumed for file and stdin input when --url is not given.
const LOCAL_URL: &str = "http://localhost/";

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Estimate how expensive a web page is for AI models to read
#[derive(Parser, Debug)]
#[command(name = "tokenscope")]
#[command(author = "Tokenscope Contributors")]
#[command(version = "1.0.0")]
#[command(about = "Estimate LLM token cost for web pages", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Source URL for link classification when reading a file or stdin
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Format file size for display
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn impact_label(impact: Impact) -> &'static str {
    match impact {
        Impact::High => "high",
        Impact::Medium => "medium",
        Impact::Low => "low",
    }
}

/// Render the analysis as a plain-text report.
fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("URL:           {}\n", result.url));
    out.push_str(&format!("Fetched at:    {}\n", result.fetched_at));
    if !result.page_title.is_empty() {
        out.push_str(&format!("Title:         {}\n", result.page_title));
    }
    out.push_str(&format!(
        "Raw HTML:      {} ({} bytes)\n",
        format_size(result.raw_html_length),
        result.raw_html_length
    ));
    out.push_str(&format!(
        "Cleaned text:  {} ({} bytes)\n",
        format_size(result.cleaned_text_length),
        result.cleaned_text_length
    ));
    out.push_str(&format!("Markup ratio:  {:.2}x\n", result.markup_to_content_ratio));

    let b = &result.content_breakdown;
    out.push_str("\nContent breakdown\n");
    out.push_str(&format!("  text:    {}\n", format_size(b.text_bytes)));
    out.push_str(&format!("  script:  {}\n", format_size(b.script_bytes)));
    out.push_str(&format!("  style:   {}\n", format_size(b.style_bytes)));
    out.push_str(&format!("  markup:  {}\n", format_size(b.markup_bytes)));
    out.push_str(&format!(
        "  images:  {} ({} with alt, {} without)\n",
        b.image_count, b.images_with_alt, b.images_without_alt
    ));
    out.push_str(&format!(
        "  links:   {} ({} internal, {} external)\n",
        b.link_count, b.internal_links, b.external_links
    ));

    let s = &result.structure_analysis;
    out.push_str(&format!("\nStructure score: {}/100\n", s.structure_score()));
    out.push_str(&format!(
        "  headings: {} (hierarchy {})\n",
        s.heading_count,
        if s.heading_hierarchy_valid { "valid" } else { "invalid" }
    ));
    out.push_str(&format!("  semantic elements: {}\n", s.semantic_element_count));
    out.push_str(&format!("  nesting depth: {}\n", s.nesting_depth));
    out.push_str(&format!(
        "  meta: title {}, description {}, open graph {}\n",
        if s.has_meta_title { "yes" } else { "no" },
        if s.has_meta_description { "yes" } else { "no" },
        if s.has_open_graph { "yes" } else { "no" }
    ));

    let r = &result.readability;
    out.push_str(&format!(
        "\nReadability: {:.1} - {}\n",
        r.readability_score, r.readability_grade
    ));
    out.push_str(&format!(
        "  words: {}  sentences: {}  paragraphs: {}\n",
        r.word_count, r.sentence_count, r.paragraph_count
    ));
    out.push_str(&format!(
        "  avg sentence length: {:.1} words  avg word length: {:.1} chars\n",
        r.avg_sentence_length, r.avg_word_length
    ));

    out.push_str("\nToken estimates\n");
    out.push_str(&format!(
        "  {:<20} {:<10} {:>10} {:>10} {:>12} {:>10}  {}\n",
        "MODEL", "PROVIDER", "RAW", "CLEANED", "COST(CLEAN)", "CONTEXT", "FITS"
    ));
    for est in &result.model_estimates {
        out.push_str(&format!(
            "  {:<20} {:<10} {:>10} {:>10} {:>12} {:>10}  {}{}\n",
            est.model,
            est.provider,
            est.tokens_raw,
            est.tokens_cleaned,
            format!("${:.4}", est.estimated_input_cost_cleaned),
            est.context_window,
            if est.fits_in_context { "yes" } else { "NO" },
            if est.is_exact { "" } else { " (est)" }
        ));
    }

    if result.recommendations.is_empty() {
        out.push_str("\nRecommendations: none - this page is already well-optimized\n");
    } else {
        out.push_str(&format!("\nRecommendations ({})\n", result.recommendations.len()));
        for rec in &result.recommendations {
            out.push_str(&format!("  [{}] {}\n", impact_label(rec.impact), rec.title));
            out.push_str(&format!("      {}\n", rec.description));
        }
    }

    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    if let Some(source) = &args.url {
        url::Url::parse(source).with_context(|| format!("Invalid --url value: {}", source))?;
    }

    let fetched_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format timestamp")?;

    let (html, source_url) = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        (buffer, args.url.clone().unwrap_or_else(|| LOCAL_URL.to_string()))
    } else if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if args.verbose {
            echo::print_step(
                1,
                3,
                &format!("Fetching from {}", args.input.bright_white().underline()),
            );
        }

        let config = FetchConfig {
            timeout: args.timeout,
            user_agent: args
                .user_agent
                .clone()
                .unwrap_or_else(|| "Mozilla/5.0 (compatible; Tokenscope/1.0)".to_string()),
        };

        let content = fetch_url(&args.input, &config).await.map_err(|e| {
            echo::print_error(&e.to_string());
            anyhow::anyhow!("Failed to fetch URL")
        })?;
        (content, args.input.clone())
    } else {
        if args.verbose {
            echo::print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        let content =
            fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        (content, args.url.clone().unwrap_or_else(|| LOCAL_URL.to_string()))
    };

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        eprintln!();
        echo::print_step(2, 3, "Analyzing page");
    }

    let analyzer = Analyzer::new();
    let result = analyzer.analyze(&html, &source_url, &fetched_at);

    if args.verbose {
        if !result.page_title.is_empty() {
            eprintln!("  {} {}", "Title:".dimmed(), result.page_title.bright_white());
        }
        eprintln!(
            "  {} {}",
            "Structure:".dimmed(),
            format!("{}/100", result.structure_analysis.structure_score()).bright_white()
        );
        eprintln!(
            "  {} {}",
            "Findings:".dimmed(),
            result.recommendations.len().to_string().bright_white()
        );
        eprintln!();
        echo::print_step(3, 3, "Writing output");
        eprintln!();
    }

    let output = match args.format {
        OutputFormat::Json => {
            if args.pretty {
                serde_json::to_string_pretty(&result).context("Failed to serialize result")?
            } else {
                serde_json::to_string(&result).context("Failed to serialize result")?
            }
        }
        OutputFormat::Text => render_text(&result),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
