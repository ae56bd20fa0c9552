//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::GenerationOutcome;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Render a completed analysis outcome.
    pub fn outcome(outcome: &GenerationOutcome) {
        println!(
            "\n{}",
            style(format!(
                "{} — A Professional Synthesis of {}'s Work",
                outcome.request.title, outcome.request.author
            ))
            .bold()
        );

        Self::header("Executive Summary");
        println!("  \"{}\"", outcome.analysis.executive_summary);

        Self::header("Key Concept Mastery");
        for concept in &outcome.analysis.key_concepts {
            println!(
                "  {} {} {}",
                style("*").cyan(),
                style(&concept.title).bold(),
                style(format!("(impact: {}%)", concept.importance)).dim()
            );
            println!("    {}", concept.description);
        }

        Self::header("Actionable Intelligence");
        for insight in &outcome.analysis.actionable_insights {
            Self::list_item(insight);
        }

        Self::header("Historical Context");
        println!("  {}", outcome.analysis.historical_context);

        Self::header("Contemporary Relevance");
        println!("  {}", outcome.analysis.contemporary_relevance);

        Self::header("Structural Breakdown");
        for chapter in &outcome.analysis.chapter_breakdown {
            println!(
                "  {} {}: {}",
                style("*").cyan(),
                style(&chapter.chapter).bold(),
                chapter.key_takeaway
            );
        }

        Self::header("Grounding Sources");
        if outcome.sources.is_empty() {
            println!("  {}", style("No external sources cited.").dim());
        } else {
            for source in &outcome.sources {
                println!(
                    "  {} {} {}",
                    style("*").cyan(),
                    source.title,
                    style(&source.uri).dim()
                );
            }
        }
    }
}
