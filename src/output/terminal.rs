// Colored terminal output for analysis results.
//
// main.rs delegates here for everything the `analyze` command prints.

use colored::Colorize;

use super::truncate_chars;
use crate::pipeline::result::{AnalysisResult, ThemeAnalysis};

/// Print the caller-facing result: one line per theme, or the error.
pub fn display_result(result: &AnalysisResult) {
    match result {
        AnalysisResult::Error { error } => {
            println!("{} {}", "Error:".red().bold(), error);
        }
        AnalysisResult::Summaries { summaries } => {
            println!(
                "\n{}",
                format!("=== Review Themes ({}) ===", summaries.len()).bold()
            );
            for s in summaries {
                println!("  {} {}", format!("[{}]", s.topic_id).cyan(), s.summary);
            }
            println!();
        }
    }
}

/// Print every theme with its size, keyphrases and representative reviews.
pub fn display_analysis(analysis: &ThemeAnalysis, reviews: &[String]) {
    println!(
        "\n{}",
        format!(
            "=== Review Themes ({} reviews, {} themes) ===",
            analysis.review_count,
            analysis.themes.len()
        )
        .bold()
    );

    for theme in &analysis.themes {
        let share = theme.members.len() as f64 / analysis.review_count.max(1) as f64;
        println!();
        println!(
            "  {} {} {}",
            format!("Theme {}", theme.topic_id).cyan().bold(),
            format!("({} reviews, {:.0}%)", theme.members.len(), share * 100.0).dimmed(),
            bar(share, 20).cyan(),
        );

        let summary = theme.summary.text();
        if theme.summary.is_failed() {
            println!("    {}", summary.yellow());
        } else {
            println!("    {}", summary);
        }

        if !theme.keyphrases.is_empty() {
            println!(
                "    {} {}",
                "Keyphrases:".dimmed(),
                theme.keyphrases.join(", ")
            );
        }

        for rep in &theme.representatives {
            let text = reviews.get(rep.index).map(String::as_str).unwrap_or("?");
            println!(
                "    {} {} {}",
                "-".dimmed(),
                truncate_chars(text, 100),
                format!("(d={:.3})", rep.distance).dimmed(),
            );
        }
    }

    if !analysis.empty_clusters.is_empty() {
        println!(
            "\n  {}",
            format!(
                "{} empty cluster(s) omitted: {:?}",
                analysis.empty_clusters.len(),
                analysis.empty_clusters
            )
            .dimmed()
        );
    }

    let failed = analysis.failed_summaries();
    if failed > 0 {
        println!(
            "\n  {} {} theme(s) could not be summarized",
            "!".yellow().bold(),
            failed
        );
    }
    println!();
}

/// A fixed-width bar for a 0.0-1.0 share.
fn bar(share: f64, width: usize) -> String {
    let filled = ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_full_and_empty() {
        assert_eq!(bar(1.0, 4), "[====]");
        assert_eq!(bar(0.0, 4), "[    ]");
        assert_eq!(bar(0.5, 4), "[==  ]");
    }
}
