//! Human-readable stage summaries printed by the command line tool

use crate::corpus::{CleanReport, HarvestReport};
use crate::crawler::EscalationOutcome;
use crate::rewrite::SiteRewrite;

/// Formats the accepted crawl and every attempt that led to it
pub fn format_crawl_summary(outcome: &EscalationOutcome) -> String {
    let mut out = String::new();
    out.push_str("=== Crawl Summary ===\n\n");

    out.push_str("Attempts:\n");
    for attempt in &outcome.attempts {
        out.push_str(&format!(
            "  {}. {:<8} {} found, {} failed, {}s (started {}){}\n",
            attempt.attempt,
            attempt.strategy.as_str(),
            attempt.found,
            attempt.failed,
            attempt.duration_seconds(),
            attempt.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            if attempt.met_threshold { " ✓" } else { "" }
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "Accepted: {} crawl with {} URLs\n",
        outcome.strategy,
        outcome.result.len()
    ));
    if !outcome.result.failed().is_empty() {
        out.push_str(&format!(
            "Unfetched pages ({}):\n",
            outcome.result.failed().len()
        ));
        for url in outcome.result.failed() {
            out.push_str(&format!("  - {}\n", url));
        }
    }
    out
}

pub fn format_harvest_summary(report: &HarvestReport) -> String {
    let mut out = format!(
        "Harvested {} URLs: {} saved, {} unchanged, {} failed\n",
        report.total(),
        report.saved.len(),
        report.unchanged.len(),
        report.failed.len()
    );
    for url in &report.failed {
        out.push_str(&format!("  failed: {}\n", url));
    }
    out
}

pub fn format_rewrite_summary(rewrite: &SiteRewrite) -> String {
    let mut out = format!(
        "Links rewritten: {} across {} of {} documents\n",
        rewrite.links.links_rewritten, rewrite.links.documents_changed, rewrite.links.documents
    );
    out.push_str(&format!("Skipped URLs: {}\n", rewrite.links.skipped.len()));
    for url in &rewrite.links.skipped {
        out.push_str(&format!("  - {}\n", url));
    }
    out.push_str(&format!(
        "Backlink sections added: {} ({} already present)\n",
        rewrite.backlinks.injected.len(),
        rewrite.backlinks.already_present
    ));
    out
}

pub fn format_clean_summary(report: &CleanReport) -> String {
    format!(
        "Cleaned corpus: {} documents trimmed, {} empty files and {} empty folders removed\n",
        report.trimmed,
        report.removed_files.len(),
        report.removed_dirs.len()
    )
}
