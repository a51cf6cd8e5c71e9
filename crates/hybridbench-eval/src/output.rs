//! Output formatting for comparison reports and ad-hoc searches.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use hybridbench_core::evaluation::EvaluationSummary;
use hybridbench_core::processing::IndexingStats;
use hybridbench_core::search::RetrievedResult;
use serde::Serialize;
use std::path::PathBuf;

/// Maximum characters to show in text snippet
const SNIPPET_MAX_LEN: usize = 200;

/// Full result of a `compare` run.
#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub corpus: IndexingStats,
    pub embedder: String,
    pub summary: EvaluationSummary,
    pub transcripts: TranscriptPaths,
}

#[derive(Debug, Serialize)]
pub struct TranscriptPaths {
    pub good_case: PathBuf,
    pub bad_case: PathBuf,
}

/// JSON output structure for search results
#[derive(Serialize)]
pub struct JsonSearchOutput<'a> {
    pub query: &'a str,
    pub channel: &'a str,
    pub results: Vec<JsonSearchResult<'a>>,
}

#[derive(Serialize)]
pub struct JsonSearchResult<'a> {
    pub rank: usize,
    pub score: f32,
    pub chunk_id: &'a str,
    pub original_uuid: &'a str,
    pub original_index: u32,
    pub snippet: String,
}

/// Formats a comparison report as JSON.
pub fn format_report_json(report: &CompareReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a comparison report as a terminal table.
pub fn format_report_human(report: &CompareReport) -> String {
    let summary = &report.summary;
    let baseline = summary.baseline_channel.as_str();
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(80)));
    out.push_str(&format!("{} VS HYBRID RETRIEVAL\n", baseline.to_uppercase()));
    out.push_str(&format!("{}\n", "=".repeat(80)));
    out.push_str(&format!(
        "\nCorpus: {} documents, {} chunks (embedder: {})\n",
        report.corpus.documents, report.corpus.chunks, report.embedder
    ));
    out.push_str(&format!(
        "Queries: {} evaluated, {} skipped\n",
        summary.queries_evaluated, summary.queries_skipped
    ));
    out.push_str(&format!(
        "K={}  RRF k={}  match={:?}\n",
        summary.top_k, summary.rrf_k, summary.match_mode
    ));

    out.push_str(&format!("\n{}\n", "-".repeat(70)));
    out.push_str(&format!("RESULTS @ k={}\n", summary.top_k));
    out.push_str(&format!(
        "{:<12} {:>8} {:>8} {:>8}\n",
        "System", "Pass@K", "MRR", "Found"
    ));
    for (name, channel) in [(baseline, &summary.baseline), ("hybrid", &summary.hybrid)] {
        out.push_str(&format!(
            "{:<12} {:>8.4} {:>8.4} {:>8}\n",
            name, channel.pass_at_k, channel.mrr, channel.gold_found
        ));
    }

    out.push_str(&format!("\n{}\n", "-".repeat(70)));
    out.push_str("PER-QUERY OUTCOMES\n");
    out.push_str(&format!(
        "Hybrid wins: {}/{}\n",
        summary.hybrid_wins, summary.queries_evaluated
    ));
    out.push_str(&format!(
        "Hybrid loses: {}/{}\n",
        summary.hybrid_losses, summary.queries_evaluated
    ));
    out.push_str(&format!("Ties: {}/{}\n", summary.ties, summary.queries_evaluated));

    if let Some(test) = &summary.significance {
        out.push_str(&format!("\n{}\n", "-".repeat(70)));
        out.push_str("STATISTICAL COMPARISON (* = p < 0.05)\n");
        out.push_str(&format!(
            "hybrid vs {} (Pass@K): {} diff={:+.4}\n",
            baseline,
            test.format(),
            test.mean_difference
        ));
    }

    out.push_str(&format!("\n{}\n", "-".repeat(70)));
    out.push_str(&format!("Good cases: {}\n", report.transcripts.good_case.display()));
    out.push_str(&format!("Bad cases:  {}\n", report.transcripts.bad_case.display()));
    out.push_str(&format!("{}\n", "=".repeat(80)));
    out
}

/// Formats search results as JSON.
pub fn format_search_json(query: &str, channel: &str, results: &[RetrievedResult]) -> String {
    let output = JsonSearchOutput {
        query,
        channel,
        results: results
            .iter()
            .enumerate()
            .map(|(i, r)| JsonSearchResult {
                rank: i + 1,
                score: r.score,
                chunk_id: &r.chunk_id,
                original_uuid: &r.original_uuid,
                original_index: r.original_index,
                snippet: truncate_text(&r.content, SNIPPET_MAX_LEN),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats search results for human-readable terminal output.
pub fn format_search_human(query: &str, channel: &str, results: &[RetrievedResult]) -> String {
    if results.is_empty() {
        return format!("No {} results found for \"{}\"", channel, query);
    }

    let mut output = format!(
        "Found {} chunk{} for \"{}\" ({}):\n\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        query,
        channel
    );

    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} (score: {:.4})\n",
            i + 1,
            result.chunk_id,
            result.score
        ));
        let snippet = truncate_text(&result.content, SNIPPET_MAX_LEN);
        output.push_str(&format!("   {}\n\n", indent_text(&snippet, "   ")));
    }

    output.trim_end().to_string()
}

/// Truncates text to a maximum length, adding ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max_len)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}

/// Indents all lines of text after the first line.
fn indent_text(text: &str, indent: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
