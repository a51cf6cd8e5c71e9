//! Good-case and bad-case transcripts.
//!
//! Queries where hybrid beats the baseline go to the good-case stream, queries
//! where it loses go to the bad-case stream; ties are not written. Each record:
//!
//! ```text
//! {number} {query}
//! --------------------------
//! gt {i}
//! {matched gold content}
//! ##{baseline} {i} {score}
//! {content}
//!
//! ##hybrid {i} {score}
//! {content}
//!
//! ```
//!
//! Good-case records list the gold items hybrid found, bad-case records the
//! gold items the baseline found.

use crate::search::types::{Channel, RetrievedResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const RULE: &str = "--------------------------";

/// One win or loss entry.
#[derive(Debug, Clone)]
pub struct TranscriptRecord<'a> {
    /// 0-based number among records of the same stream
    pub number: usize,
    pub query: &'a str,
    /// Gold contents matched by the winning channel
    pub gold: Vec<&'a str>,
    pub baseline_results: &'a [RetrievedResult],
    pub hybrid_results: &'a [RetrievedResult],
}

/// Path of the good-case transcript for `baseline` inside `dir`.
pub fn good_case_path(dir: &Path, baseline: Channel) -> PathBuf {
    dir.join(format!("{}_good_case.txt", baseline))
}

/// Path of the bad-case transcript for `baseline` inside `dir`.
pub fn bad_case_path(dir: &Path, baseline: Channel) -> PathBuf {
    dir.join(format!("{}_bad_case.txt", baseline))
}

/// Append-only writer over the two transcript streams.
pub struct TranscriptWriter<W: Write> {
    good: W,
    bad: W,
    baseline: Channel,
}

impl TranscriptWriter<BufWriter<File>> {
    /// Creates (truncating) `{baseline}_good_case.txt` and `{baseline}_bad_case.txt` in `dir`.
    pub fn create(dir: &Path, baseline: Channel) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let good = BufWriter::new(File::create(good_case_path(dir, baseline))?);
        let bad = BufWriter::new(File::create(bad_case_path(dir, baseline))?);
        Ok(Self::new(good, bad, baseline))
    }
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(good: W, bad: W, baseline: Channel) -> Self {
        Self {
            good,
            bad,
            baseline,
        }
    }

    /// Appends a record to the good-case stream.
    pub fn write_win(&mut self, record: &TranscriptRecord<'_>) -> io::Result<()> {
        write_record(&mut self.good, self.baseline, record)
    }

    /// Appends a record to the bad-case stream.
    pub fn write_loss(&mut self, record: &TranscriptRecord<'_>) -> io::Result<()> {
        write_record(&mut self.bad, self.baseline, record)
    }

    /// Flushes both streams and hands them back as `(good, bad)`.
    pub fn finish(mut self) -> io::Result<(W, W)> {
        self.good.flush()?;
        self.bad.flush()?;
        Ok((self.good, self.bad))
    }
}

fn write_record<W: Write>(
    out: &mut W,
    baseline: Channel,
    record: &TranscriptRecord<'_>,
) -> io::Result<()> {
    writeln!(out, "{} {}", record.number, record.query)?;
    writeln!(out, "{}", RULE)?;
    for (i, gold) in record.gold.iter().enumerate() {
        writeln!(out, "gt {}", i)?;
        writeln!(out, "{}", gold)?;
    }
    write_results(out, baseline.as_str(), record.baseline_results)?;
    write_results(out, "hybrid", record.hybrid_results)
}

fn write_results<W: Write>(out: &mut W, label: &str, results: &[RetrievedResult]) -> io::Result<()> {
    for (i, result) in results.iter().enumerate() {
        writeln!(out, "##{} {} {}", label, i, result.score)?;
        writeln!(out, "{}", result.content)?;
        writeln!(out)?;
    }
    Ok(())
}
