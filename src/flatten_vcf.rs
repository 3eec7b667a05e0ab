//! Flattening VCF records into tab-separated lines.
//!
//! The real work is done by `bcftools query`; the pipeline only sees an iterator of
//! lines, so anything that can produce them (including an in-memory list) can stand
//! in for the external tool.

use crate::error::{Result, Vcf2TsvError};
use crate::run_layout::RunLayout;
use log::{debug, info};
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

pub const DEFAULT_BCFTOOLS: &str = "bcftools";

/// Lazily produced flattened lines.
pub type FlatLines = Box<dyn Iterator<Item = Result<String>>>;

/// Source of flattened VCF lines.
///
/// Each line carries the seven fixed columns, the raw INFO column, then one
/// colon-joined FORMAT token per sample.
pub trait Flattener {
    fn open(&self, path: &Path, layout: &RunLayout) -> Result<FlatLines>;
}

/// Build the `bcftools query -f` format string for a layout.
///
/// Escapes are left for bcftools to expand.
pub fn build_query_format(layout: &RunLayout) -> String {
    let mut query = String::from("%CHROM\\t%POS\\t%ID\\t%REF\\t%ALT\\t%QUAL\\t%FILTER\\t%INFO");

    if layout.sample_token_count() > 0 {
        let sample_fields: Vec<String> = layout
            .format_ids()
            .iter()
            .map(|id| format!("%{id}"))
            .collect();
        query.push_str("[\\t");
        query.push_str(&sample_fields.join(":"));
        query.push(']');
    }

    query.push_str("\\n");
    query
}

/// Runs `bcftools query` and streams its stdout.
#[derive(Debug, Clone)]
pub struct BcftoolsQuery {
    program: String,
}

impl BcftoolsQuery {
    pub fn new(program: impl Into<String>) -> Self {
        BcftoolsQuery {
            program: program.into(),
        }
    }
}

impl Flattener for BcftoolsQuery {
    fn open(&self, path: &Path, layout: &RunLayout) -> Result<FlatLines> {
        let query = build_query_format(layout);
        debug!("Running {} query -f '{}' {}", self.program, query, path.display());

        // stderr is inherited so the tool's own diagnostics reach the user untouched
        let mut child = Command::new(&self.program)
            .arg("query")
            .arg("-f")
            .arg(&query)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Vcf2TsvError::ToolNotFound {
                    tool: self.program.clone(),
                },
                _ => Vcf2TsvError::Io(e),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;

        info!("🔄 Streaming records from {}", self.program);

        Ok(Box::new(ChildLines {
            tool: self.program.clone(),
            lines: BufReader::new(stdout).lines(),
            child: Some(child),
        }))
    }
}

/// Line iterator over a running child; reaps it at end of stream.
struct ChildLines {
    tool: String,
    lines: Lines<BufReader<ChildStdout>>,
    child: Option<Child>,
}

impl Iterator for ChildLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.child.as_ref()?;

        match self.lines.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(e)) => {
                self.terminate();
                Some(Err(e.into()))
            }
            None => {
                let mut child = self.child.take()?;
                match child.wait() {
                    Ok(status) if status.success() => None,
                    Ok(status) => Some(Err(Vcf2TsvError::ToolFailed {
                        tool: self.tool.clone(),
                        status,
                    })),
                    Err(e) => Some(Err(e.into())),
                }
            }
        }
    }
}

impl ChildLines {
    fn terminate(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ChildLines {
    fn drop(&mut self) {
        // Stopped early (error or closed stdout): don't leave the tool running
        self.terminate();
    }
}
