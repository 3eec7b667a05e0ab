use crate::error::Result;
use crate::flatten_vcf::Flattener;
use crate::parse_flat_row::VariantRecord;
use crate::read_vcf_header::read_vcf_header;
use crate::run_layout::{ConvertOptions, RunLayout};
use crate::shape_rows::shape_record;
use crate::write_tsv::TsvWriter;
use log::info;
use std::io::Write;
use std::path::Path;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub variants: usize,
    pub rows: usize,
}

/// Convert one VCF file: read its header, flatten it, write TSV to `out`.
pub fn convert_vcf_to_tsv<F, W>(
    vcf_path: &Path,
    options: ConvertOptions,
    flattener: &F,
    out: W,
) -> Result<ConvertSummary>
where
    F: Flattener + ?Sized,
    W: Write,
{
    let header = read_vcf_header(vcf_path)?;
    let layout = RunLayout::from_header(&header, options);

    info!(
        "📑 {} samples, {} INFO fields, {} FORMAT fields",
        layout.sample_names().len(),
        layout.info_ids().len(),
        layout.format_ids().len()
    );

    let lines = flattener.open(vcf_path, &layout)?;
    write_flat_lines(lines, &layout, out)
}

/// Parse, shape and write already flattened lines.
///
/// Stops at the first error; rows written before it stay written. The header goes out
/// with the first record, or at the end of a clean stream with no records, so a run
/// that fails before any record leaves `out` untouched.
pub fn write_flat_lines<I, W>(lines: I, layout: &RunLayout, out: W) -> Result<ConvertSummary>
where
    I: IntoIterator<Item = Result<String>>,
    W: Write,
{
    let mut writer = TsvWriter::new(out);
    let mut summary = ConvertSummary::default();
    let mut header_pending = layout.options().print_header;

    for (n, line) in lines.into_iter().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let record = VariantRecord::from_flat_line(&line, n + 1, layout)?;
        summary.variants += 1;

        if header_pending {
            writer.write_header(&layout.header())?;
            header_pending = false;
        }
        for row in shape_record(&record, layout) {
            writer.write_row(&row)?;
        }
    }

    if header_pending {
        writer.write_header(&layout.header())?;
    }
    writer.flush()?;
    summary.rows = writer.rows_written();

    info!(
        "✅ {} variants -> {} rows",
        summary.variants, summary.rows
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Vcf2TsvError;
    use crate::run_layout::OutputFormat;

    fn layout(format: OutputFormat) -> RunLayout {
        RunLayout::new(
            vec!["s1".to_string(), "s2".to_string()],
            Vec::new(),
            vec!["GT".to_string(), "DP".to_string()],
            ConvertOptions {
                format,
                print_header: true,
                ..Default::default()
            },
        )
    }

    fn lines(raw: &[&str]) -> Vec<Result<String>> {
        raw.iter().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn test_write_flat_lines_wide() {
        let mut out = Vec::new();
        let summary = write_flat_lines(
            lines(&["chr1\t10\t.\tA\tT\t.\tPASS\t.\t0/1:7\t0/0:9"]),
            &layout(OutputFormat::Wide),
            &mut out,
        )
        .unwrap();

        assert_eq!(summary, ConvertSummary { variants: 1, rows: 1 });
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\ts1.GT\ts1.DP\ts2.GT\ts2.DP\n\
             chr1\t10\t.\tA\tT\t.\tPASS\t0/1\t7\t0/0\t9\n"
        );
    }

    #[test]
    fn test_malformed_row_aborts_with_line_number() {
        let mut out = Vec::new();
        let result = write_flat_lines(
            lines(&[
                "chr1\t10\t.\tA\tT\t.\tPASS\t.\t0/1:7\t0/0:9",
                "chr1\t20\t.\tA\tT\t.\tPASS\t.\t0/1:7",
            ]),
            &layout(OutputFormat::Long),
            &mut out,
        );

        assert!(matches!(result, Err(Vcf2TsvError::MalformedRow { line: 2, .. })));
    }

    #[test]
    fn test_stream_error_is_propagated() {
        let mut out = Vec::new();
        let stream: Vec<Result<String>> = vec![Err(Vcf2TsvError::MalformedRow {
            line: 0,
            reason: "boom".to_string(),
        })];
        assert!(write_flat_lines(stream, &layout(OutputFormat::Wide), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_failure_before_first_line_writes_nothing() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        let mut out = Vec::new();
        let stream: Vec<Result<String>> = vec![Err(Vcf2TsvError::ToolFailed {
            tool: "bcftools".to_string(),
            status: ExitStatus::from_raw(1 << 8),
        })];
        let result = write_flat_lines(stream, &layout(OutputFormat::Wide), &mut out);

        assert!(matches!(result, Err(Vcf2TsvError::ToolFailed { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_malformed_first_row_writes_no_header() {
        let mut out = Vec::new();
        let result = write_flat_lines(
            lines(&["chr1\t10\t.\tA\tT\t.\tPASS\t.\t0/1:7"]),
            &layout(OutputFormat::Wide),
            &mut out,
        );

        assert!(matches!(result, Err(Vcf2TsvError::MalformedRow { line: 1, .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_stream_still_writes_header() {
        let mut out = Vec::new();
        let summary =
            write_flat_lines(lines(&[]), &layout(OutputFormat::Long), &mut out).unwrap();

        assert_eq!(summary, ConvertSummary::default());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tsample\tGT\tDP\n"
        );
    }
}
