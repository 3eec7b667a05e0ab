use crate::extract_ann_fields::{expand_ann, AnnRecord};
use crate::parse_flat_row::VariantRecord;
use crate::run_layout::{OutputFormat, RunLayout};
use log::warn;

/// A finished output row.
///
/// Both shapes share the prefix of fixed, INFO and ANN columns; they differ only in
/// how sample data follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRow {
    /// One row per variant: every sample's FORMAT values, sample after sample.
    Wide {
        prefix: Vec<String>,
        sample_values: Vec<String>,
    },
    /// One row per variant and sample.
    Long {
        prefix: Vec<String>,
        sample: String,
        values: Vec<String>,
    },
}

impl OutputRow {
    pub fn prefix(&self) -> &[String] {
        match self {
            OutputRow::Wide { prefix, .. } | OutputRow::Long { prefix, .. } => prefix,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OutputRow::Wide {
                prefix,
                sample_values,
            } => prefix.len() + sample_values.len(),
            OutputRow::Long { prefix, values, .. } => prefix.len() + 1 + values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column values in output order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let (prefix, sample, rest) = match self {
            OutputRow::Wide {
                prefix,
                sample_values,
            } => (prefix.as_slice(), None, sample_values.as_slice()),
            OutputRow::Long {
                prefix,
                sample,
                values,
            } => (prefix.as_slice(), Some(sample), values.as_slice()),
        };

        prefix
            .iter()
            .chain(sample)
            .chain(rest.iter())
            .map(String::as_str)
    }
}

/// Split a colon-joined sample string into exactly `format_count` values.
///
/// Short samples are padded with empty strings and long ones truncated, with a warning.
pub fn split_sample(sample: &str, format_count: usize, sample_name: &str) -> Vec<String> {
    if format_count == 0 {
        return Vec::new();
    }

    let mut values: Vec<String> = sample.split(':').map(|s| s.to_string()).collect();
    if values.len() != format_count {
        warn!(
            "Sample '{sample_name}' has {} FORMAT values, expected {format_count}; adjusting",
            values.len()
        );
        values.resize(format_count, String::new());
    }
    values
}

/// Build the shared prefix for one ANN record.
fn build_prefix(
    record: &VariantRecord,
    layout: &RunLayout,
    ann: Option<&AnnRecord>,
) -> Vec<String> {
    let mut prefix = Vec::with_capacity(layout.prefix_width());
    prefix.extend(record.fixed_values());
    prefix.extend(record.info_values(layout));
    if let Some(ann) = ann {
        prefix.extend(ann.fields().iter().cloned());
    }
    prefix
}

/// Turn one variant into its output rows.
///
/// Wide gives one row (per ANN entry in split mode); long gives one row per sample.
pub fn shape_record(record: &VariantRecord, layout: &RunLayout) -> Vec<OutputRow> {
    let options = layout.options();
    let format_count = layout.format_ids().len();

    let sample_values: Vec<Vec<String>> = record
        .samples
        .iter()
        .zip(layout.sample_names())
        .map(|(sample, name)| split_sample(sample, format_count, name))
        .collect();

    let prefixes: Vec<Vec<String>> = if options.expand_ann {
        expand_ann(&record.info, options.transcript_handling)
            .iter()
            .map(|ann| build_prefix(record, layout, Some(ann)))
            .collect()
    } else {
        vec![build_prefix(record, layout, None)]
    };

    let mut rows = Vec::new();
    for prefix in prefixes {
        match options.format {
            OutputFormat::Wide => rows.push(OutputRow::Wide {
                prefix,
                sample_values: sample_values.concat(),
            }),
            OutputFormat::Long => {
                for (name, values) in layout.sample_names().iter().zip(&sample_values) {
                    rows.push(OutputRow::Long {
                        prefix: prefix.clone(),
                        sample: name.clone(),
                        values: values.clone(),
                    });
                }
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_ann_fields::TranscriptHandling;
    use crate::run_layout::ConvertOptions;

    fn layout(format: OutputFormat, expand_ann: bool) -> RunLayout {
        RunLayout::new(
            vec!["s1".to_string(), "s2".to_string()],
            vec!["DP".to_string()],
            vec!["GT".to_string(), "DP".to_string()],
            ConvertOptions {
                format,
                expand_ann,
                transcript_handling: TranscriptHandling::FirstOnly,
                print_header: false,
            },
        )
    }

    fn record(layout: &RunLayout, info: &str) -> VariantRecord {
        let line = format!("chr1\t100\t.\tA\tG\t50\tPASS\t{info}\t0/1:12\t1/1:30");
        VariantRecord::from_flat_line(&line, 1, layout).unwrap()
    }

    #[test]
    fn test_wide_row_spreads_samples() {
        let layout = layout(OutputFormat::Wide, false);
        let rows = shape_record(&record(&layout, "DP=42"), &layout);

        assert_eq!(rows.len(), 1);
        let values: Vec<&str> = rows[0].values().collect();
        assert_eq!(
            values,
            vec!["chr1", "100", ".", "A", "G", "50", "PASS", "42", "0/1", "12", "1/1", "30"]
        );
        assert_eq!(rows[0].len(), layout.header().len());
    }

    #[test]
    fn test_long_rows_one_per_sample() {
        let layout = layout(OutputFormat::Long, false);
        let rows = shape_record(&record(&layout, "DP=42"), &layout);

        assert_eq!(rows.len(), 2);
        let first: Vec<&str> = rows[0].values().collect();
        let second: Vec<&str> = rows[1].values().collect();
        assert_eq!(&first[8..], &["s1", "0/1", "12"]);
        assert_eq!(&second[8..], &["s2", "1/1", "30"]);
        assert_eq!(rows[0].prefix(), rows[1].prefix());
        assert_eq!(rows[0].len(), layout.header().len());
    }

    #[test]
    fn test_ann_absent_keeps_column_count() {
        let layout = layout(OutputFormat::Wide, true);
        let rows = shape_record(&record(&layout, "DP=42"), &layout);

        assert_eq!(rows[0].len(), layout.header().len());
        let values: Vec<&str> = rows[0].values().collect();
        assert!(values[8..24].iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_split_sample_pads_and_truncates() {
        assert_eq!(split_sample("0/1", 3, "s1"), vec!["0/1", "", ""]);
        assert_eq!(split_sample("0/1:1:2:3", 2, "s1"), vec!["0/1", "1"]);
        assert!(split_sample("0/1", 0, "s1").is_empty());
    }

    #[test]
    fn test_split_transcripts_multiply_long_rows() {
        let mut options = *layout(OutputFormat::Long, true).options();
        options.transcript_handling = TranscriptHandling::SplitRows;
        let layout = RunLayout::new(
            vec!["s1".to_string(), "s2".to_string()],
            vec!["DP".to_string()],
            vec!["GT".to_string(), "DP".to_string()],
            options,
        );

        let rows = shape_record(&record(&layout, "ANN=G|a|LOW,G|b|HIGH"), &layout);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].prefix()[9], "b");
    }
}
