use crate::error::{Result, Vcf2TsvError};
use crate::run_layout::RunLayout;

/// Tokens before the sample block: seven fixed fields plus INFO.
pub const LEADING_TOKEN_COUNT: usize = 8;

/// One flattened VCF data line.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chromosome: String,
    /// POS exactly as written by the flattener; checked to be an unsigned integer.
    pub position: String,
    pub id: Option<String>,
    pub reference: String,
    pub alternate: String,
    /// QUAL as written by the flattener, `.` when missing.
    pub quality: String,
    pub filter: String,
    pub info: String,
    /// Colon-joined FORMAT values, one entry per sample in file order.
    pub samples: Vec<String>,
}

impl VariantRecord {
    /// Parse one line of flattened output.
    ///
    /// `line_number` is 1-based and only used for error context.
    pub fn from_flat_line(line: &str, line_number: usize, layout: &RunLayout) -> Result<Self> {
        let malformed = |reason: String| Vcf2TsvError::MalformedRow {
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < LEADING_TOKEN_COUNT {
            return Err(malformed(format!(
                "expected at least {LEADING_TOKEN_COUNT} columns, found {}",
                fields.len()
            )));
        }

        let expected = LEADING_TOKEN_COUNT + layout.sample_token_count();
        if fields.len() != expected {
            return Err(malformed(format!(
                "expected {expected} columns ({} samples), found {}",
                layout.sample_token_count(),
                fields.len()
            )));
        }

        let position = fields[1];
        position
            .parse::<u64>()
            .map_err(|e| malformed(format!("invalid POS '{position}': {e}")))?;

        let quality = fields[5];
        if quality != "." {
            quality
                .parse::<f64>()
                .map_err(|e| malformed(format!("invalid QUAL '{quality}': {e}")))?;
        }

        let id = if fields[2] == "." {
            None
        } else {
            Some(fields[2].to_string())
        };

        let mut samples: Vec<String> = fields[LEADING_TOKEN_COUNT..]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Without FORMAT fields every sample still gets a (valueless) slot
        if samples.is_empty() {
            samples = vec![String::new(); layout.sample_names().len()];
        }

        Ok(VariantRecord {
            chromosome: fields[0].to_string(),
            position: position.to_string(),
            id,
            reference: fields[3].to_string(),
            alternate: fields[4].to_string(),
            quality: quality.to_string(),
            filter: fields[6].to_string(),
            info: fields[7].to_string(),
            samples,
        })
    }

    /// QUAL as a number, `None` when missing.
    pub fn quality_score(&self) -> Option<f64> {
        if self.quality == "." {
            None
        } else {
            self.quality.parse().ok()
        }
    }

    /// POS as a number.
    pub fn position_value(&self) -> Option<u64> {
        self.position.parse().ok()
    }

    /// Look up one INFO key.
    ///
    /// A bare key (Flag) reports `"1"`, as `bcftools query` prints it.
    pub fn get_info_field(&self, field_name: &str) -> Option<String> {
        for pair in self.info.split(';') {
            if let Some((key, value)) = pair.split_once('=') {
                if key == field_name {
                    return Some(value.to_string());
                }
            } else if pair == field_name {
                return Some("1".to_string());
            }
        }
        None
    }

    /// The seven fixed columns, as they appear in the output.
    pub fn fixed_values(&self) -> [String; 7] {
        [
            self.chromosome.clone(),
            self.position.clone(),
            self.id.clone().unwrap_or_else(|| ".".to_string()),
            self.reference.clone(),
            self.alternate.clone(),
            self.quality.clone(),
            self.filter.clone(),
        ]
    }

    /// One value per declared INFO key.
    ///
    /// Absent keys give `.`, except Flags, which give `0` (set Flags give `1`).
    pub fn info_values(&self, layout: &RunLayout) -> Vec<String> {
        layout
            .info_ids()
            .iter()
            .map(|id| {
                let absent = if layout.is_flag(id) { "0" } else { "." };
                match self.get_info_field(id) {
                    Some(_) if layout.is_flag(id) => "1".to_string(),
                    Some(value) => value,
                    None => absent.to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_layout::ConvertOptions;

    fn layout(samples: usize) -> RunLayout {
        RunLayout::new(
            (1..=samples).map(|i| format!("s{i}")).collect(),
            vec!["DP".to_string(), "DB".to_string(), "AF".to_string()],
            vec!["GT".to_string(), "DP".to_string()],
            ConvertOptions::default(),
        )
        .with_flag_ids(vec!["DB".to_string()])
    }

    #[test]
    fn test_parse_line_with_samples() {
        let line = "chr2\t200\trs123\tC\tT\t80\tPASS\tDP=20;DB\t0/1:20\t1/1:22";
        let record = VariantRecord::from_flat_line(line, 1, &layout(2)).unwrap();

        assert_eq!(record.chromosome, "chr2");
        assert_eq!(record.position, "200");
        assert_eq!(record.position_value(), Some(200));
        assert_eq!(record.id, Some("rs123".to_string()));
        assert_eq!(record.quality_score(), Some(80.0));
        assert_eq!(record.samples, vec!["0/1:20", "1/1:22"]);
        assert_eq!(record.info_values(&layout(2)), vec!["20", "1", "."]);
    }

    #[test]
    fn test_absent_flag_reports_zero() {
        let line = "chr2	200	.	C	T	80	PASS	AF=0.5	0/1:20";
        let record = VariantRecord::from_flat_line(line, 1, &layout(1)).unwrap();

        assert_eq!(record.info_values(&layout(1)), vec![".", "0", "0.5"]);
    }

    #[test]
    fn test_position_is_written_verbatim() {
        let line = "chr2	0100	.	C	T	80	PASS	.	0/1:20";
        let record = VariantRecord::from_flat_line(line, 1, &layout(1)).unwrap();

        assert_eq!(record.fixed_values()[1], "0100");
        assert_eq!(record.position_value(), Some(100));
    }

    #[test]
    fn test_missing_quality_and_id_kept_verbatim() {
        let line = "chr3\t300\t.\tG\tA\t.\tPASS\t.\t0/0:5";
        let record = VariantRecord::from_flat_line(line, 1, &layout(1)).unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.quality_score(), None);
        assert_eq!(record.fixed_values()[2], ".");
        assert_eq!(record.fixed_values()[5], ".");
    }

    #[test]
    fn test_too_few_fields_is_malformed() {
        let line = "chr3\t300\t.\tG\tA\t90\tPASS";
        let err = VariantRecord::from_flat_line(line, 7, &layout(0)).unwrap_err();
        assert!(matches!(err, Vcf2TsvError::MalformedRow { line: 7, .. }));
    }

    #[test]
    fn test_sample_count_mismatch_is_malformed() {
        let line = "chr1\t100\t.\tA\tG\t60\tPASS\tDP=10\t0/1:10";
        let err = VariantRecord::from_flat_line(line, 2, &layout(2)).unwrap_err();
        assert!(err.to_string().contains("expected 10 columns"));
    }

    #[test]
    fn test_invalid_position_is_malformed() {
        let line = "chr3\tinvalid\t.\tG\tA\t90\tPASS\tDP=30";
        assert!(VariantRecord::from_flat_line(line, 1, &layout(0)).is_err());
    }

    #[test]
    fn test_invalid_quality_is_malformed() {
        let line = "chr3\t300\t.\tG\tA\thigh\tPASS\tDP=30";
        assert!(VariantRecord::from_flat_line(line, 1, &layout(0)).is_err());
    }
}
