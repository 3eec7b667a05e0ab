use crate::extract_ann_fields::{TranscriptHandling, ANN_FIELD_COUNT, ANN_HEADER};
use crate::get_fields_from_header::{extract_flag_ids, extract_format_ids, extract_info_ids};
use crate::read_vcf_header::VcfHeader;
use log::warn;

/// Fixed leading columns of every output row.
pub const FIXED_COLUMNS: [&str; 7] = ["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER"];

/// Row shaping requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One row per variant, samples spread across columns.
    #[default]
    Wide,
    /// One row per variant and sample.
    Long,
}

/// Options that decide the shape of the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub print_header: bool,
    pub expand_ann: bool,
    pub transcript_handling: TranscriptHandling,
}

/// Run-scoped, read-only description of the columns.
///
/// Built once from the VCF header and shared by the parser, shaper and writer.
#[derive(Debug, Clone)]
pub struct RunLayout {
    sample_names: Vec<String>,
    info_ids: Vec<String>,
    /// INFO ids declared `Type=Flag`.
    flag_ids: Vec<String>,
    format_ids: Vec<String>,
    options: ConvertOptions,
}

impl RunLayout {
    pub fn new(
        sample_names: Vec<String>,
        info_ids: Vec<String>,
        format_ids: Vec<String>,
        options: ConvertOptions,
    ) -> Self {
        RunLayout {
            sample_names,
            info_ids,
            flag_ids: Vec::new(),
            format_ids,
            options,
        }
    }

    pub fn with_flag_ids(mut self, flag_ids: Vec<String>) -> Self {
        self.flag_ids = flag_ids;
        self
    }

    pub fn from_header(header: &VcfHeader, options: ConvertOptions) -> Self {
        let info_ids = extract_info_ids(&header.meta);
        let format_ids = extract_format_ids(&header.meta);

        if options.expand_ann && !info_ids.iter().any(|id| id == "ANN") {
            warn!("⚠️  ANN expansion requested but the header declares no ANN field; columns will be empty");
        }
        if !header.sample_names.is_empty() && format_ids.is_empty() {
            warn!("Samples present but no ##FORMAT fields declared; no genotype columns");
        }

        RunLayout::new(header.sample_names.clone(), info_ids, format_ids, options)
            .with_flag_ids(extract_flag_ids(&header.meta))
    }

    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    pub fn info_ids(&self) -> &[String] {
        &self.info_ids
    }

    pub fn is_flag(&self, info_id: &str) -> bool {
        self.flag_ids.iter().any(|id| id == info_id)
    }

    pub fn format_ids(&self) -> &[String] {
        &self.format_ids
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Number of sample tokens each flattened line carries.
    ///
    /// Zero when no FORMAT fields are declared, since the flattener then emits
    /// no per-sample block at all.
    pub fn sample_token_count(&self) -> usize {
        if self.format_ids.is_empty() {
            0
        } else {
            self.sample_names.len()
        }
    }

    /// Width of the shared prefix: fixed, INFO and (optionally) ANN columns.
    pub fn prefix_width(&self) -> usize {
        let ann = if self.options.expand_ann {
            ANN_FIELD_COUNT
        } else {
            0
        };
        FIXED_COLUMNS.len() + self.info_ids.len() + ann
    }

    /// Column names in output order.
    pub fn header(&self) -> Vec<String> {
        let mut headers: Vec<String> = FIXED_COLUMNS.iter().map(|s| s.to_string()).collect();
        headers.extend(self.info_ids.iter().cloned());

        if self.options.expand_ann {
            headers.extend(ANN_HEADER.iter().map(|s| s.to_string()));
        }

        match self.options.format {
            OutputFormat::Wide => {
                for sample in &self.sample_names {
                    for format_key in &self.format_ids {
                        headers.push(format!("{sample}.{format_key}"));
                    }
                }
            }
            OutputFormat::Long => {
                headers.push("sample".to_string());
                headers.extend(self.format_ids.iter().cloned());
            }
        }

        headers
    }
}
