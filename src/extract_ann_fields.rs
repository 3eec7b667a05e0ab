//! snpEff `ANN` expansion.
//!
//! Each ANN entry is a `|`-separated list of sixteen sub-fields; multiple entries
//! (one per transcript/effect) are separated by commas.

use log::warn;

pub const ANN_FIELD_COUNT: usize = 16;

/// Column names for the sixteen ANN sub-fields, in snpEff order.
pub const ANN_HEADER: [&str; ANN_FIELD_COUNT] = [
    "ANN_Allele",
    "ANN_Annotation",
    "ANN_Annotation_Impact",
    "ANN_Gene_Name",
    "ANN_Gene_ID",
    "ANN_Feature_Type",
    "ANN_Feature_ID",
    "ANN_Transcript_BioType",
    "ANN_Rank",
    "ANN_HGVS_c",
    "ANN_HGVS_p",
    "ANN_cDNA_pos_cDNA_length",
    "ANN_CDS_pos_CDS_length",
    "ANN_AA_pos_AA_length",
    "ANN_Distance",
    "ANN_Errors_Warnings_Info",
];

/// How to handle an ANN value carrying several comma-separated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptHandling {
    /// Keep the first entry only; one output row per variant.
    #[default]
    FirstOnly,
    /// Every entry becomes its own output row.
    SplitRows,
}

/// One parsed ANN entry, always exactly sixteen values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnRecord {
    fields: [String; ANN_FIELD_COUNT],
}

impl AnnRecord {
    /// The record used when a variant carries no ANN: sixteen empty strings.
    pub fn empty() -> Self {
        AnnRecord {
            fields: Default::default(),
        }
    }

    /// Split one ANN entry on `|`, padding missing trailing fields with empty strings.
    /// Anything past the sixteenth field is dropped.
    pub fn from_entry(entry: &str) -> Self {
        let mut record = AnnRecord::empty();
        let mut values = entry.split('|');

        for slot in record.fields.iter_mut() {
            match values.next() {
                Some(value) => *slot = value.to_string(),
                None => break,
            }
        }

        let extra = values.count();
        if extra > 0 {
            warn!("ANN entry has {extra} fields beyond {ANN_FIELD_COUNT}; truncating");
        }

        record
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        ANN_HEADER
            .iter()
            .position(|name| *name == column)
            .map(|i| self.fields[i].as_str())
    }
}

/// Find the raw value of the `ANN` key in an INFO string.
///
/// The key match is exact and case-sensitive.
pub fn find_ann_value(info: &str) -> Option<&str> {
    info.split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "ANN")
        .map(|(_, value)| value)
}

/// Expand the ANN field of an INFO string into one or more ANN records.
///
/// Always returns at least one record; a missing ANN yields a single empty record so
/// every row keeps the same column count.
pub fn expand_ann(info: &str, transcript_handling: TranscriptHandling) -> Vec<AnnRecord> {
    let Some(ann_value) = find_ann_value(info) else {
        return vec![AnnRecord::empty()];
    };

    let mut entries = ann_value.split(',');
    match transcript_handling {
        TranscriptHandling::FirstOnly => {
            let first = entries.next().unwrap_or_default();
            vec![AnnRecord::from_entry(first)]
        }
        TranscriptHandling::SplitRows => entries.map(AnnRecord::from_entry).collect(),
    }
}
