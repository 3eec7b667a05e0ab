pub mod convert_vcf;
pub mod error;
pub mod extract_ann_fields;
pub mod flatten_vcf;
pub mod get_fields_from_header;
pub mod parse_flat_row;
pub mod read_vcf_header;
pub mod run_layout;
pub mod shape_rows;
pub mod write_tsv;
