use crate::error::{Result, Vcf2TsvError};
use flate2::read::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fixed columns of the `#CHROM` line, before any FORMAT/sample columns.
const FIXED_COLUMN_COUNT: usize = 8;

/// The parts of a VCF header the converter needs.
#[derive(Debug, Clone, Default)]
pub struct VcfHeader {
    /// `##` meta lines, newline terminated.
    pub meta: String,
    /// Sample names from the `#CHROM` line, in file order.
    pub sample_names: Vec<String>,
}

/// Read the header of a plain or gzip/BGZF compressed VCF.
///
/// Reading stops at the first data line, so only the header is ever decompressed.
pub fn read_vcf_header(file_path: &Path) -> Result<VcfHeader> {
    if !file_path.is_file() {
        return Err(Vcf2TsvError::InputNotFound(file_path.to_path_buf()));
    }

    let unreadable = |source| Vcf2TsvError::InputUnreadable {
        path: file_path.to_path_buf(),
        source,
    };

    let mut file = File::open(file_path).map_err(unreadable)?;
    let mut magic = [0u8; 2];
    let magic_len = file.read(&mut magic).map_err(unreadable)?;
    // Reopen rather than seek so both branches start from a fresh handle
    let file = File::open(file_path).map_err(unreadable)?;

    let reader: Box<dyn BufRead> = if magic_len == 2 && magic == GZIP_MAGIC {
        debug!("{} is gzip compressed", file_path.display());
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    parse_header_lines(reader).map_err(|e| match e {
        Vcf2TsvError::Io(source) => unreadable(source),
        other => other,
    })
}

/// Collect header lines from any line reader.
pub fn parse_header_lines<R: BufRead>(reader: R) -> Result<VcfHeader> {
    let mut header = VcfHeader::default();

    for line in reader.lines() {
        let line_content = line?;

        if line_content.starts_with("##") {
            header.meta.push_str(&line_content);
            header.meta.push('\n');
        } else if line_content.starts_with("#CHROM") {
            let columns: Vec<&str> = line_content.trim_end().split('\t').collect();
            // Sample columns start after FORMAT
            if columns.len() > FIXED_COLUMN_COUNT + 1 {
                header.sample_names = columns[FIXED_COLUMN_COUNT + 1..]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
            }
            break;
        } else if !line_content.trim().is_empty() {
            // Data before #CHROM; nothing more to learn from the header
            break;
        }
    }

    debug!(
        "Header: {} meta lines, {} samples",
        header.meta.matches('\n').count(),
        header.sample_names.len()
    );

    Ok(header)
}
