// Tab-separated variant file parser
//
// Layout:
//   ##key=value            metadata, skipped
//   #CHROM POS ID REF ALT ... <sample>
//   chr1   100 .  A   G   ... 0/1:30:99
//
// The last header column names the sample and becomes the file id. Data rows
// must have as many columns as the header. Only CHROM, POS, REF, ALT and the
// first colon-separated token of the sample column are kept.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use super::error::{IngestError, IngestResult};
use super::models::ParsedVcf;
use crate::db::VariantRow;

const METADATA_PREFIX: &str = "##";

/// Leading header columns, in order and with exact casing
pub const HEADER_COLUMNS: [&str; 5] = ["#CHROM", "POS", "ID", "REF", "ALT"];

const CHROM: usize = 0;
const POS: usize = 1;
const REF: usize = 3;
const ALT: usize = 4;

pub struct VcfParser {
    source: PathBuf,
}

impl VcfParser {
    /// `source` only labels errors; nothing is opened here
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read just far enough to find the header and return its sample column
    pub fn read_file_id<R: Read>(&self, reader: R) -> IngestResult<String> {
        let mut lines = BufReader::new(reader).lines();
        let (_, columns) = self.find_header(&mut lines)?;
        Ok(columns.last().cloned().unwrap_or_default())
    }

    /// Parse the header and every data row
    pub fn parse<R: Read>(&self, reader: R) -> IngestResult<ParsedVcf> {
        let mut lines = BufReader::new(reader).lines();
        let (header_line, columns) = self.find_header(&mut lines)?;
        let width = columns.len();

        let mut rows = Vec::new();
        for (offset, line) in lines.enumerate() {
            let line_no = header_line + offset + 1;
            let line = line.map_err(|e| IngestError::io(&self.source, e))?;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                continue;
            }

            rows.push(self.parse_row(line, line_no, width)?);
        }

        Ok(ParsedVcf {
            file_id: columns.last().cloned().unwrap_or_default(),
            rows,
        })
    }

    /// Skip metadata and validate the first remaining line. Returns its
    /// 1-based line number and its columns.
    fn find_header<B: BufRead>(
        &self,
        lines: &mut std::io::Lines<B>,
    ) -> IngestResult<(usize, Vec<String>)> {
        let mut line_no = 0;

        for line in lines.by_ref() {
            line_no += 1;
            let line = line.map_err(|e| IngestError::io(&self.source, e))?;

            if line.starts_with(METADATA_PREFIX) {
                continue;
            }

            let columns: Vec<String> = line
                .trim_end()
                .split('\t')
                .map(str::to_string)
                .collect();

            self.check_header(&columns)?;
            return Ok((line_no, columns));
        }

        Err(IngestError::header(
            &self.source,
            "file is empty or contains only metadata",
        ))
    }

    fn check_header(&self, columns: &[String]) -> IngestResult<()> {
        let leading = columns.iter().take(HEADER_COLUMNS.len()).map(String::as_str);
        if !leading.eq(HEADER_COLUMNS) {
            return Err(IngestError::header(
                &self.source,
                format!("found '{}'", columns.join("\t")),
            ));
        }

        match columns.last() {
            Some(id) if columns.len() > HEADER_COLUMNS.len() && !id.trim().is_empty() => Ok(()),
            _ => Err(IngestError::header(
                &self.source,
                "no sample column after ALT to take the file id from",
            )),
        }
    }

    fn parse_row(&self, line: &str, line_no: usize, width: usize) -> IngestResult<VariantRow> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != width {
            return Err(self.malformed(
                line_no,
                format!("expected {width} columns, found {}", fields.len()),
            ));
        }

        let position = fields[POS].trim().parse::<i64>().map_err(|_| {
            self.malformed(line_no, format!("POS '{}' is not an integer", fields[POS]))
        })?;

        Ok(VariantRow {
            chromosome: fields[CHROM].to_string(),
            position,
            reference_allele: fields[REF].to_string(),
            alternate_allele: fields[ALT].to_string(),
            genotype_field: genotype_token(fields[width - 1]),
        })
    }

    fn malformed(&self, line: usize, reason: String) -> IngestError {
        IngestError::MalformedRow {
            file: self.source.clone(),
            line,
            reason,
        }
    }
}

/// First colon-separated token of a sample cell, `None` when blank
pub fn genotype_token(cell: &str) -> Option<String> {
    cell.split(':')
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Read a file's id without reading past the header
pub fn read_file_id(path: &Path) -> IngestResult<String> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    VcfParser::new(path).read_file_id(file)
}

pub fn parse_file(path: &Path) -> IngestResult<ParsedVcf> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    VcfParser::new(path).parse(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "##fileformat=VCFv4.2\n\
        ##source=test\n\
        #CHROM\tPOS\tID\tREF\tALT\tsample1\n\
        chr1\t100\t.\tA\tG\t0/1:30:99\n\
        chr2\t200\trs7\tC\tT\t1/1\n";

    fn parser() -> VcfParser {
        VcfParser::new("sample.vcf")
    }

    #[test]
    fn test_parse_sample() {
        let parsed = parser().parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(parsed.file_id, "sample1");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.rows[0],
            VariantRow {
                chromosome: "chr1".to_string(),
                position: 100,
                reference_allele: "A".to_string(),
                alternate_allele: "G".to_string(),
                genotype_field: Some("0/1".to_string()),
            }
        );
        assert_eq!(parsed.rows[1].genotype_field.as_deref(), Some("1/1"));
    }

    #[test]
    fn test_read_file_id_ignores_rows() {
        let text = "#CHROM\tPOS\tID\tREF\tALT\tpatient-7\nnot\ta\tvalid\trow\n";
        assert_eq!(parser().read_file_id(text.as_bytes()).unwrap(), "patient-7");
    }

    #[test]
    fn test_extra_columns_use_last_for_genotype() {
        let text = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS9\n\
            chrX\t5\t.\tG\tA\t50\tPASS\tDP=3\tGT:DP\t0|1:3\n";
        let parsed = parser().parse(text.as_bytes()).unwrap();
        assert_eq!(parsed.file_id, "S9");
        assert_eq!(parsed.rows[0].genotype_field.as_deref(), Some("0|1"));
    }

    #[test]
    fn test_empty_file_is_header_error() {
        let err = parser().parse("".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::HeaderFormat { .. }));
    }

    #[test]
    fn test_metadata_only_is_header_error() {
        let err = parser().read_file_id("##a=b\n##c=d\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::HeaderFormat { .. }));
    }

    #[test]
    fn test_wrong_header_is_header_error() {
        for text in [
            "#chrom\tpos\tid\tref\talt\ts1\n",
            "CHROM\tPOS\tID\tREF\tALT\ts1\n",
            "#CHROM\tPOS\tREF\tALT\ts1\n",
            "chr1\t100\t.\tA\tG\t0/1\n",
        ] {
            let err = parser().parse(text.as_bytes()).unwrap_err();
            assert!(matches!(err, IngestError::HeaderFormat { .. }), "{text:?}");
        }
    }

    #[test]
    fn test_header_without_sample_column() {
        let err = parser().parse("#CHROM\tPOS\tID\tREF\tALT\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::HeaderFormat { .. }));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let parsed = parser()
            .parse("#CHROM\tPOS\tID\tREF\tALT\ts1\n\n".as_bytes())
            .unwrap();
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "#CHROM\tPOS\tID\tREF\tALT\ts1\r\nchr1\t1\t.\tA\tC\t0/1\r\n";
        let parsed = parser().parse(text.as_bytes()).unwrap();
        assert_eq!(parsed.file_id, "s1");
        assert_eq!(parsed.rows[0].genotype_field.as_deref(), Some("0/1"));
    }

    #[test]
    fn test_header_trailing_whitespace_is_ignored() {
        for header in [
            "#CHROM\tPOS\tID\tREF\tALT\tsample1\t\n",
            "#CHROM\tPOS\tID\tREF\tALT\tsample1  \n",
            "#CHROM\tPOS\tID\tREF\tALT\tsample1 \t\r\n",
        ] {
            let text = format!("{header}chr1\t7\t.\tA\tC\t1/1\n");
            let parsed = parser().parse(text.as_bytes()).unwrap();
            assert_eq!(parsed.file_id, "sample1", "header {header:?}");
            assert_eq!(parsed.rows.len(), 1);
            assert_eq!(parser().read_file_id(text.as_bytes()).unwrap(), "sample1");
        }
    }

    #[test]
    fn test_bad_position_reports_line() {
        let text = "##m\n#CHROM\tPOS\tID\tREF\tALT\ts1\nchr1\tabc\t.\tA\tC\t0/1\n";
        let err = parser().parse(text.as_bytes()).unwrap_err();
        match err {
            IngestError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_malformed() {
        let text = "#CHROM\tPOS\tID\tREF\tALT\ts1\nchr1\t1\t.\tA\n";
        let err = parser().parse(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_genotype_token() {
        assert_eq!(genotype_token("0/1:30:99").as_deref(), Some("0/1"));
        assert_eq!(genotype_token("1/1").as_deref(), Some("1/1"));
        assert_eq!(genotype_token(""), None);
        assert_eq!(genotype_token(":12"), None);
    }
}
