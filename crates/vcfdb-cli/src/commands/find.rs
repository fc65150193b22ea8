//! `vcfdb find` command implementation
//!
//! Lists every stored variant at a chromosome/position pair.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, Table};
use inquire::{CustomType, Text};
use vcfdb_common::Locus;
use vcfdb_server::db::VariantRecord;

use crate::error::Result;

/// Look up a locus, prompting for whichever value was not given
pub async fn run(database_url: &str, chr: Option<String>, pos: Option<String>) -> Result<()> {
    let chr = match chr {
        Some(chr) => chr,
        None => Text::new("Chromosome name (e.g. chr1):").prompt()?,
    };
    let pos = match pos {
        Some(pos) => pos,
        None => CustomType::<i64>::new("Position:")
            .with_error_message("Please enter an integer")
            .prompt()?
            .to_string(),
    };

    // Validate before opening the store
    let locus = Locus::from_params(Some(&chr), Some(&pos))?;

    let store = super::open_store(database_url).await?;
    let records = store.variants_at(&locus).await?;
    let total_files = store.distinct_file_count().await?;

    println!("{}", title(records.len(), total_files));
    if !records.is_empty() {
        println!("{}", format_as_table(&records));
    }

    Ok(())
}

fn title(occurrences: usize, total_files: i64) -> String {
    let noun = if occurrences == 1 { "occurrence" } else { "occurrences" };
    format!(
        "Found {} across {} seen files",
        format!("{} {}", occurrences, noun).bold().magenta(),
        total_files
    )
}

/// Format matches as table
fn format_as_table(records: &[VariantRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["S.No.", "file_id", "REF", "ALT", "#CHROM", "POS", "IDF"]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i).set_alignment(CellAlignment::Right),
            Cell::new(&record.file_id),
            Cell::new(&record.reference_allele).set_alignment(CellAlignment::Center),
            Cell::new(&record.alternate_allele).set_alignment(CellAlignment::Center),
            Cell::new(&record.chromosome),
            Cell::new(record.position),
            Cell::new(record.genotype_field.as_deref().unwrap_or("")),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_id: &str, genotype: Option<&str>) -> VariantRecord {
        VariantRecord {
            record_id: 1,
            chromosome: "chr1".to_string(),
            position: 100,
            reference_allele: "A".to_string(),
            alternate_allele: "G".to_string(),
            genotype_field: genotype.map(str::to_string),
            file_id: file_id.to_string(),
        }
    }

    #[test]
    fn test_table_has_one_row_per_match() {
        let table = format_as_table(&[record("sample1", Some("0/1")), record("sample2", None)]);
        let rendered = table.to_string();

        assert_eq!(table.row_iter().count(), 2);
        assert!(rendered.contains("file_id"));
        assert!(rendered.contains("IDF"));
        assert!(rendered.contains("sample1"));
        assert!(rendered.contains("0/1"));
        assert!(rendered.contains("sample2"));
    }

    #[test]
    fn test_title_mentions_counts() {
        colored::control::set_override(false);
        assert_eq!(title(1, 3), "Found 1 occurrence across 3 seen files");
        assert_eq!(title(0, 0), "Found 0 occurrences across 0 seen files");
    }

    #[tokio::test]
    async fn test_non_integer_position_is_rejected() {
        let err = run("sqlite::memory:", Some("chr1".into()), Some("abc".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::CliError::InvalidInput(_)));
    }
}
