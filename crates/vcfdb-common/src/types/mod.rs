//! Common types used across vcfdb

use serde::{Deserialize, Serialize};

use crate::error::{Result, VcfdbError};

/// Genotype code counted as heterozygous by the breakdown queries
pub const HETEROZYGOUS_CODE: &str = "0/1";

/// Genotype code counted as homozygous by the breakdown queries
pub const HOMOZYGOUS_CODE: &str = "1/1";

/// A chromosome/position pair used for lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locus {
    pub chromosome: String,
    pub position: i64,
}

impl Locus {
    pub fn new(chromosome: impl Into<String>, position: i64) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
        }
    }

    /// Build a locus from raw, possibly absent request parameters.
    ///
    /// Both values must be present and non-blank, and `pos` must parse as an
    /// integer. Nothing here touches storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcfdb_common::Locus;
    ///
    /// let locus = Locus::from_params(Some("chr1"), Some("100")).unwrap();
    /// assert_eq!(locus.position, 100);
    /// assert!(Locus::from_params(Some("chr1"), Some("abc")).is_err());
    /// ```
    pub fn from_params(chr: Option<&str>, pos: Option<&str>) -> Result<Self> {
        let chr = chr.map(str::trim).filter(|c| !c.is_empty());
        let pos = pos.map(str::trim).filter(|p| !p.is_empty());

        let (Some(chromosome), Some(pos)) = (chr, pos) else {
            return Err(VcfdbError::invalid_input("Missing 'chr' or 'pos' parameter"));
        };

        let position = pos
            .parse::<i64>()
            .map_err(|_| VcfdbError::invalid_input("Position must be an integer"))?;

        Ok(Self::new(chromosome, position))
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.position)
    }
}

/// Zygosity bucket derived from a stored genotype field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenotypeClass {
    Heterozygous,
    Homozygous,
    Other,
}

impl GenotypeClass {
    /// Classify a genotype field. Only exact matches count; phased calls such
    /// as `0|1` and missing values fall into [`GenotypeClass::Other`].
    pub fn classify(genotype_field: Option<&str>) -> Self {
        match genotype_field {
            Some(HETEROZYGOUS_CODE) => Self::Heterozygous,
            Some(HOMOZYGOUS_CODE) => Self::Homozygous,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for GenotypeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenotypeClass::Heterozygous => write!(f, "heterozygous"),
            GenotypeClass::Homozygous => write!(f, "homozygous"),
            GenotypeClass::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_locus_from_params() {
        let locus = Locus::from_params(Some("chr1"), Some("100")).unwrap();
        assert_eq!(locus, Locus::new("chr1", 100));
        assert_eq!(locus.to_string(), "chr1:100");
    }

    #[test]
    fn test_locus_trims_whitespace() {
        let locus = Locus::from_params(Some(" chrX "), Some(" 42 ")).unwrap();
        assert_eq!(locus, Locus::new("chrX", 42));
    }

    #[test]
    fn test_locus_missing_params() {
        for (chr, pos) in [(None, Some("1")), (Some("chr1"), None), (Some(""), Some("1"))] {
            let err = Locus::from_params(chr, pos).unwrap_err();
            assert!(err.is_client_error());
            assert!(err.to_string().contains("Missing"));
        }
    }

    #[test]
    fn test_locus_non_integer_position() {
        let err = Locus::from_params(Some("chr1"), Some("12.5")).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_genotype_classify() {
        assert_eq!(GenotypeClass::classify(Some("0/1")), GenotypeClass::Heterozygous);
        assert_eq!(GenotypeClass::classify(Some("1/1")), GenotypeClass::Homozygous);
        assert_eq!(GenotypeClass::classify(Some("0|1")), GenotypeClass::Other);
        assert_eq!(GenotypeClass::classify(Some("0/0")), GenotypeClass::Other);
        assert_eq!(GenotypeClass::classify(None), GenotypeClass::Other);
    }
}
