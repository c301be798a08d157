//! Delimited text dataset implementation
//!
//! Supports loading datasets from delimited text files where:
//! - Each non-empty line is one example
//! - For labelled data, the last column is the integer category code
//! - All other columns are features
//! - Lines starting with `#` are comments
//! - A first row of mostly non-numeric fields is a header and is skipped

use crate::core::{Result, SVMError};
use log::debug;
use ndarray::{Array2, ArrayView2};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Field delimiter used when none is given
pub const DEFAULT_DELIMITER: char = '\t';

/// Dense dataset read from delimited text
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedDataset {
    features: Array2<f64>,
    labels: Vec<i32>,
}

impl DelimitedDataset {
    /// Build a dataset from in-memory features and labels
    pub fn new(features: Array2<f64>, labels: Vec<i32>) -> Result<Self> {
        if !labels.is_empty() && labels.len() != features.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Load a labelled dataset from a file
    pub fn from_file<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Load an unlabelled dataset from a file
    pub fn from_file_unlabeled<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        Self::from_reader_unlabeled(BufReader::new(file), delimiter)
    }

    /// Load a labelled dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R, delimiter: char) -> Result<Self> {
        Self::parse(reader, delimiter, true)
    }

    /// Load an unlabelled dataset from a reader; every column is a feature
    pub fn from_reader_unlabeled<R: BufRead>(reader: R, delimiter: char) -> Result<Self> {
        Self::parse(reader, delimiter, false)
    }

    fn parse<R: BufRead>(reader: R, delimiter: char, labelled: bool) -> Result<Self> {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        let mut width: Option<usize> = None;
        let mut rows = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields = split_fields(line, delimiter);

            if rows == 0 && width.is_none() && is_header_line(&fields, labelled) {
                debug!("Skipping header line {}", line_no + 1);
                continue;
            }

            let n_features = if labelled {
                if fields.len() < 2 {
                    return Err(SVMError::ParseError(format!(
                        "Line {} has too few fields: {}",
                        line_no + 1,
                        line
                    )));
                }
                fields.len() - 1
            } else {
                fields.len()
            };

            match width {
                None => width = Some(n_features),
                Some(expected) if expected != n_features => {
                    return Err(SVMError::ParseError(format!(
                        "Line {} has {} features, expected {}",
                        line_no + 1,
                        n_features,
                        expected
                    )));
                }
                Some(_) => {}
            }

            for (col, field) in fields.iter().take(n_features).enumerate() {
                let value = field.parse::<f64>().map_err(|_| {
                    SVMError::ParseError(format!(
                        "Invalid feature value at line {}, column {}: {}",
                        line_no + 1,
                        col + 1,
                        field
                    ))
                })?;
                values.push(value);
            }

            if labelled {
                let field = fields[n_features];
                labels.push(parse_label(field).ok_or_else(|| {
                    SVMError::ParseError(format!(
                        "Invalid label at line {}: {}",
                        line_no + 1,
                        field
                    ))
                })?);
            }

            rows += 1;
        }

        let width = match width {
            Some(width) if rows > 0 => width,
            _ => return Err(SVMError::EmptyDataset),
        };

        let features = Array2::from_shape_vec((rows, width), values)
            .map_err(|e| SVMError::InvalidDataset(e.to_string()))?;

        Ok(Self { features, labels })
    }

    /// Feature matrix, one example per row
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Mutable access to the features, used to normalize in place
    pub fn features_mut(&mut self) -> &mut Array2<f64> {
        &mut self.features
    }

    /// Category code per example, empty for unlabelled data
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn is_labelled(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of features per example
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Distinct positive category codes, in order of first appearance
    pub fn categories(&self) -> Vec<i32> {
        positive_categories(&self.labels)
    }

    /// Split into the feature matrix and the labels
    pub fn into_parts(self) -> (Array2<f64>, Vec<i32>) {
        (self.features, self.labels)
    }
}

/// Distinct labels greater than zero, in order of first appearance
pub fn positive_categories(labels: &[i32]) -> Vec<i32> {
    let mut categories = Vec::new();
    for &label in labels {
        if label > 0 && !categories.contains(&label) {
            categories.push(label);
        }
    }
    categories
}

fn split_fields(line: &str, delimiter: char) -> Vec<&str> {
    let fields = line.split(delimiter).map(str::trim);
    if delimiter.is_whitespace() {
        fields.filter(|f| !f.is_empty()).collect()
    } else {
        fields.collect()
    }
}

/// Category codes are integers; integral floats such as `2.0` are accepted
fn parse_label(field: &str) -> Option<i32> {
    if let Ok(label) = field.parse::<i32>() {
        return Some(label);
    }
    let value = field.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Check if a line appears to be a header
fn is_header_line(fields: &[&str], labelled: bool) -> bool {
    let candidates = if labelled && fields.len() > 1 {
        &fields[..fields.len() - 1]
    } else {
        fields
    };

    if candidates.is_empty() {
        return false;
    }

    let non_numeric_count = candidates
        .iter()
        .filter(|field| field.parse::<f64>().is_err())
        .count();

    non_numeric_count * 2 > candidates.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tab_delimited_labelled() {
        let data = "0.5\t1.0\t1\n1.5\t-2.0\t2\n\n3.0\t0.0\t1\n";
        let dataset = DelimitedDataset::from_reader(Cursor::new(data), '\t').unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.labels(), &[1, 2, 1]);
        assert_eq!(dataset.features()[[1, 1]], -2.0);
        assert!(dataset.is_labelled());
    }

    #[test]
    fn test_header_and_comments_are_skipped() {
        let data = "# iris subset\nsepal,petal,class\n5.1,1.4,1\n# trailing note\n6.3,4.9,2\n";
        let dataset = DelimitedDataset::from_reader(Cursor::new(data), ',').unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features()[[0, 0]], 5.1);
        assert_eq!(dataset.labels(), &[1, 2]);
    }

    #[test]
    fn test_space_delimiter_collapses_runs() {
        let data = "1.0   2.0  3\n4.0 5.0 0\n";
        let dataset = DelimitedDataset::from_reader(Cursor::new(data), ' ').unwrap();
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.labels(), &[3, 0]);
    }

    #[test]
    fn test_unlabelled() {
        let data = "1|2|3\n4|5|6\n";
        let dataset = DelimitedDataset::from_reader_unlabeled(Cursor::new(data), '|').unwrap();
        assert_eq!(dataset.n_features(), 3);
        assert!(!dataset.is_labelled());
        assert!(dataset.categories().is_empty());
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let data = "0.1;3\n0.2;0\n0.3;1\n0.4;3\n0.5;-1\n0.6;2\n";
        let dataset = DelimitedDataset::from_reader(Cursor::new(data), ';').unwrap();
        assert_eq!(dataset.categories(), vec![3, 1, 2]);
    }

    #[test]
    fn test_positive_categories() {
        assert_eq!(positive_categories(&[2, 0, 2, 5, -1, 1]), vec![2, 5, 1]);
        assert!(positive_categories(&[]).is_empty());
    }

    #[test]
    fn test_integral_float_labels() {
        let data = "1.0,2.0\n3.0,1.0\n";
        let dataset = DelimitedDataset::from_reader(Cursor::new(data), ',').unwrap();
        assert_eq!(dataset.labels(), &[2, 1]);

        let data = "1.0,2.5\n";
        assert!(matches!(
            DelimitedDataset::from_reader(Cursor::new(data), ','),
            Err(SVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let data = "1,2,1\n3,1\n";
        assert!(matches!(
            DelimitedDataset::from_reader(Cursor::new(data), ','),
            Err(SVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_feature() {
        let data = "1,2,1\n3,abc,1\n";
        assert!(matches!(
            DelimitedDataset::from_reader(Cursor::new(data), ','),
            Err(SVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            DelimitedDataset::from_reader(Cursor::new(""), ','),
            Err(SVMError::EmptyDataset)
        ));
        assert!(matches!(
            DelimitedDataset::from_reader(Cursor::new("# only a comment\n"), ','),
            Err(SVMError::EmptyDataset)
        ));
    }

    #[test]
    fn test_new_checks_label_count() {
        let features = Array2::zeros((2, 3));
        assert!(DelimitedDataset::new(features.clone(), vec![1, 2]).is_ok());
        assert!(DelimitedDataset::new(features.clone(), vec![]).is_ok());
        assert!(matches!(
            DelimitedDataset::new(features, vec![1]),
            Err(SVMError::DimensionMismatch { .. })
        ));
    }
}
