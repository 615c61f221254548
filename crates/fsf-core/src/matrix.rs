//! Dense matrices and the FEAT design matrix (`.mat`) reader
//!
//! A `.mat` file is a few `/Name values...` header lines followed by a
//! `/Matrix` line and whitespace-separated rows:
//!
//! ```text
//! /NumWaves   2
//! /NumPoints  24
//! /PPheights  1.000000e+00 6.300000e+01
//!
//! /Matrix
//! 1.000000e+00 -9.960000e+00
//! ...
//! ```

use std::path::Path;

use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Row-major rectangular matrix of `f64`
///
/// Serializes as a list of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build from rows, which must all have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::RaggedMatrix {
                    row: idx,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).filter_map(move |r| self.row(r))
    }

    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col < self.cols {
            Some(self.rows().map(|row| row[col]).collect())
        } else {
            None
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Contents of a `.mat` design matrix file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DesignMatrix {
    pub num_waves: usize,
    pub num_points: usize,
    #[serde(rename = "PPheights")]
    pub pp_heights: Vec<f64>,
    pub matrix: Matrix,
}

impl DesignMatrix {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        parse_matrix(&crate::read_file(path)?)
    }
}

/// Parse `.mat` text
///
/// # Errors
/// `MatrixFormat` when a required header is missing or malformed, or when
/// the matrix shape disagrees with `NumPoints`/`NumWaves`.
pub fn parse_matrix(text: &str) -> Result<DesignMatrix> {
    let mut num_waves = None;
    let mut num_points = None;
    let mut pp_heights = None;
    let mut rows: Option<Vec<Vec<f64>>> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rows) = rows.as_mut() {
            rows.push(parse_numbers("Matrix", line.split_whitespace())?);
            continue;
        }
        let Some(header) = line.strip_prefix('/') else {
            return Err(Error::MatrixFormat(format!("unexpected line before /Matrix: '{}'", line)));
        };
        let mut parts = header.split_whitespace();
        match parts.next() {
            Some("NumWaves") => num_waves = Some(parse_count("NumWaves", parts.next())?),
            Some("NumPoints") => num_points = Some(parse_count("NumPoints", parts.next())?),
            Some("PPheights") => pp_heights = Some(parse_numbers("PPheights", parts)?),
            Some("Matrix") => rows = Some(Vec::new()),
            // e.g. /RegressorNames, /Stats
            _ => {}
        }
    }

    let missing = |name: &str| Error::MatrixFormat(format!("missing /{} header", name));
    let num_waves = num_waves.ok_or_else(|| missing("NumWaves"))?;
    let num_points = num_points.ok_or_else(|| missing("NumPoints"))?;
    let pp_heights = pp_heights.ok_or_else(|| missing("PPheights"))?;
    let rows = rows.ok_or_else(|| missing("Matrix"))?;

    if pp_heights.len() != num_waves {
        return Err(Error::MatrixFormat(format!(
            "{} PPheights for {} waves",
            pp_heights.len(),
            num_waves
        )));
    }
    if rows.len() != num_points {
        return Err(Error::MatrixFormat(format!(
            "{} rows for {} points",
            rows.len(),
            num_points
        )));
    }
    let matrix = if num_points == 0 {
        Matrix {
            rows: 0,
            cols: num_waves,
            data: Vec::new(),
        }
    } else {
        Matrix::from_rows(rows)?
    };
    if matrix.cols != num_waves {
        return Err(Error::MatrixFormat(format!(
            "{} columns for {} waves",
            matrix.cols, num_waves
        )));
    }

    Ok(DesignMatrix {
        num_waves,
        num_points,
        pp_heights,
        matrix,
    })
}

fn parse_count(header: &str, value: Option<&str>) -> Result<usize> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| Error::MatrixFormat(format!("/{} needs a count", header)))
}

fn parse_numbers<'a>(what: &str, values: impl Iterator<Item = &'a str>) -> Result<Vec<f64>> {
    values
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| Error::MatrixFormat(format!("bad {} value '{}'", what, v)))
        })
        .collect()
}
