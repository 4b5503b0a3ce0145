//! Feature schema contract
//!
//! The single place the wire format is declared: the four required column
//! names in the exact order the model was trained on, the serde mapping from
//! those names onto [`StarRecord`], and the helpers that validate an
//! arbitrary-column CSV table against the schema before it reaches the model.

use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StarError};

/// Required feature columns, in the order the model expects them.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Temperature (K)",
    "Luminosity(L/Lo)",
    "Radius(R/Ro)",
    "Absolute magnitude(Mv)",
];

/// Name of the prediction column appended to bulk output.
pub const PREDICTED_COLUMN: &str = "Predicted Type";

/// One stellar observation.
///
/// Wire names (the serde renames) must stay in lockstep with
/// [`REQUIRED_COLUMNS`]; the internal field names are free to differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Surface temperature in Kelvin
    #[serde(rename = "Temperature (K)")]
    pub temperature: i64,

    /// Luminosity relative to the Sun
    #[serde(rename = "Luminosity(L/Lo)")]
    pub luminosity: f64,

    /// Radius relative to the Sun
    #[serde(rename = "Radius(R/Ro)")]
    pub radius: f64,

    /// Absolute magnitude (Mv), unbounded sign
    #[serde(rename = "Absolute magnitude(Mv)")]
    pub absolute_magnitude: f64,
}

impl StarRecord {
    /// Build a single-row feature table with columns in model order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = vec![
            Series::new(REQUIRED_COLUMNS[0].into(), &[self.temperature as f64]).into(),
            Series::new(REQUIRED_COLUMNS[1].into(), &[self.luminosity]).into(),
            Series::new(REQUIRED_COLUMNS[2].into(), &[self.radius]).into(),
            Series::new(REQUIRED_COLUMNS[3].into(), &[self.absolute_magnitude]).into(),
        ];
        Ok(DataFrame::new(columns)?)
    }
}

/// Required columns absent from `df`, in schema order.
pub fn missing_columns(df: &DataFrame) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect()
}

/// Select and reorder exactly the required columns, cast to f64.
///
/// Extra columns are dropped; the caller keeps the original table for
/// output. A cell that is empty or does not parse as a number is rejected
/// with an error naming the offending column.
pub fn feature_frame(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let col = df
            .column(name)
            .map_err(|_| StarError::SchemaError(format!("missing required column: {name}")))?;
        let cast = col
            .cast(&DataType::Float64)
            .map_err(|_| StarError::DataError(format!("column '{name}' is not numeric")))?;
        if cast.null_count() > 0 {
            return Err(StarError::DataError(format!(
                "column '{name}' contains missing or non-numeric values"
            )));
        }
        columns.push(cast);
    }
    Ok(DataFrame::new(columns)?)
}

/// Convert a feature table into a row-major matrix.
///
/// The table must carry exactly the required columns in model order; this is
/// the last gate before the data reaches the classifier.
pub fn feature_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    if names != REQUIRED_COLUMNS {
        return Err(StarError::SchemaError(format!(
            "expected feature columns {:?}, got {:?}",
            REQUIRED_COLUMNS, names
        )));
    }

    let cas: Vec<&Float64Chunked> = df
        .get_columns()
        .iter()
        .map(|c| c.f64())
        .collect::<PolarsResult<_>>()?;

    let mut data = Vec::with_capacity(df.height() * REQUIRED_COLUMNS.len());
    for i in 0..df.height() {
        for ca in &cas {
            let value = ca.get(i).ok_or_else(|| {
                StarError::DataError(format!("missing value at row {i}"))
            })?;
            data.push(value);
        }
    }

    Ok(Array2::from_shape_vec(
        (df.height(), REQUIRED_COLUMNS.len()),
        data,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_csv(text: &str) -> DataFrame {
        CsvReadOptions::default()
            .with_infer_schema_length(Some(100))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
            .finish()
            .unwrap()
    }

    #[test]
    fn test_record_to_dataframe_column_order() {
        let record = StarRecord {
            temperature: 5770,
            luminosity: 1.0,
            radius: 1.0,
            absolute_magnitude: 4.83,
        };
        let df = record.to_dataframe().unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, REQUIRED_COLUMNS);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_record_deserializes_from_wire_names() {
        let json = r#"{
            "Temperature (K)": 5770,
            "Luminosity(L/Lo)": 1.0,
            "Radius(R/Ro)": 1.0,
            "Absolute magnitude(Mv)": 4.83
        }"#;
        let record: StarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.temperature, 5770);
        assert_eq!(record.absolute_magnitude, 4.83);
    }

    #[test]
    fn test_record_rejects_missing_field() {
        let json = r#"{
            "Temperature (K)": 5770,
            "Luminosity(L/Lo)": 1.0,
            "Radius(R/Ro)": 1.0
        }"#;
        let err = serde_json::from_str::<StarRecord>(json).unwrap_err();
        assert!(err.to_string().contains("Absolute magnitude(Mv)"));
    }

    #[test]
    fn test_missing_columns_reports_in_schema_order() {
        let df = read_csv("Luminosity(L/Lo),extra\n1.0,a\n");
        let missing = missing_columns(&df);
        assert_eq!(
            missing,
            vec!["Temperature (K)", "Radius(R/Ro)", "Absolute magnitude(Mv)"]
        );
    }

    #[test]
    fn test_feature_frame_reorders_and_drops_extras() {
        let df = read_csv(
            "name,Radius(R/Ro),Absolute magnitude(Mv),Temperature (K),Luminosity(L/Lo)\n\
             Sun,1.0,4.83,5770,1.0\n",
        );
        let features = feature_frame(&df).unwrap();
        let names: Vec<&str> = features.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, REQUIRED_COLUMNS);
        assert_eq!(features.width(), 4);
    }

    #[test]
    fn test_feature_frame_rejects_non_numeric_cell() {
        let df = read_csv(
            "Temperature (K),Luminosity(L/Lo),Radius(R/Ro),Absolute magnitude(Mv)\n\
             hot,1.0,1.0,4.83\n",
        );
        let err = feature_frame(&df).unwrap_err();
        assert!(err.to_string().contains("Temperature (K)"));
    }

    #[test]
    fn test_feature_matrix_row_major() {
        let df = read_csv(
            "Temperature (K),Luminosity(L/Lo),Radius(R/Ro),Absolute magnitude(Mv)\n\
             5770,1.0,1.0,4.83\n\
             3042,0.0005,0.1542,16.65\n",
        );
        let x = feature_matrix(&feature_frame(&df).unwrap()).unwrap();
        assert_eq!(x.shape(), &[2, 4]);
        assert_eq!(x[[0, 0]], 5770.0);
        assert_eq!(x[[1, 3]], 16.65);
    }

    #[test]
    fn test_feature_matrix_rejects_wrong_columns() {
        let df = read_csv("a,b\n1,2\n");
        assert!(feature_matrix(&df).is_err());
    }

    #[test]
    fn test_csv_round_trip_preserves_passthrough_columns() {
        let mut df = read_csv(
            "Star color,Temperature (K),Luminosity(L/Lo),Radius(R/Ro),Absolute magnitude(Mv)\n\
             Red,3042,0.0005,0.1542,16.65\n\
             Blue,25000,80000.0,12.5,-6.2\n",
        );
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer).finish(&mut df).unwrap();

        let round = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(&buffer))
            .finish()
            .unwrap();

        assert_eq!(round.height(), df.height());
        assert_eq!(round.get_column_names(), df.get_column_names());
        let colors: Vec<Option<&str>> =
            round.column("Star color").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(colors, vec![Some("Red"), Some("Blue")]);
        let temps: Vec<Option<f64>> = round
            .column("Temperature (K)")
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(temps, vec![Some(3042.0), Some(25000.0)]);
    }
}
