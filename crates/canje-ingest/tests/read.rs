//! Integration tests for input loading.

use std::io::Write;

use canje_ingest::{IngestError, ReadOptions, read_table};
use tempfile::Builder;

#[test]
fn reads_survey_csv_with_accented_headers() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(
        file,
        "ID de la encuesta,Indicar tipo de Dinámica a canjear,Monto\n10,Dinámica Foco,15\n11,,\n"
    )
    .unwrap();

    let df = read_table(file.path(), &ReadOptions::default()).unwrap();

    assert_eq!(df.height(), 2);
    assert!(df.column("Indicar tipo de Dinámica a canjear").is_ok());
    let amounts = df.column("Monto").unwrap().str().unwrap();
    assert_eq!(amounts.get(0), Some("15"));
    assert_eq!(amounts.get(1), None);
}

#[test]
fn rejects_unknown_extension() {
    let file = Builder::new().suffix(".parquet").tempfile().unwrap();

    let result = read_table(file.path(), &ReadOptions::default());

    assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
}
