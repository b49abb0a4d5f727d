use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Number, Value};

use crate::data::dataset::{Dataset, FILE_NAME_COLUMN};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the dataset as CSV: header = schema + `file_name`, one record per
/// row. NaN cells are rendered as the literal `NaN`.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.header())?;
    for row in dataset.rows() {
        let mut record: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        record.push(row.file_name.clone());
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_csv_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(dataset, file)
}

// ---------------------------------------------------------------------------
// JSON (records orient)
// ---------------------------------------------------------------------------

/// Write the dataset as a JSON array of records, one object per row — the
/// same records-oriented layout `df.to_json(orient='records')` produces.
/// NaN cells serialize as `null`, never as zero.
pub fn write_json<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let records: Vec<Value> = dataset
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (name, &value) in dataset.schema().iter().zip(&row.values) {
                let cell = Number::from_f64(value).map_or(Value::Null, Value::Number);
                obj.insert(name.clone(), cell);
            }
            obj.insert(
                FILE_NAME_COLUMN.to_string(),
                Value::String(row.file_name.clone()),
            );
            Value::Object(obj)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

pub fn write_json_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_json(dataset, file)
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Write the dataset as Parquet: one Float64 column per schema name plus a
/// Utf8 `file_name` column. NaN cells stay NaN (not null) so the columns
/// round-trip as plain float arrays.
pub fn write_parquet_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut fields: Vec<Field> = dataset
        .schema()
        .iter()
        .map(|name| Field::new(name.as_str(), DataType::Float64, false))
        .collect();
    fields.push(Field::new(FILE_NAME_COLUMN, DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(dataset.n_columns());
    for idx in 0..dataset.schema().len() {
        let values =
            Float64Array::from_iter_values(dataset.rows().iter().map(|r| r.values[idx]));
        columns.push(Arc::new(values));
    }
    let names: StringArray = dataset
        .rows()
        .iter()
        .map(|r| Some(r.file_name.as_str()))
        .collect();
    columns.push(Arc::new(names));

    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::data::dataset::DatasetRow;

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                DatasetRow {
                    file_name: "fit_one".to_string(),
                    values: vec![1.5, f64::NAN],
                },
                DatasetRow {
                    file_name: "fit_two".to_string(),
                    values: vec![2.5, 4.0],
                },
            ],
        )
    }

    #[test]
    fn csv_has_header_and_nan_cells() {
        let mut buf = Vec::new();
        write_csv(&sample_dataset(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("a,b,file_name"));
        assert_eq!(lines.next(), Some("1.5,NaN,fit_one"));
        assert_eq!(lines.next(), Some("2.5,4,fit_two"));
    }

    #[test]
    fn json_records_turn_nan_into_null() {
        let mut buf = Vec::new();
        write_json(&sample_dataset(), &mut buf).unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["a"], 1.5);
        assert!(records[0]["b"].is_null());
        assert_eq!(records[0]["file_name"], "fit_one");
        assert_eq!(records[1]["b"], 4.0);
    }

    #[test]
    fn parquet_round_trips_shape_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.parquet");
        write_parquet_file(&sample_dataset(), &path).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.collect::<std::result::Result<_, _>>().unwrap();

        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2);
        let names: Vec<String> = batches[0]
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, ["a", "b", "file_name"]);
    }
}
