use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    CLASS_COLUMN, ColorAttribute, LAUNCH_SITE_COLUMN, LaunchDataset, LaunchRecord, OutcomeClass,
    PAYLOAD_MASS_COLUMN, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least `Launch Site`, `Payload Mass (kg)`, `class`
/// * `.json`    – `[{ "Launch Site": "...", "Payload Mass (kg)": 500.0, "class": 1, ... }, ...]`
/// * `.parquet` – same columns, any string / numeric Arrow types
///
/// Any failure here is fatal for the dashboard: there is nothing to render
/// without the table.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} launch records from {} ({} sites, payload {}..{} kg, colour by '{}')",
        dataset.len(),
        path.display(),
        dataset.sites().len(),
        dataset.bounds().min,
        dataset.bounds().max,
        dataset.color_attribute().column_name(),
    );
    Ok(dataset)
}

fn finish(records: Vec<LaunchRecord>, color_attribute: ColorAttribute) -> Result<LaunchDataset> {
    LaunchDataset::from_records(records, color_attribute)
        .context("dataset contains no launch records")
}

/// The booster column to read, if the resolved attribute is one.
fn booster_column(attr: ColorAttribute) -> Option<&'static str> {
    match attr {
        ColorAttribute::LaunchSite => None,
        other => Some(other.column_name()),
    }
}

// ---------------------------------------------------------------------------
// Cell validation (shared by all formats)
// ---------------------------------------------------------------------------

fn check_site(site: &str, row: usize) -> Result<String> {
    let site = site.trim();
    if site.is_empty() {
        bail!("Row {row}: empty '{LAUNCH_SITE_COLUMN}'");
    }
    Ok(site.to_string())
}

fn check_payload(value: f64, row: usize) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        bail!("Row {row}: '{PAYLOAD_MASS_COLUMN}' must be a non-negative number, got {value}");
    }
    Ok(value)
}

fn check_class(value: f64, row: usize) -> Result<OutcomeClass> {
    OutcomeClass::from_f64(value)
        .with_context(|| format!("Row {row}: '{CLASS_COLUMN}' must be 0 or 1, got {value}"))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Extra columns (flight number, orbit, an unnamed index...) are ignored.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let index_of = |name: &str| headers.iter().position(|h| h == name);
    let [site_idx, payload_idx, class_idx] = REQUIRED_COLUMNS.map(index_of);
    let (Some(site_idx), Some(payload_idx), Some(class_idx)) = (site_idx, payload_idx, class_idx)
    else {
        bail!("CSV missing required columns {}", missing_columns(|c| index_of(c).is_some()));
    };

    let color_attribute = ColorAttribute::resolve(|c| index_of(c).is_some());
    let booster_idx = booster_column(color_attribute).and_then(index_of);

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let launch_site = check_site(record.get(site_idx).unwrap_or(""), row_no)?;

        let payload_raw = record.get(payload_idx).unwrap_or("").trim();
        let payload = payload_raw.parse::<f64>().with_context(|| {
            format!("Row {row_no}: '{payload_raw}' is not a number")
        })?;
        let payload_mass_kg = check_payload(payload, row_no)?;

        let class_raw = record.get(class_idx).unwrap_or("");
        let class = OutcomeClass::parse(class_raw).with_context(|| {
            format!("Row {row_no}: '{CLASS_COLUMN}' must be 0 or 1, got '{class_raw}'")
        })?;

        let booster_category = booster_idx
            .and_then(|i| record.get(i))
            .and_then(non_empty);

        records.push(LaunchRecord {
            launch_site,
            payload_mass_kg,
            class,
            booster_category,
        });
    }

    finish(records, color_attribute)
}

fn missing_columns(present: impl Fn(&str) -> bool) -> String {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present(c))
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 525.0, "class": 0,
///     "Booster Version Category": "v1.0" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<&Map<String, JsonValue>>>>()?;

    let has_column = |name: &str| rows.iter().any(|obj| obj.contains_key(name));
    if let Some(first) = rows.first() {
        let missing = missing_columns(|c| first.contains_key(c));
        if !missing.is_empty() {
            bail!("JSON records missing required columns {missing}");
        }
    }
    let color_attribute = ColorAttribute::resolve(has_column);
    let booster_key = booster_column(color_attribute);

    let mut records = Vec::with_capacity(rows.len());

    for (i, obj) in rows.iter().enumerate() {
        let launch_site = obj
            .get(LAUNCH_SITE_COLUMN)
            .and_then(JsonValue::as_str)
            .with_context(|| format!("Row {i}: missing or invalid '{LAUNCH_SITE_COLUMN}'"))?;
        let launch_site = check_site(launch_site, i)?;

        let payload = json_number(obj.get(PAYLOAD_MASS_COLUMN))
            .with_context(|| format!("Row {i}: missing or invalid '{PAYLOAD_MASS_COLUMN}'"))?;
        let payload_mass_kg = check_payload(payload, i)?;

        let class = json_number(obj.get(CLASS_COLUMN))
            .with_context(|| format!("Row {i}: missing or invalid '{CLASS_COLUMN}'"))?;
        let class = check_class(class, i)?;

        let booster_category = booster_key
            .and_then(|k| obj.get(k))
            .and_then(|v| match v {
                JsonValue::String(s) => non_empty(s),
                JsonValue::Null => None,
                other => Some(other.to_string()),
            });

        records.push(LaunchRecord {
            launch_site,
            payload_mass_kg,
            class,
            booster_category,
        });
    }

    finish(records, color_attribute)
}

/// Numbers, or numeric strings as some exporters write them.
fn json_number(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
/// Numeric columns of any integer / float width are cast to `Float64`,
/// string columns of either offset size to `Utf8`.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let has_column = |name: &str| schema.column_with_name(name).is_some();
    let missing = missing_columns(has_column);
    if !missing.is_empty() {
        bail!("Parquet file missing required columns {missing}");
    }
    let color_attribute = ColorAttribute::resolve(has_column);
    let booster_name = booster_column(color_attribute);

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        append_batch(&batch, booster_name, offset, &mut records)?;
    }

    finish(records, color_attribute)
}

fn append_batch(
    batch: &RecordBatch,
    booster_name: Option<&str>,
    offset: usize,
    records: &mut Vec<LaunchRecord>,
) -> Result<()> {
    let sites = column_as(batch, LAUNCH_SITE_COLUMN, &DataType::Utf8)?;
    let payloads = column_as(batch, PAYLOAD_MASS_COLUMN, &DataType::Float64)?;
    let classes = column_as(batch, CLASS_COLUMN, &DataType::Float64)?;
    let boosters = booster_name
        .map(|name| column_as(batch, name, &DataType::Utf8))
        .transpose()?;

    let sites = sites.as_string::<i32>();
    let payloads = payloads.as_primitive::<Float64Type>();
    let classes = classes.as_primitive::<Float64Type>();
    let boosters = boosters.as_ref().map(|b| b.as_string::<i32>());

    for i in 0..batch.num_rows() {
        let row = offset + i;
        if sites.is_null(i) || payloads.is_null(i) || classes.is_null(i) {
            bail!("Row {row}: null in a required column");
        }

        let booster_category = boosters
            .filter(|b| !b.is_null(i))
            .and_then(|b| non_empty(b.value(i)));

        records.push(LaunchRecord {
            launch_site: check_site(sites.value(i), row)?,
            payload_mass_kg: check_payload(payloads.value(i), row)?,
            class: check_class(classes.value(i), row)?,
            booster_category,
        });
    }
    Ok(())
}

/// Fetch a column by name and cast it to `to`.
fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("Parquet batch missing '{name}' column"))?;
    cast(col, to).with_context(|| format!("'{name}' column: cannot read {:?} as {to:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = ",Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category";

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_with_booster_category() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "launches.csv",
            &format!(
                "{HEADER}\n\
                 0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0\n\
                 1,2,CCAFS LC-40,1,525.0,F9 v1.0  B0004,v1.0\n\
                 2,3,VAFB SLC-4E,1,9600.0,F9 FT B1029.1,FT\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.color_attribute(), ColorAttribute::BoosterVersionCategory);
        assert_eq!(ds.bounds().min, 0.0);
        assert_eq!(ds.bounds().max, 9600.0);
        assert_eq!(ds.records()[2].launch_site, "VAFB SLC-4E");
        assert_eq!(ds.records()[2].class, OutcomeClass::Success);
        assert_eq!(ds.records()[2].booster_category.as_deref(), Some("FT"));
    }

    #[test]
    fn csv_falls_back_to_booster_version() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "launches.csv",
            "Launch Site,Payload Mass (kg),class,Booster Version\n\
             KSC LC-39A,2490,1,F9 FT B1031.1\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.color_attribute(), ColorAttribute::BoosterVersion);
        assert_eq!(ds.color_value(&ds.records()[0]), "F9 FT B1031.1");
    }

    #[test]
    fn csv_without_booster_colours_by_site() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "launches.csv",
            "Launch Site,Payload Mass (kg),class\nKSC LC-39A,2490,1\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.color_attribute(), ColorAttribute::LaunchSite);
        assert_eq!(ds.color_value(&ds.records()[0]), "KSC LC-39A");
    }

    #[test]
    fn csv_missing_required_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "Launch Site,class\nKSC LC-39A,1\n");

        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("'Payload Mass (kg)'"));
    }

    #[test]
    fn csv_rejects_bad_cells() {
        let dir = TempDir::new().unwrap();
        let class = write(
            &dir,
            "class.csv",
            "Launch Site,Payload Mass (kg),class\nKSC LC-39A,2490,3\n",
        );
        assert!(load_file(&class).is_err());

        let payload = write(
            &dir,
            "payload.csv",
            "Launch Site,Payload Mass (kg),class\nKSC LC-39A,-5,1\n",
        );
        assert!(load_file(&payload).is_err());
    }

    #[test]
    fn empty_and_missing_files_are_fatal() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.csv", "Launch Site,Payload Mass (kg),class\n");
        let err = load_file(&empty).unwrap_err();
        assert!(format!("{err:#}").contains("no launch records"));

        assert!(load_file(&dir.path().join("absent.csv")).is_err());
        let txt = write(&dir, "data.txt", "");
        assert!(load_file(&txt).is_err());
    }

    #[test]
    fn json_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "launches.json",
            r#"[
                {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": 3600.0, "class": 1,
                 "Booster Version Category": "FT"},
                {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": "4200", "class": 0.0,
                 "Booster Version Category": null}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].payload_mass_kg, 4200.0);
        assert_eq!(ds.records()[1].class, OutcomeClass::Failure);
        assert_eq!(ds.records()[1].booster_category, None);
    }

    #[test]
    fn json_missing_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", r#"[{"Launch Site": "X", "class": 1}]"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn parquet_with_mixed_numeric_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launches.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(LAUNCH_SITE_COLUMN, DataType::Utf8, false),
            Field::new(PAYLOAD_MASS_COLUMN, DataType::Float64, false),
            Field::new(CLASS_COLUMN, DataType::Int64, false),
            Field::new("Booster Version Category", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["KSC LC-39A", "VAFB SLC-4E"])),
                Arc::new(Float64Array::from(vec![5300.0, 9600.0])),
                Arc::new(Int64Array::from(vec![1, 0])),
                Arc::new(StringArray::from(vec![Some("FT"), None])),
            ],
        )
        .unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].class, OutcomeClass::Success);
        assert_eq!(ds.records()[1].booster_category, None);
        assert_eq!(ds.bounds().max, 9600.0);
    }
}
