//! Result table persistence.
//!
//! The table is an ordered, append-only collection of experiment records,
//! persisted as CSV with a fixed header. Checkpointing rewrites the whole
//! file; there is no streaming append.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::experiment::{ExperimentRecord, FusionMethod, FusionWeight, GraspMetrics};

/// Fixed CSV header. Column names are preserved verbatim from the historical
/// result files (including the space-separated fusion columns).
pub const CSV_HEADER: &str = "object_path,user_input_point_number,user input fusion method,user input weight,distance_grasp_to_user_input_norm,grasp_quality,mean_evaluation_metric";

const FIELD_COUNT: usize = 7;

/// Ordered, append-only collection of experiment records.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    records: Vec<ExperimentRecord>,
}

impl ResultTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub fn push(&mut self, record: ExperimentRecord) {
        self.records.push(record);
    }

    /// All records, in insertion order
    pub fn records(&self) -> &[ExperimentRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of fallback records
    pub fn fallback_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_fallback()).count()
    }

    /// Rewrite the table to `path`.
    ///
    /// Checkpoint semantics: the destination is replaced wholesale so the
    /// file always reflects the full accumulated table. An undefined (NaN)
    /// distance is written as an empty field.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "{CSV_HEADER}")?;
        for record in &self.records {
            writeln!(
                file,
                "{},{},{},{},{},{},{}",
                record.object_path,
                record.point_index,
                record.method,
                record.weight,
                format_distance(record.metrics.distance_norm),
                record.metrics.grasp_quality,
                record.metrics.mean_evaluation_metric,
            )?;
        }
        file.flush()?;
        Ok(())
    }

    /// Load a previously persisted table.
    ///
    /// Malformed input (wrong header, wrong field count, unparseable values)
    /// is a hard error carrying the offending line number.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let header = lines
            .next()
            .transpose()?
            .ok_or_else(|| malformed(path, 1, "empty file"))?;
        if header != CSV_HEADER {
            return Err(malformed(path, 1, "unexpected header"));
        }

        let mut records = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_record(&line, path, line_no)?);
        }
        Ok(Self { records })
    }
}

fn format_distance(distance: f64) -> String {
    if distance.is_nan() {
        String::new()
    } else {
        distance.to_string()
    }
}

fn parse_record(line: &str, path: &Path, line_no: usize) -> Result<ExperimentRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(malformed(
            path,
            line_no,
            &format!("expected {FIELD_COUNT} fields, got {}", fields.len()),
        ));
    }

    let point_index: usize = fields[1]
        .parse()
        .map_err(|_| malformed(path, line_no, "invalid point number"))?;
    let method: FusionMethod = fields[2]
        .parse()
        .map_err(|_| malformed(path, line_no, "invalid fusion method"))?;
    let weight: FusionWeight = fields[3]
        .parse()
        .map_err(|_| malformed(path, line_no, "invalid fusion weight"))?;
    let distance_norm = parse_distance(fields[4])
        .ok_or_else(|| malformed(path, line_no, "invalid distance"))?;
    let grasp_quality: f64 = fields[5]
        .parse()
        .map_err(|_| malformed(path, line_no, "invalid grasp quality"))?;
    let mean_evaluation_metric: f64 = fields[6]
        .parse()
        .map_err(|_| malformed(path, line_no, "invalid evaluation metric"))?;

    Ok(ExperimentRecord::new(
        fields[0],
        point_index,
        method,
        weight,
        GraspMetrics {
            mean_evaluation_metric,
            grasp_quality,
            distance_norm,
        },
    ))
}

fn parse_distance(field: &str) -> Option<f64> {
    if field.is_empty() || field == "NaN" {
        return Some(f64::NAN);
    }
    field.parse().ok()
}

fn malformed(path: &Path, line: usize, message: &str) -> Error {
    Error::MalformedTable {
        path: path.display().to_string(),
        line,
        message: message.to_string(),
    }
}
