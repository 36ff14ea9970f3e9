use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use std::io::Read;

/// A named table of string cells, as read from CSV
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_csv<R: Read>(reader: R, name: &str) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!(
            "CSV '{}' must contain at least one data row",
            name
        ));
    }

    Ok(Dataset {
        name: name.to_string(),
        headers,
        rows,
    })
}

impl Dataset {
    /// Case-insensitive header lookup
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                anyhow!(
                    "Column '{}' not found in dataset '{}'. Available columns: {}",
                    name,
                    self.name,
                    self.headers.join(", ")
                )
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Named datasets available to a plot. The first one added is the default.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    datasets: Vec<Dataset>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn insert(&mut self, dataset: Dataset) -> Result<()> {
        if self.datasets.iter().any(|d| d.name == dataset.name) {
            bail!("Dataset '{}' registered twice", dataset.name);
        }
        self.datasets.push(dataset);
        Ok(())
    }

    /// Look up a dataset by name, or the default one for `None`
    pub fn get(&self, name: Option<&str>) -> Result<&Dataset> {
        match name {
            Some(name) => self.datasets.iter().find(|d| d.name == name).ok_or_else(|| {
                anyhow!(
                    "Dataset '{}' not found. Available datasets: {}",
                    name,
                    self.names().join(", ")
                )
            }),
            None => self
                .datasets
                .first()
                .ok_or_else(|| anyhow!("No dataset loaded")),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl From<Dataset> for Catalog {
    fn from(dataset: Dataset) -> Self {
        Catalog {
            datasets: vec![dataset],
        }
    }
}

/// Parse one numeric cell; `row_idx` is 0-based and reported 1-based
pub fn parse_number(value: &str, column: &str, row_idx: usize) -> Result<f64> {
    value.trim().parse::<f64>().with_context(|| {
        format!(
            "Failed to parse value '{}' as number in column '{}' at row {}",
            value,
            column,
            row_idx + 1
        )
    })
}

#[cfg(test)]
pub(crate) fn dataset_from_str(name: &str, content: &str) -> Result<Dataset> {
    read_csv(std::io::Cursor::new(content), name)
}
