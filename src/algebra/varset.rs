// Index-set view of the algebra: varsets map row indices to tuples

use crate::csv_reader::Dataset;
use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Row index -> tuple of cells, for an ordered list of columns of one dataset.
///
/// The row index is the observation's identity: two views built from the same
/// dataset refer to the same observation through the same index.
#[derive(Debug, Clone, PartialEq)]
pub struct Varset {
    pub dataset: String,
    pub columns: Vec<String>,
    pub rows: BTreeMap<usize, Vec<String>>,
}

impl Varset {
    pub fn from_dataset<S: AsRef<str>>(dataset: &Dataset, columns: &[S]) -> Result<Self> {
        let mut indices = Vec::with_capacity(columns.len());
        for c in columns {
            indices.push(dataset.column_index(c.as_ref())?);
        }

        let mut rows = BTreeMap::new();
        for (row_idx, row) in dataset.rows.iter().enumerate() {
            let tuple = indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect();
            rows.insert(row_idx, tuple);
        }

        Ok(Varset {
            dataset: dataset.name.clone(),
            columns: indices.iter().map(|&i| dataset.headers[i].clone()).collect(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn indices(&self) -> BTreeSet<usize> {
        self.rows.keys().copied().collect()
    }

    /// Rows present on both sides, tuples concatenated left then right
    pub fn cross(&self, other: &Varset) -> Result<Varset> {
        if self.dataset != other.dataset {
            bail!(
                "Cannot cross varsets from different datasets ('{}' and '{}')",
                self.dataset,
                other.dataset
            );
        }

        let rows = self
            .rows
            .iter()
            .filter_map(|(idx, left)| {
                other.rows.get(idx).map(|right| {
                    let mut tuple = left.clone();
                    tuple.extend(right.iter().cloned());
                    (*idx, tuple)
                })
            })
            .collect();

        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());

        Ok(Varset {
            dataset: self.dataset.clone(),
            columns,
            rows,
        })
    }

    /// Keep only the selected observations
    pub fn restrict(&self, indices: &BTreeSet<usize>) -> Varset {
        Varset {
            dataset: self.dataset.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|(idx, _)| indices.contains(idx))
                .map(|(idx, t)| (*idx, t.clone()))
                .collect(),
        }
    }

    /// Indices whose cell in `column` satisfies `predicate`
    pub fn select<F>(&self, column: &str, predicate: F) -> Result<BTreeSet<usize>>
    where
        F: Fn(&str) -> bool,
    {
        let Some(pos) = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
        else {
            bail!(
                "Column '{}' is not part of this varset ({})",
                column,
                self.columns.join(", ")
            );
        };

        Ok(self
            .rows
            .iter()
            .filter(|(_, tuple)| predicate(&tuple[pos]))
            .map(|(idx, _)| *idx)
            .collect())
    }
}

/// Ordered alternatives of varsets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarBlend {
    pub members: Vec<Varset>,
}

impl From<Varset> for VarBlend {
    fn from(v: Varset) -> Self {
        VarBlend { members: vec![v] }
    }
}

impl VarBlend {
    pub fn blend(mut self, other: VarBlend) -> VarBlend {
        self.members.extend(other.members);
        self
    }

    /// Pairwise cross of members, row-major: (a + b) x c = a x c + b x c
    pub fn cross(&self, other: &VarBlend) -> Result<VarBlend> {
        let mut members = Vec::with_capacity(self.members.len() * other.members.len());
        for left in &self.members {
            for right in &other.members {
                members.push(left.cross(right)?);
            }
        }
        Ok(VarBlend { members })
    }

    /// Apply one selection to every member (linked views)
    pub fn restrict(&self, indices: &BTreeSet<usize>) -> VarBlend {
        VarBlend {
            members: self.members.iter().map(|m| m.restrict(indices)).collect(),
        }
    }

    /// (member, row index, tuple) for every row of every member
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize, &[String])> + '_ {
        self.members.iter().enumerate().flat_map(|(m, v)| {
            v.rows
                .iter()
                .map(move |(idx, tuple)| (m, *idx, tuple.as_slice()))
        })
    }
}
