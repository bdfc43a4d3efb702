//! CSV workbook layer for junction observation sheets.
//!
//! A workbook is a directory holding one CSV file per sheet; the file stem
//! is the sheet name. Sheets may be gzip-compressed (`*.csv.gz`). A single
//! CSV file is treated as a one-sheet workbook.
//!
//! # Sheet format
//!
//! The first column holds dates, either ISO (`2024-06-01`) or season dates
//! (`1-Jun`); the remaining columns are observation keys (years on a
//! junction sheet, junction names on a flow sheet).
//!
//! ```text
//! Date,1975,1976,1977
//! 1-Jun,0.82,1.10,
//! 2-Jun,0.85,1.07,0.91
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use jdy_workbook::{loader::LoadOptions, Workbook};
//!
//! let workbook = Workbook::open("ALL MERGED 22 Points").unwrap();
//! let tables = workbook.load_all(&LoadOptions::default()).unwrap();
//! ```

pub mod loader;
pub mod models;
pub mod writer;

use anyhow::Context;
use std::path::{Path, PathBuf};

/// One sheet file of a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSource {
    pub name: String,
    pub path: PathBuf,
    pub compressed: bool,
}

impl SheetSource {
    /// `None` unless `path` names a `.csv` or `.csv.gz` file.
    pub fn from_path(path: &Path) -> Option<SheetSource> {
        let file_name = path.file_name()?.to_str()?;
        let (name, compressed) = if let Some(stem) = file_name.strip_suffix(".csv.gz") {
            (stem, true)
        } else {
            (file_name.strip_suffix(".csv")?, false)
        };
        Some(SheetSource {
            name: name.to_string(),
            path: path.to_path_buf(),
            compressed,
        })
    }
}

/// Sheets of a workbook, in file-name order.
#[derive(Debug, Clone)]
pub struct Workbook {
    root: PathBuf,
    sheets: Vec<SheetSource>,
}

impl Workbook {
    /// Open a workbook directory, or a single sheet file.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Workbook> {
        let root = path.as_ref().to_path_buf();
        let sheets = if root.is_dir() {
            let mut sheets = Vec::new();
            let entries = std::fs::read_dir(&root)
                .with_context(|| format!("reading workbook {}", root.display()))?;
            for entry in entries {
                let entry = entry?;
                if let Some(sheet) = SheetSource::from_path(&entry.path()) {
                    sheets.push(sheet);
                }
            }
            sheets.sort_by(|a, b| a.path.cmp(&b.path));
            sheets
        } else {
            let sheet = SheetSource::from_path(&root).with_context(|| {
                format!("{} is neither a directory nor a .csv file", root.display())
            })?;
            if !root.exists() {
                anyhow::bail!("sheet file {} not found", root.display());
            }
            vec![sheet]
        };
        log::info!("Opened workbook {} with {} sheet(s)", root.display(), sheets.len());
        Ok(Workbook { root, sheets })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sheets(&self) -> &[SheetSource] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetSource> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
