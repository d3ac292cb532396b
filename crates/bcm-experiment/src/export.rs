// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! JSON export of experiment results

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::ExperimentResult;

/// Write `value` as pretty-printed JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ExperimentResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;

    info!(path = %path.display(), "Results written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::PanelTable;
    use tempfile::tempdir;

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results").join("nested").join("panel.json");

        let mut table = PanelTable::default();
        table.push_column("post", vec![0.0, 0.1]).unwrap();
        table.push_column("delta_w 7.00", vec![0.0, -0.69]).unwrap();

        write_json(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: PanelTable = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_write_json_into_existing_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.json");
        write_json(&path, &vec![1.0, 2.0]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<f64> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, vec![1.0, 2.0]);
    }
}
