//! Generic JSON-file table with sequential integer ids

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use portal_types::{Result, StoreError};

/// A row that can live in a [`Table`]
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> i64;
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableFile<T> {
    next_id: i64,
    rows: Vec<T>,
}

/// In-memory rows mirrored to a single JSON file
pub struct Table<T> {
    path: PathBuf,
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Record> Table<T> {
    /// Create or load `<store_dir>/<file_name>`
    pub fn open(store_dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let path = store_dir.join(file_name);

        let (next_id, rows) = if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            let parsed: TableFile<T> =
                serde_json::from_reader(reader).map_err(|e| StoreError::Corrupted {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            let rows: BTreeMap<i64, T> = parsed.rows.into_iter().map(|r| (r.id(), r)).collect();
            let max_id = rows.keys().next_back().copied().unwrap_or(0);
            (parsed.next_id.max(max_id + 1), rows)
        } else {
            (1, BTreeMap::new())
        };

        tracing::debug!(path = %path.display(), rows = rows.len(), "table opened");
        Ok(Self { path, next_id, rows })
    }

    /// Write the table to disk, replacing the previous file
    fn save(&self) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let writer = BufWriter::new(file);
            let snapshot = TableFile {
                next_id: self.next_id,
                rows: self.rows.values().collect::<Vec<_>>(),
            };
            serde_json::to_writer_pretty(writer, &snapshot)?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Allocate the next id, build the row and persist it
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> Result<T> {
        let id = self.next_id;
        let row = build(id);
        self.next_id += 1;
        self.rows.insert(id, row.clone());
        if let Err(e) = self.save() {
            self.rows.remove(&id);
            self.next_id = id;
            return Err(e);
        }
        Ok(row)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Mutate a row in place. Returns the updated row, or `None` if absent.
    /// The change is undone when it cannot be written.
    pub fn update(&mut self, id: i64, apply: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let Some(row) = self.rows.get_mut(&id) else {
            return Ok(None);
        };
        let previous = row.clone();
        apply(row);
        if let Err(e) = self.save() {
            self.rows.insert(id, previous);
            return Err(e);
        }
        Ok(self.rows.get(&id).cloned())
    }

    pub fn remove(&mut self, id: i64) -> Result<Option<T>> {
        let Some(removed) = self.rows.remove(&id) else {
            return Ok(None);
        };
        if let Err(e) = self.save() {
            self.rows.insert(id, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Remove every row matching `pred`, returning how many went
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Result<usize> {
        let ids: Vec<i64> = self.rows.iter().filter(|(_, row)| pred(row)).map(|(&id, _)| id).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let removed: Vec<(i64, T)> = ids
            .into_iter()
            .filter_map(|id| self.rows.remove(&id).map(|row| (id, row)))
            .collect();
        if let Err(e) = self.save() {
            self.rows.extend(removed);
            return Err(e);
        }
        Ok(removed.len())
    }

    /// Rows in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        label: String,
    }

    impl Record for Row {
        fn id(&self) -> i64 {
            self.id
        }
    }

    fn row(label: &str) -> impl FnOnce(i64) -> Row + '_ {
        move |id| Row {
            id,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_ids_are_sequential_and_persisted() {
        let dir = tempdir().unwrap();
        {
            let mut table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
            assert_eq!(table.insert_with(row("a")).unwrap().id, 1);
            assert_eq!(table.insert_with(row("b")).unwrap().id, 2);
        }
        let table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2).unwrap().label, "b");
    }

    #[test]
    fn test_removed_ids_not_reused() {
        let dir = tempdir().unwrap();
        let mut table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        table.insert_with(row("a")).unwrap();
        table.insert_with(row("b")).unwrap();
        assert!(table.remove(2).unwrap().is_some());

        let mut reopened: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        assert_eq!(reopened.insert_with(row("c")).unwrap().id, 3);
    }

    #[test]
    fn test_update_missing_row() {
        let dir = tempdir().unwrap();
        let mut table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        let result = table.update(42, |r| r.label.push('!')).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_remove_where_counts() {
        let dir = tempdir().unwrap();
        let mut table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        for label in ["keep", "drop", "drop"] {
            table.insert_with(row(label)).unwrap();
        }
        assert_eq!(table.remove_where(|r| r.label == "drop").unwrap(), 2);
        assert_eq!(table.len(), 1);
    }

    /// A directory in place of the table file makes every rename fail
    fn block_writes(table: &Table<Row>) {
        fs::remove_file(table.path()).unwrap();
        fs::create_dir_all(table.path().join("occupied")).unwrap();
    }

    #[test]
    fn test_failed_write_leaves_rows_unchanged() {
        let dir = tempdir().unwrap();
        let mut table: Table<Row> = Table::open(dir.path(), "rows.json").unwrap();
        table.insert_with(row("a")).unwrap();
        table.insert_with(row("b")).unwrap();
        block_writes(&table);

        assert!(table.update(1, |r| r.label = "changed".to_string()).is_err());
        assert_eq!(table.get(1).unwrap().label, "a");

        assert!(table.remove(2).is_err());
        assert_eq!(table.get(2).unwrap().label, "b");

        assert!(table.remove_where(|r| r.label == "a").is_err());
        assert_eq!(table.len(), 2);

        assert!(table.insert_with(row("c")).is_err());
        assert_eq!(table.len(), 2);
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_corrupted_file_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rows.json"), "{ not json").unwrap();
        let err = Table::<Row>::open(dir.path(), "rows.json").err().unwrap();
        assert!(err.to_string().contains("corrupted"));
    }
}
