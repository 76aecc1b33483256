use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::{Backend, StoreError, StoreState};

/// Stores the whole state as one pretty-printed JSON document.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers only ever see a complete snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Backend for JsonFileBackend {
    fn load(&mut self) -> Result<Option<StoreState>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    context: format!("opening store {}", self.path.display()),
                    source,
                });
            }
        };
        let state = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &StoreState) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|source| StoreError::Io {
            context: format!("creating store directory {}", parent.display()),
            source,
        })?;

        let temp = NamedTempFile::new_in(&parent).map_err(|source| StoreError::Io {
            context: format!("creating temporary file in {}", parent.display()),
            source,
        })?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush().map_err(|source| StoreError::Io {
                context: "flushing store snapshot".to_string(),
                source,
            })?;
        }

        temp.persist(&self.path)
            .map_err(|err| StoreError::Persist {
                path: self.path.clone(),
                source: err.error,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, ScoringGroup};
    use crate::store::Store;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("absent.json"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn committed_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let mut store = Store::open_json(&path).unwrap();
            store
                .transaction(|tx| {
                    let a = tx.insert_name("Anna", Gender::Feminine)?;
                    let b = tx.insert_name("Rose", Gender::Feminine)?;
                    tx.insert_combination(ScoringGroup::Secondary, a, b)?;
                    tx.set_setting("surname", "Okafor")
                })
                .unwrap();
        }

        let reopened = Store::open_json(&path).unwrap();
        let state = reopened.state();
        assert_eq!(state.names().len(), 2);
        assert_eq!(state.combinations().len(), 1);
        assert_eq!(state.settings().surname, "Okafor");
        assert!(state.find_name("rose").is_some());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Store::open_json(&path), Err(StoreError::Json(_))));
    }
}
