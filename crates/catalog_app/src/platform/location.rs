//! The terminal's stand-in for the browser address bar: the current query
//! string, saved to a RON file so a session can be resumed or shared.
use std::path::PathBuf;

use catalog_core::Location;
use catalog_engine::{read_if_exists, AtomicFileWriter};
use catalog_logging::{catalog_debug, catalog_error, catalog_info, catalog_warn};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedLocation {
    query: String,
    #[serde(default)]
    saved_utc: Option<String>,
}

pub struct FileLocation {
    writer: AtomicFileWriter,
    query: String,
}

impl FileLocation {
    /// Opens the saved location at `path`. `initial` (from the command line)
    /// takes precedence over whatever was saved.
    pub fn open(path: PathBuf, initial: Option<String>) -> Self {
        let query = match initial {
            Some(query) => query,
            None => load_saved_query(&path),
        };
        Self {
            writer: AtomicFileWriter::new(path),
            query,
        }
    }

    /// Display form, as it would appear after the page path.
    pub fn display(&self) -> String {
        let query = self.query.trim_start_matches('?');
        if query.is_empty() {
            "/".to_string()
        } else {
            format!("/?{query}")
        }
    }
}

impl Location for FileLocation {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = query.to_string();

        let state = PersistedLocation {
            query: self.query.clone(),
            saved_utc: Some(Utc::now().to_rfc3339()),
        };
        let content = match ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new()) {
            Ok(text) => text,
            Err(err) => {
                catalog_error!("Failed to serialize location: {}", err);
                return;
            }
        };
        match self.writer.write(&content) {
            Ok(()) => catalog_debug!("Location replaced: {:?}", self.query),
            Err(err) => catalog_error!(
                "Failed to write location to {:?}: {}",
                self.writer.path(),
                err
            ),
        }
    }
}

fn load_saved_query(path: &std::path::Path) -> String {
    let content = match read_if_exists(path) {
        Ok(Some(text)) => text,
        Ok(None) => return String::new(),
        Err(err) => {
            catalog_warn!("Failed to read saved location from {:?}: {}", path, err);
            return String::new();
        }
    };

    match ron::from_str::<PersistedLocation>(&content) {
        Ok(state) => {
            catalog_info!("Restored location {:?} from {:?}", state.query, path);
            state.query
        }
        Err(err) => {
            catalog_warn!("Failed to parse saved location from {:?}: {}", path, err);
            String::new()
        }
    }
}
