use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::errors::SettingsError;
use crate::domain::models::{LoadOutcome, SettingsConfig, SettingsDocument};

/// Default directory holding the client settings
pub const DEFAULT_SETTINGS_DIR: &str = ".claude";

/// Default settings file name inside [`DEFAULT_SETTINGS_DIR`]
pub const DEFAULT_SETTINGS_FILE: &str = "settings.local.json";

/// Read-merge-write persistence for the client settings document.
///
/// Holds only paths. Every call re-reads the file, so two stores pointing at
/// the same location never disagree about its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    dir: PathBuf,
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::with_paths(DEFAULT_SETTINGS_DIR, DEFAULT_SETTINGS_FILE)
    }
}

impl SettingsStore {
    /// Store at `.claude/settings.local.json` relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Store at `<root>/.claude/settings.local.json`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        Self::with_paths(root.as_ref().join(DEFAULT_SETTINGS_DIR), DEFAULT_SETTINGS_FILE)
    }

    pub fn with_paths(dir: impl Into<PathBuf>, file_name: impl AsRef<Path>) -> Self {
        let dir = dir.into();
        let path = dir.join(file_name);
        Self { dir, path }
    }

    pub fn from_config(config: &SettingsConfig) -> Self {
        Self::with_paths(&config.directory, &config.file_name)
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the settings file
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the settings directory if it does not exist yet
    pub fn ensure_directory(&self) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir).map_err(|source| SettingsError::CreateDirectory {
            path: self.dir.clone(),
            source,
        })
    }

    /// Read the settings file, keeping the reason when it had to be ignored
    pub fn inspect(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file");
                return LoadOutcome::Missing;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "settings file unreadable, ignoring it");
                return LoadOutcome::Corrupt(format!("unreadable: {err}"));
            }
        };

        match serde_json::from_str::<SettingsDocument>(&content) {
            Ok(document) => LoadOutcome::Loaded(document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "settings file is not a JSON object, ignoring it");
                LoadOutcome::Corrupt(err.to_string())
            }
        }
    }

    /// Current settings, or `None` when the file is missing or corrupt
    pub fn load(&self) -> Option<SettingsDocument> {
        self.inspect().into_document()
    }

    /// Merge `entries` over the stored document and write the result.
    ///
    /// Unrelated keys survive; colliding keys take the new value. A corrupt
    /// file is replaced rather than merged. Returns the document as written.
    pub fn save(&self, entries: SettingsDocument) -> Result<SettingsDocument, SettingsError> {
        self.update(entries, &[]).map(|report| report.document)
    }

    /// Like [`save`](Self::save), but first drops `remove` from the stored
    /// document and reports whether a corrupt file was replaced.
    pub fn update(
        &self,
        entries: SettingsDocument,
        remove: &[&str],
    ) -> Result<SaveReport, SettingsError> {
        let (mut document, replaced_corrupt) = match self.inspect() {
            LoadOutcome::Loaded(document) => (document, None),
            LoadOutcome::Missing => (SettingsDocument::new(), None),
            LoadOutcome::Corrupt(reason) => (SettingsDocument::new(), Some(reason)),
        };
        for key in remove {
            if document.remove(key).is_some() {
                debug!(key, "settings entry removed");
            }
        }
        document.merge(entries);

        self.ensure_directory()?;
        self.write(&document)?;

        info!(path = %self.path.display(), keys = document.len(), "settings saved");
        Ok(SaveReport {
            document,
            replaced_corrupt,
        })
    }

    /// Delete the settings file. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool, SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "settings removed");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SettingsError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    // Written beside the real target and renamed over it so readers never
    // see a partial file. A symlinked settings file stays a symlink.
    fn write(&self, document: &SettingsDocument) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(document)?;
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        let target = self.write_target();
        let dir = target.parent().unwrap_or(self.dir.as_path());
        let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

        let mut builder = tempfile::Builder::new();
        builder.prefix(".settings").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode a plain create would get once the umask applies
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let mut file = builder.tempfile_in(dir).map_err(write_err)?;
        if let Some(permissions) = existing {
            file.as_file().set_permissions(permissions).map_err(write_err)?;
        }
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.write_all(b"\n").map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(())
    }

    /// Path the rename lands on: the link target when the settings file is a symlink
    fn write_target(&self) -> PathBuf {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(&self.path)
                .or_else(|_| fs::read_link(&self.path).map(|link| self.dir.join(link)))
                .unwrap_or_else(|err| {
                    warn!(path = %self.path.display(), error = %err, "could not resolve settings symlink");
                    self.path.clone()
                }),
            _ => self.path.clone(),
        }
    }
}

/// Outcome of [`SettingsStore::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Document as written
    pub document: SettingsDocument,
    /// Why the prior file was discarded, when it was corrupt
    pub replaced_corrupt: Option<String>,
}
