use super::{ArtifactError, ArtifactStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `<dir>/<name>.json`, replaced atomically via a temporary file and rename.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ArtifactError> {
        match std::fs::read(self.path_for(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
