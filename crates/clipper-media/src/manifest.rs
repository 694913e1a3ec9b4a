//! Concat manifest for merge operations.
//!
//! FFmpeg's concat demuxer reads a plain-text list of `file '<path>'` lines.
//! Each merge writes its own uniquely named list in the temp directory; the
//! file is removed when the [`ConcatManifest`] guard is dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::MediaResult;

/// Temporary concat list, deleted on drop.
#[derive(Debug)]
pub struct ConcatManifest {
    file: NamedTempFile,
}

impl ConcatManifest {
    /// Write a manifest listing `inputs` in order.
    ///
    /// Paths are made absolute because the concat demuxer resolves relative
    /// entries against the manifest's own directory.
    pub fn create<P: AsRef<Path>>(inputs: &[P]) -> MediaResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("clipper-concat-")
            .suffix(".txt")
            .tempfile()?;

        let content = render(inputs)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Location of the manifest file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn render<P: AsRef<Path>>(inputs: &[P]) -> MediaResult<String> {
    let mut content = String::new();
    for input in inputs {
        let path: PathBuf = std::path::absolute(input.as_ref())?;
        content.push_str(&format!("file '{}'\n", escape(&path.to_string_lossy())));
    }
    Ok(content)
}

/// Quote a path for the concat demuxer: `'` becomes `'\''`.
fn escape(path: &str) -> String {
    path.replace('\'', r"'\''")
}
