use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Unique identifier for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A Go source file with its contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: SourceId,
    pub path: PathBuf,
    pub content: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(id: SourceId, path: PathBuf, content: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i as u32 + 1))
            .collect();

        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Line and column (0-indexed) of a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line];
        (line as u32, col)
    }

    /// 1-indexed line number, the way Go tooling prints positions.
    pub fn line_number(&self, offset: u32) -> u32 {
        self.line_col(offset).0 + 1
    }

    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Registry of all source files in one compilation.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: RwLock<Vec<SourceFile>>,
    path_to_id: RwLock<FxHashMap<PathBuf, SourceId>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file. Only `.go` files are accepted; re-adding a path
    /// returns its existing id.
    pub fn add_file(&self, path: impl AsRef<Path>, content: String) -> miette::Result<SourceId> {
        let path = path.as_ref().to_path_buf();

        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            return Err(miette::miette!("Not a Go source file: {}", path.display()));
        }

        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        let mut path_to_id = self.path_to_id.write().unwrap_or_else(|e| e.into_inner());

        if let Some(&id) = path_to_id.get(&path) {
            return Ok(id);
        }

        let id = SourceId(files.len() as u32);
        files.push(SourceFile::new(id, path.clone(), content));
        path_to_id.insert(path, id);

        Ok(id)
    }

    pub fn get(&self, id: SourceId) -> Option<SourceFile> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.get(id.0 as usize).cloned()
    }

    pub fn get_by_path(&self, path: impl AsRef<Path>) -> Option<SourceFile> {
        let id = {
            let path_to_id = self.path_to_id.read().unwrap_or_else(|e| e.into_inner());
            *path_to_id.get(path.as_ref())?
        };
        self.get(id)
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
