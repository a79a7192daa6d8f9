//! 実装間の受け渡しに使う一時成果物の保管場所

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 成果物ファイル（名前で識別）の読み書き・削除
pub trait ArtifactStore {
    /// 既存の成果物は上書きする（追記しない）
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;

    /// 存在しなければ `ErrorKind::NotFound`
    fn read(&self, name: &str) -> io::Result<String>;

    fn delete(&self, name: &str) -> io::Result<()>;

    /// エラーメッセージ用の表示パス
    fn locate(&self, name: &str) -> PathBuf;
}

/// base ディレクトリ直下のファイルとして成果物を扱う
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    base_dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        fs::write(self.locate(name), contents)
    }

    fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.locate(name))
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.locate(name))
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

/// プロセス内メモリ上の成果物（テスト用スタブから書き込む）。
///
/// clone は同じ中身を共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    files: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // poison されても中身は単純な map なのでそのまま使う
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        self.lock().insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn read(&self, name: &str) -> io::Result<String> {
        self.lock()
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        self.lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn locate(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("memory://{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_store_overwrites_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        store.write("out.csv", "first\nsecond\n").unwrap();
        store.write("out.csv", "third\n").unwrap();
        assert_eq!(store.read("out.csv").unwrap(), "third\n");
        store.delete("out.csv").unwrap();
        let err = store.read("out.csv").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(store.locate("out.csv"), dir.path().join("out.csv"));
    }

    #[test]
    fn test_memory_store_shares_contents_between_clones() {
        let store = MemoryArtifactStore::new();
        let writer = store.clone();
        writer.write("a.csv", "x").unwrap();
        assert!(store.contains("a.csv"));
        assert_eq!(store.read("a.csv").unwrap(), "x");
        store.delete("a.csv").unwrap();
        assert!(writer.is_empty());
        assert_eq!(store.delete("a.csv").unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
