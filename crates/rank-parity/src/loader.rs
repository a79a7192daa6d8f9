//! 成果物 CSV を [`LabeledMatrix`] として読み込む

use std::io;

use log::debug;

use crate::artifact::ArtifactStore;
use crate::error::LoadError;
use crate::matrix::{LabeledMatrix, ParseError};

pub fn load(store: &dyn ArtifactStore, name: &str) -> Result<LabeledMatrix, LoadError> {
    let path = store.locate(name);
    let text = store.read(name).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::Missing { path: path.clone() },
        _ => LoadError::Io {
            path: path.clone(),
            source,
        },
    })?;
    if text.trim().is_empty() {
        return Err(LoadError::Empty {
            path,
            reason: "zero bytes",
        });
    }
    let matrix = LabeledMatrix::read_csv(text.as_bytes()).map_err(|e| match e {
        ParseError::NoHeader => LoadError::Empty {
            path: path.clone(),
            reason: "no header row",
        },
        ParseError::NoColumns => LoadError::Empty {
            path: path.clone(),
            reason: "no value columns",
        },
        ParseError::NoRows => LoadError::Empty {
            path: path.clone(),
            reason: "no data rows",
        },
        other => LoadError::Malformed {
            path: path.clone(),
            reason: other.to_string(),
        },
    })?;
    let (r, c) = matrix.shape();
    debug!("loaded {} ({r} rows x {c} columns)", path.display());
    Ok(matrix)
}

/// 成果物を削除する。失敗（存在しない場合を含む）は握りつぶす。
pub fn discard(store: &dyn ArtifactStore, name: &str) {
    if let Err(e) = store.delete(name) {
        if e.kind() != io::ErrorKind::NotFound {
            debug!("failed to remove {}: {e}", store.locate(name).display());
        }
    }
}
