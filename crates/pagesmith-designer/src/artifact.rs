//! Persisted design artifact

use crate::error::DesignerError;
use pagesmith_domain::{Block, Constraints, Record};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// One block as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactBlock {
    /// Heading
    pub title: String,
    /// Body text
    pub content: String,
}

/// Bounds as written to disk (descriptive only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactConstraints {
    /// Minimum block count
    pub min_blocks: usize,
    /// Maximum block count
    pub max_blocks: usize,
    /// Content cap in characters
    pub max_content_len: usize,
}

/// The JSON document handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignArtifact {
    /// Source document title
    pub document_title: String,
    /// Page title
    pub page_title: String,
    /// Layout identifier
    pub layout_hint: String,
    /// Ordered blocks
    pub blocks: Vec<ArtifactBlock>,
    /// Bounds the record was validated against
    pub constraints: ArtifactConstraints,
}

impl DesignArtifact {
    /// Wrap a validated record
    pub fn new(record: &Record, constraints: Constraints) -> Self {
        Self {
            document_title: record.document_title.clone(),
            page_title: record.page_title.clone(),
            layout_hint: record.layout_hint.clone(),
            blocks: record.items.iter().map(ArtifactBlock::from).collect(),
            constraints: ArtifactConstraints {
                min_blocks: constraints.min_blocks,
                max_blocks: constraints.max_blocks,
                max_content_len: constraints.max_content_len,
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DesignerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact, creating parent directories
    ///
    /// The JSON goes to a sibling temporary file first and is renamed into
    /// place, so readers never observe a partial file.
    pub async fn write(&self, path: &Path) -> Result<(), DesignerError> {
        let mut json = self.to_json()?;
        json.push('\n');

        let persistence = |source| DesignerError::Persistence {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(persistence)?;
        }

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, json.as_bytes()).await.map_err(persistence)?;
        if let Err(source) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(persistence(source));
        }

        debug!("Wrote {} bytes to {}", json.len(), path.display());
        Ok(())
    }

    /// Read an artifact back
    pub async fn read(path: &Path) -> Result<Self, DesignerError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DesignerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl From<&Block> for ArtifactBlock {
    fn from(block: &Block) -> Self {
        Self {
            title: block.title.clone(),
            content: block.content.clone(),
        }
    }
}

/// Sibling temporary name, unique per process and per write
fn temp_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("design"));
    let seq = NEXT.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record() -> Record {
        Record {
            document_title: "区块测试".to_string(),
            page_title: "区块测试".to_string(),
            layout_hint: "grid-2-2".to_string(),
            items: vec![Block::new("A", "alpha"), Block::new("B", "beta")],
        }
    }

    #[test]
    fn test_json_shape() {
        let artifact = DesignArtifact::new(&record(), Constraints::default());
        let value: Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "documentTitle": "区块测试",
                "pageTitle": "区块测试",
                "layoutHint": "grid-2-2",
                "blocks": [
                    {"title": "A", "content": "alpha"},
                    {"title": "B", "content": "beta"}
                ],
                "constraints": {"minBlocks": 3, "maxBlocks": 6, "maxContentLen": 50}
            })
        );
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let artifact = DesignArtifact::new(&record(), Constraints::default());
        assert!(artifact.to_json().unwrap().contains("区块测试"));
    }

    #[test]
    fn test_temp_path_is_unique_sibling() {
        let first = temp_path(Path::new("out/page.json"));
        let second = temp_path(Path::new("out/page.json"));

        assert_ne!(first, second);
        for tmp in [&first, &second] {
            assert_eq!(tmp.parent(), Some(Path::new("out")));
            let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("page.json.") && name.ends_with(".tmp"), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/design.json");
        let artifact = DesignArtifact::new(&record(), Constraints::default());

        artifact.write(&path).await.unwrap();

        assert_eq!(DesignArtifact::read(&path).await.unwrap(), artifact);
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_write_into_file_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let artifact = DesignArtifact::new(&record(), Constraints::default());
        let result = artifact.write(&blocker.join("design.json")).await;
        assert!(matches!(result, Err(DesignerError::Persistence { .. })));
    }
}
