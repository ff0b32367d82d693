//! Filesystem-backed [`SourceReader`]

use async_trait::async_trait;
use hotcheck_api::{HotcheckError, HotcheckResult, SourceReader};
use std::path::Path;

/// Reads source files with tokio's async filesystem API
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceReader;

#[async_trait]
impl SourceReader for FsSourceReader {
    async fn read_source(&self, path: &Path) -> HotcheckResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HotcheckError::file_read(path, e))
    }
}
