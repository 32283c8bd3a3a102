use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::employee::Employee;
use crate::error::{DirectoryError, DirectoryResult};
use crate::store::EmployeeStore;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct EmployeeDocument {
    version: u32,
    employees: Vec<Employee>,
}

/// Keeps the directory as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct FileEmployeeStore {
    path: PathBuf,
}

impl FileEmployeeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(path: &Path) -> DirectoryResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| {
                    DirectoryError::Internal(format!(
                        "failed to create store directory {}: {error}",
                        parent.display()
                    ))
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for FileEmployeeStore {
    async fn load(&self) -> DirectoryResult<Vec<Employee>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no employee store yet");
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(DirectoryError::Internal(format!(
                    "failed to read employee store {}: {error}",
                    self.path.display()
                )))
            }
        };
        let document: EmployeeDocument = serde_json::from_slice(&bytes).map_err(|error| {
            DirectoryError::Internal(format!("employee store parse error: {error}"))
        })?;
        if document.version != DOCUMENT_VERSION {
            tracing::warn!(
                found = document.version,
                expected = DOCUMENT_VERSION,
                "employee store version mismatch"
            );
        }
        Ok(document.employees)
    }

    async fn save(&self, employees: &[Employee]) -> DirectoryResult<()> {
        Self::ensure_parent_dir(&self.path).await?;
        let document = EmployeeDocument {
            version: DOCUMENT_VERSION,
            employees: employees.to_vec(),
        };
        let serialized = serde_json::to_vec_pretty(&document).map_err(|error| {
            DirectoryError::Internal(format!("employee store serialize error: {error}"))
        })?;
        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|error| {
                DirectoryError::Internal(format!(
                    "failed to write employee store {}: {error}",
                    self.path.display()
                ))
            })?;
        Ok(())
    }
}
