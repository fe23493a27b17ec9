//! Contracts and bills: table rows whose files live in object storage under
//! `{entity_id}/{file_name}`.

use std::fmt::Display;
use std::path::Path;

use futures::future::try_join_all;
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::BackendClient;
use crate::error::{DataError, Result};
use crate::model::{Bill, Contract, StoredObject};
use crate::query::Query;
use crate::repositories::{Entity, TableRepository};

/// Row column holding the storage paths of an entity's files.
pub const FILES_COLUMN: &str = "files";

pub type ContractRepository = AttachmentRepository<Contract>;
pub type BillRepository = AttachmentRepository<Bill>;

/// A file to store alongside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Read a file from disk; the content type is guessed from its extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = content_type_for(&file_name);
        Ok(Self::new(file_name, bytes, content_type))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

/// Storage path of `file_name` for the entity `id`.
pub fn object_path(id: &str, file_name: &str) -> String {
    format!("{id}/{file_name}")
}

/// Append `paths` to the row's file column, skipping ones already listed.
fn merge_paths(row: &mut Map<String, Value>, paths: Vec<String>) {
    let entry = row
        .entry(FILES_COLUMN)
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    if let Value::Array(files) = entry {
        for path in paths {
            let value = Value::String(path);
            if !files.contains(&value) {
                files.push(value);
            }
        }
    }
}

/// CRUD for a row type with attached files.
#[derive(Debug, Clone)]
pub struct AttachmentRepository<T> {
    table: TableRepository<T>,
}

impl<T: Entity> AttachmentRepository<T> {
    pub fn new(client: BackendClient) -> Self {
        Self {
            table: TableRepository::new(client),
        }
    }

    fn client(&self) -> &BackendClient {
        self.table.client()
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        self.table.list().await
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<T> {
        self.table.get_by_id(id).await
    }

    /// Store every upload under `id`, concurrently. Returns their paths in
    /// upload order.
    async fn upload_all(&self, id: &str, uploads: Vec<Upload>) -> Result<Vec<String>> {
        let client = self.client();
        try_join_all(uploads.into_iter().map(|upload| async move {
            let path = object_path(id, &upload.file_name);
            client
                .upload(&path, upload.bytes, &upload.content_type)
                .await?;
            debug!(table = T::TABLE, %path, "attachment stored");
            Ok::<_, DataError>(path)
        }))
        .await
    }

    /// Insert a row under a fresh id, after storing its files.
    ///
    /// The id is generated here so the storage folder exists before the
    /// row does.
    pub async fn create(&self, mut row: Map<String, Value>, uploads: Vec<Upload>) -> Result<T> {
        let id = Uuid::new_v4().to_string();
        let paths = self.upload_all(&id, uploads).await?;
        row.insert("id".to_string(), Value::String(id.clone()));
        merge_paths(&mut row, paths);
        let created = self.table.create(&row).await?;
        info!(table = T::TABLE, %id, "row created with attachments");
        Ok(created)
    }

    /// Store new files for `id`, then patch the row with them merged in.
    pub async fn update(
        &self,
        id: impl Display,
        mut row: Map<String, Value>,
        uploads: Vec<Upload>,
    ) -> Result<T> {
        let id = id.to_string();
        if !uploads.is_empty() && !row.contains_key(FILES_COLUMN) {
            // Keep the files the row already lists.
            let query = Query::table(T::TABLE).select(FILES_COLUMN).eq("id", &id);
            let current: Vec<Map<String, Value>> = self.client().select(&query).await?;
            let existing = current
                .into_iter()
                .next()
                .map(|mut r| r.remove(FILES_COLUMN).unwrap_or(Value::Null))
                .ok_or_else(|| DataError::NotFound {
                    table: T::TABLE,
                    id: id.clone(),
                })?;
            row.insert(FILES_COLUMN.to_string(), existing);
        }
        let paths = self.upload_all(&id, uploads).await?;
        if !paths.is_empty() {
            merge_paths(&mut row, paths);
        }
        self.table.update(&id, &row).await
    }

    pub async fn soft_delete(&self, id: impl Display) -> Result<()> {
        self.table.soft_delete(id).await
    }

    /// Files stored for `id`.
    pub async fn list_files(&self, id: impl Display) -> Result<Vec<StoredObject>> {
        self.client().list(&id.to_string()).await
    }

    pub async fn download_file(&self, id: impl Display, file_name: &str) -> Result<Vec<u8>> {
        self.client()
            .download(&object_path(&id.to_string(), file_name))
            .await
    }

    pub async fn remove_file(&self, id: impl Display, file_name: &str) -> Result<()> {
        let path = object_path(&id.to_string(), file_name);
        self.client().remove(std::slice::from_ref(&path)).await?;
        info!(table = T::TABLE, %path, "attachment removed");
        Ok(())
    }
}
