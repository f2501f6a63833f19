use crate::utils::error::Result;

/// The storage collaborator: one named document, read and written whole.
pub trait BlobStore {
    /// Name the document is stored under.
    fn name(&self) -> &str;

    /// `Ok(None)` when nothing has been written yet.
    fn read_blob(&self) -> Result<Option<Vec<u8>>>;

    fn write_blob(&self, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn document_name(&self) -> &str;
}
