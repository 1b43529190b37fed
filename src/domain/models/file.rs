use std::path::Path;

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    /// Builds a file, guessing the MIME type from the name when the client sent none.
    pub fn new(content: Vec<u8>, filename: String, mime_type: Option<String>) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        Self {
            content,
            filename,
            mime_type,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Extension used in the storage key: the file name's own, else one known for the MIME type.
    ///
    /// Only ASCII alphanumeric extensions are taken from the name, since the
    /// key ends up verbatim in object URLs.
    pub fn extension(&self) -> String {
        if let Some(ext) = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return ext.to_string();
        }

        mime_guess::get_mime_extensions_str(&self.mime_type)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| "bin".to_string())
    }
}
