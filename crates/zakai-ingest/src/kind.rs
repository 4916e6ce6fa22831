/// Document families the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `pdf`
    Pdf,
    /// `doc`, `docx`
    Word,
    /// `xls`, `xlsx`
    Spreadsheet,
}

/// What an uploaded file is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A document whose text can be extracted.
    Document(DocumentKind),
    /// An image to analyze against a question.
    Image,
    /// Anything else.
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

impl FileKind {
    pub fn from_name(file_name: &str) -> Self {
        let Some(ext) = file_extension(file_name) else {
            return FileKind::Other;
        };
        match ext.as_str() {
            "pdf" => FileKind::Document(DocumentKind::Pdf),
            "doc" | "docx" => FileKind::Document(DocumentKind::Word),
            "xls" | "xlsx" => FileKind::Document(DocumentKind::Spreadsheet),
            e if IMAGE_EXTENSIONS.contains(&e) => FileKind::Image,
            _ => FileKind::Other,
        }
    }
}

/// Lowercased text after the last `.`, if any.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// MIME type for an image upload, used in the `data:` URL sent to the model.
pub fn image_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string())
}
