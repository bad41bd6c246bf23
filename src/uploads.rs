//! Multipart helpers shared by the resume, certification, and compliance
//! upload handlers.

use axum::extract::Multipart;
use chrono::Utc;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Drains a multipart body into the single `file` part plus any text fields.
pub async fn read_multipart(
    mut multipart: Multipart,
) -> AppResult<(Option<UploadedFile>, HashMap<String, String>)> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("invalid multipart body: {err}")))?
    {
        let name = part.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = part.file_name().unwrap_or("upload").to_string();
            let content_type = part.content_type().map(|value| value.to_string());
            let bytes = part
                .bytes()
                .await
                .map_err(|err| AppError::bad_request(format!("failed to read file: {err}")))?
                .to_vec();
            file = Some(UploadedFile {
                bytes,
                filename,
                content_type,
            });
        } else {
            let value = part
                .text()
                .await
                .map_err(|err| AppError::bad_request(format!("failed to read field: {err}")))?;
            fields.insert(name, value);
        }
    }

    Ok((file, fields))
}

pub fn require_file(file: Option<UploadedFile>) -> AppResult<UploadedFile> {
    let file = file.ok_or_else(|| AppError::bad_request("missing file part"))?;
    if file.bytes.is_empty() {
        return Err(AppError::bad_request("uploaded file is empty"));
    }
    Ok(file)
}

/// Content type for storage: what the client declared, else guessed from
/// the filename extension.
pub fn resolve_content_type(file: &UploadedFile) -> Option<String> {
    file.content_type.clone().or_else(|| {
        mime_guess::from_path(&file.filename)
            .first()
            .map(|mime| mime.to_string())
    })
}

pub fn file_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin")
}

/// Upload timestamp used in object keys so re-uploads never collide.
pub fn upload_stamp() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::file_extension;

    #[test]
    fn extension_falls_back_to_bin() {
        assert_eq!(file_extension("resume.pdf"), "pdf");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("no-extension"), "bin");
    }
}
