//! Image upload command.
//!
//! Requires `COZYHOOK_ADMIN_TOKEN`. The gateway stores the bytes under its
//! fixed public prefix and answers with the public URL.

use std::path::Path;

use cozy_hook_store::gateway::types::ImageUpload;
use cozy_hook_store::{ShopStore, StoreError};

/// Upload an image file and print its public URL.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the gateway rejects the
/// upload.
pub async fn upload(
    store: &ShopStore,
    file: &Path,
    name: Option<String>,
    content_type: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;

    let file_name = name
        .or_else(|| {
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .ok_or_else(|| StoreError::NotFound(format!("file name for {}", file.display())))?;

    let content_type = content_type.unwrap_or_else(|| guess_content_type(&file_name).to_owned());

    let url = store
        .upload_image(&ImageUpload {
            file_name,
            content_type,
            data,
        })
        .await?;

    println!("{url}");
    Ok(())
}

/// MIME type by file extension; the gateway treats this as opaque.
fn guess_content_type(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("beanie.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("octopus.png"), "image/png");
        assert_eq!(guess_content_type("notes.txt"), "application/octet-stream");
        assert_eq!(guess_content_type("no-extension"), "application/octet-stream");
    }
}
