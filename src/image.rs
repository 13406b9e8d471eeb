use crate::gateway::GatewayError;
use base64::Engine;
use std::path::Path;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// An image split out of a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    /// Base64 payload, not decoded
    pub data: &'a str,
}

/// Split a data URI into its MIME type and base64 payload.
///
/// The MIME type defaults to `image/jpeg` when the header does not name one.
pub fn parse_data_uri(uri: &str) -> Result<DataUri<'_>, GatewayError> {
    let (header, data) = uri
        .split_once(',')
        .ok_or_else(|| GatewayError::InvalidInput("image is not a data URI".to_string()))?;

    if data.trim().is_empty() {
        return Err(GatewayError::InvalidInput(
            "image data URI has no payload".to_string(),
        ));
    }

    let mime_type = header
        .strip_prefix("data:")
        .map(|rest| rest.split(';').next().unwrap_or_default())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE);

    Ok(DataUri { mime_type, data })
}

/// Encode raw image bytes as a base64 data URI.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Read an image file into a data URI, guessing the MIME type from its
/// extension. Files that are not images are rejected.
pub fn read_image_data_uri(path: &Path) -> Result<String, GatewayError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(GatewayError::InvalidInput(format!(
            "{} is not an image ({})",
            path.display(),
            mime
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| GatewayError::ImageRead(format!("{}: {}", path.display(), e)))?;
    Ok(encode_data_uri(mime.essence_str(), &bytes))
}
