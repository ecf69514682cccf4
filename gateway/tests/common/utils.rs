use axum::response::Response;
use http_body_util::BodyExt;
use uuid::Uuid;

const BOUNDARY: &str = "----image-gateway-test-boundary";

/// One part of a `multipart/form-data` body
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        /// `None` leaves the part's `Content-Type` header out
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

impl<'a> Part<'a> {
    pub const fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self::File {
            name,
            filename,
            content_type: Some(content_type),
            data,
        }
    }

    /// File part sent without a `Content-Type` header
    pub const fn untyped_file(name: &'a str, filename: &'a str, data: &'a [u8]) -> Self {
        Self::File {
            name,
            filename,
            content_type: None,
            data,
        }
    }

    pub const fn text(name: &'a str, value: &'a str) -> Self {
        Self::Text { name, value }
    }
}

/// Encodes `parts` and returns the matching `Content-Type` header value
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Random bytes standing in for image content
pub fn fake_image_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(Uuid::new_v4().as_bytes());
    data
}
