//! Pin publishing: record + image → one `POST /v5/pins`.
//!
//! Checks run cheapest-first and all before the network: blank fields
//! ([`VersePinError::MissingFields`]), then the image bytes
//! ([`VersePinError::ImageRead`] when empty). Only then is the request sent.
//! The image is the [`SourceImage`] loaded for extraction; the file on disk
//! is not read again.
//!
//! Exactly one request per call. A request that has been sent cannot be
//! taken back, so abandoning the future after that point may still create
//! the pin.

use crate::config::{Destination, PipelineConfig};
use crate::error::VersePinError;
use crate::pipeline::encode::{encode_base64, SourceImage};
use crate::record::{MediaSource, PublishConfirmation, PublishPayload, PublishRecord};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Content type declared for every uploaded image.
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Sends a record to the publishing service.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        image: &SourceImage,
        record: &PublishRecord,
        destination: &Destination,
    ) -> Result<PublishConfirmation, VersePinError>;
}

/// Pinterest v5 REST client.
#[derive(Debug, Clone)]
pub struct PinterestPublisher {
    client: reqwest::Client,
    endpoint: String,
    link: String,
}

impl PinterestPublisher {
    pub fn from_config(config: &PipelineConfig) -> Result<Self, VersePinError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.publish_timeout_secs))
            .build()
            .map_err(|e| VersePinError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.publish_endpoint.clone(),
            link: config.promo_link.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Publisher for PinterestPublisher {
    async fn publish(
        &self,
        image: &SourceImage,
        record: &PublishRecord,
        destination: &Destination,
    ) -> Result<PublishConfirmation, VersePinError> {
        let record = record.normalized();
        check_required_fields(&record)?;

        if image.bytes.is_empty() {
            return Err(VersePinError::ImageRead {
                path: image.path.clone(),
                detail: "no image bytes for base64 upload".into(),
            });
        }
        let payload = build_payload(&image.bytes, &record, &destination.board_id, &self.link);
        debug!(
            "Publishing pin to board {} ({} bytes base64)",
            destination.board_id,
            payload.media_source.data.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&destination.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Pin rejected: HTTP {}", status.as_u16());
            return Err(VersePinError::PublishRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        let confirmation = PublishConfirmation {
            status: status.as_u16(),
            body,
        };
        info!(
            "Pin created successfully (id: {})",
            confirmation.pin_id().unwrap_or("unknown")
        );
        Ok(confirmation)
    }
}

/// Fail with the names of any blank required fields.
pub fn check_required_fields(record: &PublishRecord) -> Result<(), VersePinError> {
    let missing: Vec<&'static str> = [
        ("title", record.title()),
        ("description", record.description()),
        ("alt_text", record.alt_text()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(VersePinError::MissingFields { fields: missing })
    }
}

/// Assemble the wire body for one pin.
pub fn build_payload(
    image_bytes: &[u8],
    record: &PublishRecord,
    board_id: &str,
    link: &str,
) -> PublishPayload {
    PublishPayload {
        board_id: board_id.to_string(),
        media_source: MediaSource {
            source_type: "image_base64".to_string(),
            content_type: UPLOAD_CONTENT_TYPE.to_string(),
            data: encode_base64(image_bytes),
        },
        title: record.title().to_string(),
        description: record.description().to_string(),
        link: link.to_string(),
        alt_text: record.alt_text().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::ImageInfo;
    use crate::record::Confidence;

    fn complete() -> PublishRecord {
        PublishRecord::new("Ps 23:1 | Trinity Catholic Media", "desc", "alt", Confidence::High)
    }

    #[test]
    fn required_fields_pass_for_complete_record() {
        assert!(check_required_fields(&complete()).is_ok());
    }

    #[test]
    fn blank_alt_text_is_missing() {
        let mut r = complete();
        r.set_alt_text("   ");
        match check_required_fields(&r) {
            Err(VersePinError::MissingFields { fields }) => assert_eq!(fields, vec!["alt_text"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn payload_uses_fixed_content_type_and_link() {
        let p = build_payload(b"\xff\xd8", &complete(), "board-1", "https://example.org/c");
        assert_eq!(p.media_source.content_type, "image/jpeg");
        assert_eq!(p.media_source.source_type, "image_base64");
        assert_eq!(p.media_source.data, "/9g=");
        assert_eq!(p.link, "https://example.org/c");
        assert_eq!(p.board_id, "board-1");
        assert_eq!(p.alt_text, "alt");
    }

    #[tokio::test]
    async fn empty_image_fails_before_network() {
        // The endpoint is unroutable; reaching it would be a Transport error.
        let config = PipelineConfig::builder()
            .publish_endpoint("http://127.0.0.1:9/never")
            .build()
            .unwrap();
        let publisher = PinterestPublisher::from_config(&config).unwrap();
        let image = SourceImage {
            path: "/no/such/image.jpg".into(),
            bytes: Vec::new(),
            mime_type: "image/jpeg",
            info: ImageInfo {
                format: "JPEG".into(),
                width: 0,
                height: 0,
                size_bytes: 0,
            },
        };
        let err = publisher
            .publish(&image, &complete(), &Destination::new("b", "t"))
            .await
            .unwrap_err();
        assert!(matches!(err, VersePinError::ImageRead { .. }), "got {err:?}");
    }
}
