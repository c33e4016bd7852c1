use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::image_locator::ImageSource;
use crate::shared::config::OcrConfig;

/// Ошибки получения изображения и распознавания текста
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR service error {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Invalid OCR response: {0}")]
    Decode(String),
}

/// Распознавание текста на изображении товара
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageSource) -> Result<String, OcrError>;
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    image_base64: String,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    text: Option<String>,
}

/// Клиент внешнего OCR-сервиса: POST {image_base64, language} → {text}
pub struct HttpTextRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
}

impl HttpTextRecognizer {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    async fn load_bytes(&self, image: &ImageSource) -> Result<Vec<u8>, OcrError> {
        match image {
            ImageSource::Local(path) => Ok(tokio::fs::read(path).await?),
            ImageSource::Remote(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(OcrError::Service {
                        status: status.as_u16(),
                        body,
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

#[async_trait]
impl TextRecognizer for HttpTextRecognizer {
    async fn recognize(&self, image: &ImageSource) -> Result<String, OcrError> {
        let bytes = self.load_bytes(image).await?;
        let payload = RecognizeRequest {
            image_base64: STANDARD.encode(&bytes),
            language: &self.language,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OCR request failed for {}: {}", image.describe(), body);
            return Err(OcrError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: RecognizeResponse =
            serde_json::from_str(&body).map_err(|e| OcrError::Decode(e.to_string()))?;
        parsed
            .text
            .ok_or_else(|| OcrError::Decode("missing 'text' field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let payload = RecognizeRequest {
            image_base64: STANDARD.encode(b"img"),
            language: "eng",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "image_base64": "aW1n", "language": "eng" })
        );
    }

    #[tokio::test]
    async fn test_missing_local_file_is_io_error() {
        let recognizer = HttpTextRecognizer::new(&OcrConfig::default()).unwrap();
        let missing = std::env::temp_dir().join("text_recognizer_missing.jpg");
        let result = recognizer.recognize(&ImageSource::Local(missing)).await;
        assert!(matches!(result, Err(OcrError::Io(_))));
    }
}
