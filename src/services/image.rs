//! Doll image providers.
//!
//! The primary provider is an OpenAI-compatible images endpoint. When it is
//! not configured or fails, the free provider answers with a prompt URL that
//! renders on first fetch, so callers always get an image back.

use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image provider returned status {0}")]
    Status(u16),
    #[error("image provider returned no image")]
    Empty,
    #[error("image provider is not configured")]
    NotConfigured,
    #[error("invalid image url: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns a URL of the generated image.
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;
}

pub fn doll_prompt(name: &str, description: &str, is_good: bool) -> String {
    let mood = if is_good { "friendly, smiling" } else { "mischievous, cheeky" };
    format!(
        "A cute toy doll named {name}: {description}. {mood}, soft pastel colours, \
         rounded shapes, children's picture book style, plain background"
    )
}

pub struct OpenAiImages {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl OpenAiImages {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImages {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::NotConfigured)?;
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({
                "model": "dall-e-3",
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageError::Status(response.status().as_u16()));
        }

        let body: ImagesResponse = response.json().await?;
        body.data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or(ImageError::Empty)
    }
}

/// Free provider that renders from the prompt embedded in the URL.
pub struct PromptUrlImages {
    base: Url,
}

impl PromptUrlImages {
    pub fn new(base: &str) -> Result<Self, ImageError> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }

    pub fn url_for(&self, prompt: &str) -> Result<String, ImageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(prompt);
        url.query_pairs_mut()
            .append_pair("seed", &prompt_seed(prompt).to_string())
            .append_pair("nologo", "true");
        Ok(url.into())
    }
}

#[async_trait]
impl ImageGenerator for PromptUrlImages {
    fn name(&self) -> &'static str {
        "prompt-url"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        self.url_for(prompt)
    }
}

/// FNV-1a, so the same prompt maps to the same picture across restarts.
fn prompt_seed(prompt: &str) -> u32 {
    prompt.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

pub struct FallbackChain {
    primary: Box<dyn ImageGenerator>,
    fallback: Box<dyn ImageGenerator>,
}

impl FallbackChain {
    pub fn new(primary: Box<dyn ImageGenerator>, fallback: Box<dyn ImageGenerator>) -> Self {
        Self { primary, fallback }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ImageError> {
        let primary = OpenAiImages::new(cfg.image_api_url.clone(), cfg.image_api_key.clone())?;
        let fallback = PromptUrlImages::new(&cfg.fallback_image_url)?;
        Ok(Self::new(Box::new(primary), Box::new(fallback)))
    }
}

#[async_trait]
impl ImageGenerator for FallbackChain {
    fn name(&self) -> &'static str {
        "fallback-chain"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        match self.primary.generate(prompt).await {
            Ok(url) => Ok(url),
            Err(ImageError::NotConfigured) => self.fallback.generate(prompt).await,
            Err(e) => {
                tracing::warn!(
                    provider = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "primary image provider failed, falling back"
                );
                self.fallback.generate(prompt).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl ImageGenerator for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
            Err(ImageError::Status(503))
        }
    }

    #[test]
    fn prompt_mentions_mood() {
        assert!(doll_prompt("Pip", "a tin robot", true).contains("friendly"));
        assert!(doll_prompt("Pip", "a tin robot", false).contains("mischievous"));
    }

    #[test]
    fn prompt_url_is_encoded_and_stable() {
        let provider = PromptUrlImages::new("https://image.pollinations.ai/prompt/").unwrap();
        let first = provider.url_for("a tin robot").unwrap();
        let second = provider.url_for("a tin robot").unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("https://image.pollinations.ai/prompt/a%20tin%20robot?seed="));
        assert!(first.ends_with("&nologo=true"));
    }

    #[tokio::test]
    async fn chain_falls_back_when_primary_fails() {
        let chain = FallbackChain::new(
            Box::new(Broken),
            Box::new(PromptUrlImages::new("https://img.test/prompt/").unwrap()),
        );
        let url = chain.generate("robot").await.unwrap();
        assert!(url.starts_with("https://img.test/prompt/robot?"));
    }

    #[tokio::test]
    async fn unconfigured_primary_is_skipped() {
        let primary = OpenAiImages::new("http://127.0.0.1:9/never".to_string(), None).unwrap();
        assert!(matches!(
            primary.generate("robot").await,
            Err(ImageError::NotConfigured)
        ));
    }
}
