use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_extraction_reply;
use async_trait::async_trait;
use std::sync::Arc;

/// `Extract(promptText) -> replyText`
#[async_trait]
pub trait TextExtractor {
    async fn extract(&self, prompt: &str) -> Result<String>;
}

/// Sends each prompt as a single user turn to the configured LLM provider.
pub struct LlmExtractor {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl LlmExtractor {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }
}

#[async_trait]
impl TextExtractor for LlmExtractor {
    async fn extract(&self, prompt: &str) -> Result<String> {
        let raw = self.llm_client.generate(&self.config, "", prompt).await?;
        Ok(clean_extraction_reply(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use std::sync::Mutex;

    struct CannedClient {
        reply: Result<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LLMClient for CannedClient {
        async fn generate(&self, _config: &LLMConfig, system: &str, user: &str) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_extract_sends_user_turn_and_cleans_reply() {
        let client = Arc::new(CannedClient {
            reply: Ok("<think>hm</think> \"John Acme\"\n".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let extractor = LlmExtractor::new(client.clone(), LLMConfig::default());

        let reply = extractor.extract("Find the name: John from Acme Corp").await.unwrap();
        assert_eq!(reply, "John Acme");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "");
        assert_eq!(seen[0].1, "Find the name: John from Acme Corp");
    }

    #[tokio::test]
    async fn test_extract_propagates_client_error() {
        let client = Arc::new(CannedClient {
            reply: Err(AppError::LLMError("API error (503)".to_string())),
            seen: Mutex::new(Vec::new()),
        });
        let extractor = LlmExtractor::new(client, LLMConfig::default());

        assert!(matches!(
            extractor.extract("x").await,
            Err(AppError::LLMError(_))
        ));
    }
}
