//! Agent factory applying configuration defaults.

use std::sync::Arc;

use crate::config::DroverConfig;
use crate::transport::ChatTransport;

use super::{Agent, AgentOptions};

/// Materializes agents from configured defaults plus per-call overrides.
pub struct AgentManager {
    config: DroverConfig,
    transport: Arc<dyn ChatTransport>,
}

impl AgentManager {
    pub fn new(config: DroverConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &DroverConfig {
        &self.config
    }

    /// Create an agent with `overrides` deep-merged over the configured
    /// defaults.
    pub fn agent(&self, overrides: AgentOptions) -> Agent {
        let options = self.config.default_options().merged_with(&overrides);
        Agent::new(Arc::clone(&self.transport), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DroverError;
    use crate::transport::{
        CompletionRequest, SpeechRequest, StreamDelta, TranscribeRequest,
    };
    use crate::types::AssistantReply;
    use async_trait::async_trait;
    use futures::stream::BoxStream;

    struct NullTransport;

    #[async_trait]
    impl ChatTransport for NullTransport {
        async fn create_completion(
            &self,
            _request: &CompletionRequest,
        ) -> Result<AssistantReply, DroverError> {
            Ok(AssistantReply::default())
        }

        async fn stream_completion(
            &self,
            _request: &CompletionRequest,
        ) -> Result<BoxStream<'static, Result<StreamDelta, DroverError>>, DroverError> {
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn speech(&self, _request: &SpeechRequest) -> Result<Vec<u8>, DroverError> {
            Ok(Vec::new())
        }

        async fn transcribe(&self, _request: &TranscribeRequest) -> Result<String, DroverError> {
            Ok(String::new())
        }
    }

    #[test]
    fn agent_inherits_config_defaults() {
        let manager = AgentManager::new(DroverConfig::default(), Arc::new(NullTransport));
        let agent = manager.agent(AgentOptions::default());
        assert_eq!(agent.options().model.as_deref(), Some("gpt-4o"));
        assert_eq!(agent.options().temperature, Some(0.7));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let manager = AgentManager::new(DroverConfig::default(), Arc::new(NullTransport));
        let agent = manager.agent(
            AgentOptions::default()
                .with_model("gpt-4o-mini")
                .with_system_prompt("You are terse."),
        );
        assert_eq!(agent.options().model.as_deref(), Some("gpt-4o-mini"));
        // system prompt seeds the transcript
        assert_eq!(agent.messages().len(), 1);
        assert_eq!(agent.messages()[0].content, "You are terse.");
    }
}
