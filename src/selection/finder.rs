//! LLM-backed clip finding.
//!
//! Wraps the chat-completion call and every way it can disappoint: no
//! credential means no call at all, and a transport or API failure drops
//! straight to the deterministic selector. Callers always get candidates
//! back, never an error.

use super::{fallback::select_fallback_clips, ClipCandidate, DurationBand, ResponseParser};
use crate::config::Prompts;
use crate::openai::create_client;
use crate::transcript::Transcript;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Finds noteworthy clip candidates in a transcript via a language model.
pub struct ClipFinder {
    client: Option<async_openai::Client<async_openai::config::OpenAIConfig>>,
    model: String,
    parser: ResponseParser,
    prompts: Prompts,
    band: DurationBand,
}

impl ClipFinder {
    /// Create a finder.
    ///
    /// Without an API key the finder never talks to the network and serves
    /// deterministic fallback candidates instead.
    pub fn new(api_key: Option<&str>, model: &str) -> Self {
        let client = match api_key {
            Some(key) if !key.is_empty() => Some(create_client(key)),
            _ => {
                warn!("No API key provided, clip selection will use the fallback path");
                None
            }
        };

        Self {
            client,
            model: model.to_string(),
            parser: ResponseParser::new(),
            prompts: Prompts::default(),
            band: DurationBand::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the clip duration band advertised in the prompt.
    pub fn with_duration_band(mut self, band: DurationBand) -> Self {
        self.band = band;
        self
    }

    /// Render the user prompt for a transcript.
    pub fn build_prompt(
        &self,
        intent: &str,
        transcript: &Transcript,
        min_clips: u32,
        max_clips: u32,
    ) -> String {
        let vars = self.prompt_vars(intent, transcript, min_clips, max_clips);
        self.prompts
            .render_with_custom(&self.prompts.selection.user, &vars)
    }

    fn prompt_vars(
        &self,
        intent: &str,
        transcript: &Transcript,
        min_clips: u32,
        max_clips: u32,
    ) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("intent".to_string(), intent.to_string());
        vars.insert(
            "transcript".to_string(),
            transcript.format_with_timestamps(),
        );
        vars.insert("min_clips".to_string(), min_clips.to_string());
        vars.insert("max_clips".to_string(), max_clips.to_string());
        vars.insert(
            "min_seconds".to_string(),
            format!("{:.0}", self.band.min_seconds),
        );
        vars.insert(
            "max_seconds".to_string(),
            format!("{:.0}", self.band.max_seconds),
        );
        vars
    }

    /// Ask the model for clip candidates, falling back deterministically.
    ///
    /// A failed call skips response parsing entirely; an unparseable
    /// response falls back inside the parser. Neither surfaces as an error.
    pub async fn find_clips(
        &self,
        intent: &str,
        transcript: &Transcript,
        min_clips: u32,
        max_clips: u32,
    ) -> Vec<ClipCandidate> {
        let Some(client) = &self.client else {
            info!("Using fallback clip selection (no API key)");
            return select_fallback_clips(transcript);
        };

        info!("Finding clips with {} for intent '{}'", self.model, intent);

        let vars = self.prompt_vars(intent, transcript, min_clips, max_clips);
        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.selection.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.selection.user, &vars);

        match self
            .request_completion(client, &system_message, &user_message)
            .await
        {
            Ok(response) => {
                debug!(
                    "Model response: {}",
                    &response[..response.len().min(500)]
                );
                self.parser.parse(&response, transcript)
            }
            Err(e) => {
                warn!("Clip selection call failed, using fallback: {}", e);
                select_fallback_clips(transcript)
            }
        }
    }

    async fn request_completion(
        &self,
        client: &async_openai::Client<async_openai::config::OpenAIConfig>,
        system_message: &str,
        user_message: &str,
    ) -> crate::error::Result<String> {
        use crate::error::KlippError;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| KlippError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| KlippError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| KlippError::OpenAI(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| KlippError::OpenAI(format!("Chat completion failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| KlippError::OpenAI("Empty response from model".to_string()))
    }
}
