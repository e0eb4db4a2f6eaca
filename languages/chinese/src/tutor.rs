use std::sync::Arc;

use yuedu_ai::{ChatError, ChatMessage, ChatRequest, ChatService};
use yuedu_core::MarkerPair;
use yuedu_core::language::LanguageProcessor;
use yuedu_core::response::parse_term_response;
use yuedu_types::TermInfo;

use crate::processor::ChineseProcessor;
use crate::prompt::PromptTemplate;

const DEFAULT_LOOKUP_PROMPT: &str = include_str!("../prompts/lookup.txt");
const DEFAULT_ARTICLE_PROMPT: &str = include_str!("../prompts/article.txt");
const DEFAULT_ARTICLE_MODEL: &str = "gpt-4o";

/// Term lookups and article annotation through the AI chat service
#[derive(Clone)]
pub struct ChineseTutor {
    chat: Arc<dyn ChatService>,
    processor: ChineseProcessor,
    markers: MarkerPair,
    lookup_prompt: PromptTemplate,
    article_prompt: PromptTemplate,
    article_model: String,
}

impl ChineseTutor {
    pub fn new(chat: Arc<dyn ChatService>) -> Self {
        Self {
            chat,
            processor: ChineseProcessor::new(),
            markers: MarkerPair::default(),
            lookup_prompt: PromptTemplate::new(DEFAULT_LOOKUP_PROMPT),
            article_prompt: PromptTemplate::new(DEFAULT_ARTICLE_PROMPT),
            article_model: DEFAULT_ARTICLE_MODEL.to_string(),
        }
    }

    pub fn with_markers(mut self, markers: MarkerPair) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_lookup_prompt(mut self, template: PromptTemplate) -> Self {
        self.lookup_prompt = template;
        self
    }

    pub fn with_article_prompt(mut self, template: PromptTemplate) -> Self {
        self.article_prompt = template;
        self
    }

    pub fn with_article_model(mut self, model: impl Into<String>) -> Self {
        self.article_model = model.into();
        self
    }

    pub fn is_ready(&self) -> bool {
        self.chat.ready()
    }

    pub fn chat(&self) -> &Arc<dyn ChatService> {
        &self.chat
    }

    /// Lookup prompt for `term` as it appears in the annotated `line`
    pub fn lookup_prompt(&self, term: &str, line: &str, article: &str) -> String {
        let context = self.processor.context(line, &self.markers);
        self.lookup_prompt.render(&[
            ("term", term),
            ("line", &context),
            ("article", article),
        ])
    }

    /// Pinyin, definition and example for one term occurrence
    pub async fn define(&self, term: &str, line: &str, article: &str) -> Result<TermInfo, ChatError> {
        let prompt = self.lookup_prompt(term, line, article);
        tracing::debug!("Looking up '{}' ({} prompt chars)", term, prompt.chars().count());

        let response = self.chat.chat(ChatRequest::prompt(prompt)).await?;

        Ok(parse_term_response(response.content()))
    }

    /// Annotate a raw article: the reply is the article with terms wrapped in markers
    pub async fn annotate(&self, article_text: &str) -> Result<String, ChatError> {
        let request = ChatRequest::messages(vec![
            ChatMessage::system(self.article_prompt.text()),
            ChatMessage::user(article_text),
        ])
        .with_model(self.article_model.clone());

        let response = self.chat.chat(request).await?;
        let content = response.content();

        if content.trim().is_empty() {
            return Err(ChatError::ApiError("Empty annotation reply".to_string()));
        }

        Ok(content.to_string())
    }
}
