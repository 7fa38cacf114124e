//! Fake extractor for development and tests.
//!
//! Drafts are matched by checking whether the input contains a registered
//! substring. Without a match the default draft is returned, or an error if
//! none is set.

use super::RecipeExtractor;
use crate::error::ExtractError;
use crate::types::RecipeDraft;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct FakeExtractor {
    /// (input substring, draft) pairs, checked in registration order
    responses: Vec<(String, RecipeDraft)>,
    default_draft: Option<RecipeDraft>,
}

impl Default for FakeExtractor {
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            default_draft: Some(placeholder_draft()),
        }
    }
}

fn placeholder_draft() -> RecipeDraft {
    RecipeDraft {
        name: "Untitled recipe".to_string(),
        author: "Unknown".to_string(),
        cuisine: "Unknown".to_string(),
        time_estimate_minutes: 0,
        meal: None,
        recipe_type: None,
        tags: Vec::new(),
        dietary_restrictions_met: Vec::new(),
        ingredients: Vec::new(),
        instructions: Vec::new(),
    }
}

impl FakeExtractor {
    /// An extractor that fails on any input it has no draft for.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            default_draft: None,
        }
    }

    pub fn with_response(mut self, input_contains: &str, draft: RecipeDraft) -> Self {
        self.responses.push((input_contains.to_lowercase(), draft));
        self
    }

    pub fn with_default_draft(mut self, draft: RecipeDraft) -> Self {
        self.default_draft = Some(draft);
        self
    }

    fn lookup(&self, input: &str, source: &'static str) -> Result<RecipeDraft, ExtractError> {
        let input = input.to_lowercase();
        self.responses
            .iter()
            .find(|(pattern, _)| input.contains(pattern.as_str()))
            .map(|(_, draft)| draft.clone())
            .or_else(|| self.default_draft.clone())
            .ok_or(ExtractError::Unparseable(source))
    }
}

#[async_trait]
impl RecipeExtractor for FakeExtractor {
    async fn from_markdown(&self, markdown: &str) -> Result<RecipeDraft, ExtractError> {
        self.lookup(markdown, "input")
    }

    async fn from_images(&self, images: &[Vec<u8>]) -> Result<RecipeDraft, ExtractError> {
        if images.is_empty() {
            return Err(ExtractError::Unparseable("image"));
        }
        let text: String = images
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.lookup(&text, "image")
    }

    async fn from_url(&self, url: &str) -> Result<RecipeDraft, ExtractError> {
        self.lookup(url, "URL")
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ..placeholder_draft()
        }
    }

    #[tokio::test]
    async fn test_fake_extractor_matching_is_case_insensitive() {
        let extractor = FakeExtractor::new().with_response("SOUP", draft("Tomato Soup"));
        let result = extractor
            .from_url("https://example.com/tomato-soup")
            .await
            .unwrap();
        assert_eq!(result.name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_fake_extractor_no_match() {
        let extractor = FakeExtractor::new();
        let err = extractor.from_url("https://example.com").await.unwrap_err();
        assert!(matches!(err, ExtractError::Unparseable("URL")));
    }

    #[tokio::test]
    async fn test_fake_extractor_default_draft() {
        let extractor = FakeExtractor::new().with_default_draft(draft("Anything"));
        let result = extractor.from_markdown("# Mystery").await.unwrap();
        assert_eq!(result.name, "Anything");
    }

    #[tokio::test]
    async fn test_fake_extractor_requires_images() {
        let extractor = FakeExtractor::default();
        assert!(extractor.from_images(&[]).await.is_err());
        let result = extractor.from_images(&[b"page one".to_vec()]).await.unwrap();
        assert_eq!(result.name, "Untitled recipe");
    }
}
