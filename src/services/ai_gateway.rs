//! Prompt construction and the single completion boundary.
//!
//! Prompt builders are pure. `AiGateway::complete` is the only place a
//! model call happens and it normalises whatever text comes back.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::domain::{CatalogError, CatalogResult, MenuItem};

/// Raw text-completion capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> CatalogResult<String>;
}

#[derive(Clone)]
pub struct AiGateway {
    client: Arc<dyn CompletionClient>,
}

impl AiGateway {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Sends a prompt and returns the trimmed, quote-stripped reply.
    pub async fn complete(&self, prompt: &str) -> CatalogResult<String> {
        let raw = self.client.complete(prompt).await?;
        let text = raw.trim().trim_matches('"').trim();
        if text.is_empty() {
            return Err(CatalogError::AiEmptyResponse);
        }
        Ok(text.to_string())
    }

    pub fn build_description_prompt(name: &str, ingredients: &[String]) -> String {
        format!(
            r#"Role: Senior Culinary Copywriter.
Task: Write a menu description for "{name}".

Ingredients: {ingredients}.

Constraints:
1. Focus on SENSORY details (texture, temperature, specific flavor notes).
2. Do NOT use generic words like "delicious", "yummy", or "tasty".
3. Keep it under 20 words.
4. Language: English (Elegant & Appetizing).

Output example: "Silky steamed milk meets robust espresso, finished with a touch of caramelized sweetness."

Result without any intro or chit-chat:"#,
            ingredients = ingredients.join(", "),
        )
    }

    /// One catalog line per item: name, ingredients, category and price.
    pub fn catalog_summary(catalog: &[MenuItem]) -> String {
        let mut summary = String::new();
        for item in catalog {
            let _ = writeln!(
                summary,
                "- {} (Ingredients: {}, Category: {}, Price: {})",
                item.name,
                item.ingredients.join(", "),
                item.category,
                item.price.normalize(),
            );
        }
        summary
    }

    pub fn build_recommendation_prompt(preference: &str, catalog_summary: &str) -> String {
        format!(
            r#"Role: Strict Menu Recommendation Engine.
Context:
User Request: "{preference}"
Available Menu:
{catalog_summary}
Task: Recommend 1-3 items based on the user request.

CRITICAL INSTRUCTION:
1. Output MUST be a valid JSON Array and nothing else.
2. Use the EXACT menu name from the list above, character for character.
3. Format: [{{"menu_name": "Exact Name", "reason": "Why it fits"}}]
4. No Markdown code fences. No intro. No commentary.
5. If nothing fits, output: []"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::fixtures::item;

    fn gateway_returning(reply: &'static str) -> AiGateway {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(move |_| Ok(reply.to_string()));
        AiGateway::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_complete_trims_and_strips_quotes() {
        let gateway = gateway_returning("  \"Velvety foam over dark espresso.\"\n");
        let text = gateway.complete("prompt").await.unwrap();
        assert_eq!(text, "Velvety foam over dark espresso.");
    }

    #[tokio::test]
    async fn test_complete_blank_reply_is_empty_response() {
        let gateway = gateway_returning(" \"\" \n");
        assert!(matches!(
            gateway.complete("prompt").await,
            Err(CatalogError::AiEmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_complete_propagates_unavailable() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_| Err(CatalogError::AiUnavailable("down".to_string())));
        let gateway = AiGateway::new(Arc::new(client));
        assert!(matches!(
            gateway.complete("prompt").await,
            Err(CatalogError::AiUnavailable(_))
        ));
    }

    #[test]
    fn test_description_prompt_is_deterministic() {
        let ingredients = vec!["espresso".to_string(), "milk".to_string()];
        let first = AiGateway::build_description_prompt("Latte", &ingredients);
        let second = AiGateway::build_description_prompt("Latte", &ingredients);
        assert_eq!(first, second);
        assert!(first.contains("\"Latte\""));
        assert!(first.contains("Ingredients: espresso, milk."));
        assert!(first.contains("under 20 words"));
    }

    #[test]
    fn test_recommendation_prompt_embeds_catalog() {
        let catalog = vec![item(1, "Latte", "Coffee", 30), item(2, "Mocha", "Coffee", 35)];
        let summary = AiGateway::catalog_summary(&catalog);
        assert_eq!(summary.lines().count(), 2);
        assert!(summary.contains("- Latte (Ingredients: water, Category: Coffee, Price: 30)"));

        let prompt = AiGateway::build_recommendation_prompt("something sweet", &summary);
        assert!(prompt.contains("User Request: \"something sweet\""));
        assert!(prompt.contains("- Mocha (Ingredients: water, Category: Coffee, Price: 35)"));
        assert!(prompt.contains(r#"[{"menu_name": "Exact Name", "reason": "Why it fits"}]"#));
    }
}
