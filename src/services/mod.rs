//! Service layer: catalog orchestration and the AI integration.
//!
//! Contains the catalog service, the prompt gateway, the Gemini transport
//! and the recommendation reconciler.

pub mod ai_gateway;
pub mod catalog;
pub mod gemini;
pub mod reconciler;

pub use ai_gateway::{AiGateway, CompletionClient};
pub use catalog::MenuCatalogService;
pub use gemini::GeminiClient;
