//! Content generation with graceful degradation.
//!
//! A request walks an ordered list of tiers (paid AI, economy templates,
//! rule-based templates) until one produces something. Failures of the paid
//! tier never reach the caller; they only show up in the result's
//! `degraded_reason`.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::ai::{AiClient, AiError, PromptParams};
use crate::models::{GenerationKind, GenerationMode, GenerationRequest, GenerationResult};
use crate::text::{description, hashtags, tags, titles};

#[derive(Debug, thiserror::Error)]
pub enum TierError {
    #[error(transparent)]
    Ai(#[from] AiError),
}

#[async_trait]
pub trait GenerationTier: Send + Sync {
    fn mode(&self) -> GenerationMode;

    async fn attempt(&self, request: &GenerationRequest) -> Result<Vec<String>, TierError>;
}

pub struct AiTier {
    client: Arc<dyn AiClient>,
    timeout: Duration,
}

impl AiTier {
    pub fn new(client: Arc<dyn AiClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl GenerationTier for AiTier {
    fn mode(&self) -> GenerationMode {
        GenerationMode::Ai
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<Vec<String>, TierError> {
        let params = PromptParams {
            subject: &request.subject,
            niche: &request.niche,
            details: &request.details,
        };
        let call = self.client.generate(request.kind, params, request.max_results);
        let items = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AiError::Timeout)??;
        Ok(tidy_ai_items(request, items))
    }
}

/// Brings free-form model output in line with what the template tiers emit.
/// Hashtags get the niche's curated set merged in, as the economy tier does.
fn tidy_ai_items(request: &GenerationRequest, items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let items: Vec<String> = items
        .into_iter()
        .map(|item| match request.kind {
            GenerationKind::Titles => titles::ellipsize(&item),
            GenerationKind::Hashtags => hashtags::to_hashtag(&item),
            GenerationKind::Tags => tags::hyphenate(&item),
            GenerationKind::Description => item,
        })
        .filter(|item| !item.is_empty() && item != "#")
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect();

    match request.kind {
        GenerationKind::Hashtags if !items.is_empty() => {
            hashtags::blend_with_curated(&items, &request.niche, request.max_results, &[])
        }
        _ => items,
    }
}

pub struct EconomyTier;

#[async_trait]
impl GenerationTier for EconomyTier {
    fn mode(&self) -> GenerationMode {
        GenerationMode::Economy
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<Vec<String>, TierError> {
        let r = request;
        Ok(match r.kind {
            GenerationKind::Titles => titles::economy_titles(&r.subject, &r.niche, r.max_results),
            GenerationKind::Hashtags => hashtags::economy_hashtags(&r.subject, &r.niche, r.max_results),
            GenerationKind::Tags => tags::economy_tags(&r.subject, &r.details, r.max_results),
            GenerationKind::Description => {
                description::economy_description(&r.subject, &r.niche, &r.details)
            }
        })
    }
}

pub struct RuleBasedTier;

#[async_trait]
impl GenerationTier for RuleBasedTier {
    fn mode(&self) -> GenerationMode {
        GenerationMode::RuleBased
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<Vec<String>, TierError> {
        let r = request;
        Ok(match r.kind {
            GenerationKind::Titles => titles::rule_based_titles(&r.subject, r.max_results),
            GenerationKind::Hashtags => {
                hashtags::rule_based_hashtags(&r.subject, &r.niche, r.max_results)
            }
            GenerationKind::Tags => tags::rule_based_tags(&r.subject, &r.details, r.max_results),
            GenerationKind::Description => {
                description::rule_based_description(&r.subject, &r.niche, &r.details)
            }
        })
    }
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    ai: Option<Arc<dyn GenerationTier>>,
    economy: Arc<dyn GenerationTier>,
    rule_based: Arc<dyn GenerationTier>,
}

impl Default for GenerationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationOrchestrator {
    /// Template tiers only.
    pub fn new() -> Self {
        Self {
            ai: None,
            economy: Arc::new(EconomyTier),
            rule_based: Arc::new(RuleBasedTier),
        }
    }

    pub fn with_ai(mut self, client: Arc<dyn AiClient>, timeout: Duration) -> Self {
        self.ai = Some(Arc::new(AiTier::new(client, timeout)));
        self
    }

    pub fn ai_configured(&self) -> bool {
        self.ai.is_some()
    }

    /// Tiers to try for a requested mode, in order.
    fn chain(&self, requested: GenerationMode) -> Vec<&Arc<dyn GenerationTier>> {
        match requested {
            GenerationMode::RuleBased => vec![&self.rule_based],
            GenerationMode::Ai | GenerationMode::Economy => self
                .ai
                .iter()
                .chain([&self.economy, &self.rule_based])
                .collect(),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let mut ai_attempted = false;
        let mut degraded_reason = match request.mode {
            GenerationMode::Ai | GenerationMode::Economy if self.ai.is_none() => {
                Some("ai tier not configured".to_string())
            }
            _ => None,
        };
        let mut last_mode = request.mode;

        for tier in self.chain(request.mode) {
            let mode = tier.mode();
            last_mode = mode;
            if mode == GenerationMode::Ai {
                ai_attempted = true;
            }

            match tier.attempt(request).await {
                Ok(mut items) if !items.is_empty() => {
                    items.truncate(request.max_results);
                    if mode != request.mode {
                        tracing::info!(
                            kind = %request.kind,
                            requested = %request.mode,
                            used = %mode,
                            "generation degraded"
                        );
                    }
                    return GenerationResult {
                        items,
                        mode,
                        ai_attempted,
                        degraded_reason,
                    };
                }
                Ok(_) => {
                    tracing::debug!(kind = %request.kind, tier = %mode, "tier produced nothing");
                    degraded_reason.get_or_insert_with(|| format!("{} tier produced no results", mode));
                }
                Err(e) => {
                    tracing::warn!(kind = %request.kind, tier = %mode, error = %e, "generation tier failed");
                    degraded_reason.get_or_insert_with(|| format!("{} tier failed: {}", mode, e));
                }
            }
        }

        GenerationResult {
            items: Vec::new(),
            mode: last_mode,
            ai_attempted,
            degraded_reason,
        }
    }
}
