use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::{
    coach,
    models::{Decision, DecisionDraft, DecisionGuidance, DecisionGuidanceInput},
    storage::{self, Saved, Storage, DECISIONS_KEY},
};

/// How many entries the journal shows as "recent".
pub const RECENT_DECISIONS: usize = 6;

#[derive(Clone)]
pub struct DecisionJournal {
    storage: Arc<dyn Storage>,
    max_decisions: usize,
}

impl DecisionJournal {
    pub fn new(storage: Arc<dyn Storage>, max_decisions: usize) -> Self {
        Self {
            storage,
            max_decisions,
        }
    }

    /// All stored decisions, newest first.
    pub async fn all(&self) -> Vec<Decision> {
        storage::load(self.storage.as_ref(), DECISIONS_KEY, Vec::new()).await
    }

    pub async fn recent(&self, limit: usize) -> Vec<Decision> {
        let mut decisions = self.all().await;
        decisions.truncate(limit);
        decisions
    }

    /// Log a decision dated `today`. The decision text is required; a failed
    /// write is reported through `saved`, not as an error.
    pub async fn submit(&self, draft: DecisionDraft, today: NaiveDate) -> Result<Saved<Decision>> {
        let title = draft.decision.trim();
        if title.is_empty() {
            bail!("decision is required");
        }

        let decision = Decision {
            id: draft
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            date: today,
            decision: title.to_string(),
            options: draft.options.trim().to_string(),
            assumptions: draft.assumptions.trim().to_string(),
            next_action: draft.next_action.trim().to_string(),
        };

        let mut decisions = self.all().await;
        decisions.insert(0, decision.clone());
        decisions.truncate(self.max_decisions);
        let saved = storage::save(self.storage.as_ref(), DECISIONS_KEY, &decisions).await;

        Ok(Saved::new(decision, saved))
    }

    pub fn guide(&self, input: &DecisionGuidanceInput) -> DecisionGuidance {
        coach::guide(input)
    }
}
