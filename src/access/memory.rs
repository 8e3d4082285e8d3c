// src/access/memory.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AccessControl, Capability};
use crate::{
    error::AppError,
    models::{
        context::{ContextRecord, ModuleContext},
        quiz::Quiz,
    },
};

/// In-memory contexts, capability grants and prohibits.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessControl {
    // quiz id -> context of its course module
    contexts: Arc<RwLock<HashMap<i64, ContextRecord>>>,
    // (user id, context id, capability)
    grants: Arc<RwLock<HashSet<(i64, i64, Capability)>>>,
    // (user id, context id, capability); overrides any grant
    prohibits: Arc<RwLock<HashSet<(i64, i64, Capability)>>>,
}

impl MemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_quiz_context(&self, quiz_id: i64, context: ContextRecord) {
        self.contexts.write().await.insert(quiz_id, context);
    }

    pub async fn grant(&self, user_id: i64, context_id: i64, capability: Capability) {
        self.grants
            .write()
            .await
            .insert((user_id, context_id, capability));
    }

    pub async fn prohibit(&self, user_id: i64, context_id: i64, capability: Capability) {
        self.prohibits
            .write()
            .await
            .insert((user_id, context_id, capability));
    }
}

#[async_trait]
impl AccessControl for MemoryAccessControl {
    async fn module_context(&self, quiz: &Quiz) -> Result<Option<ContextRecord>, AppError> {
        Ok(self.contexts.read().await.get(&quiz.id).cloned())
    }

    async fn has_capability(
        &self,
        user_id: i64,
        capability: Capability,
        context: &ModuleContext,
    ) -> Result<bool, AppError> {
        let grants = self.grants.read().await;
        let prohibits = self.prohibits.read().await;
        let held = |set: &HashSet<(i64, i64, Capability)>| {
            context
                .lineage()
                .iter()
                .any(|context_id| set.contains(&(user_id, *context_id, capability)))
        };

        Ok(held(&*grants) && !held(&*prohibits))
    }
}
