// src/access/mod.rs

//! Caller identity and the capability check port.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        context::{ContextRecord, ModuleContext},
        quiz::Quiz,
    },
};

pub use memory::MemoryAccessControl;
pub use postgres::PgAccessControl;

/// Role that bypasses every capability check.
pub const SITE_ADMIN_ROLE: &str = "admin";

/// Named permission grantable within a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewQuizReports,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewQuizReports => "mod/quiz:viewreports",
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: String,
}

impl Caller {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_site_admin(&self) -> bool {
        self.role == SITE_ADMIN_ROLE
    }
}

#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Context of the course module hosting `quiz`, if there is one.
    async fn module_context(&self, quiz: &Quiz) -> Result<Option<ContextRecord>, AppError>;

    /// Whether `user_id` holds `capability` in `context` or any of its
    /// ancestors.
    async fn has_capability(
        &self,
        user_id: i64,
        capability: Capability,
        context: &ModuleContext,
    ) -> Result<bool, AppError>;
}
