// src/access/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{AccessControl, Capability};
use crate::{
    error::AppError,
    models::{
        context::{CONTEXT_LEVEL_MODULE, ContextRecord, ModuleContext},
        quiz::Quiz,
    },
};

/// Permission value of a role capability that overrides every allow.
pub const PERMISSION_PROHIBIT: i64 = -1000;

/// Allowed when some role of the user in the lineage allows `capability` and
/// none prohibits it. No matching rows means not allowed.
pub(crate) fn has_capability_query(
    user_id: i64,
    capability: Capability,
    context: &ModuleContext,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COALESCE(bool_or(rc.permission > 0) AND NOT bool_or(rc.permission <= ",
    );
    builder.push_bind(PERMISSION_PROHIBIT);
    builder.push(
        "), FALSE)
        FROM role_assignments ra
        JOIN role_capabilities rc ON rc.roleid = ra.roleid
        WHERE ra.userid = ",
    );
    builder.push_bind(user_id);
    builder.push(" AND rc.capability = ");
    builder.push_bind(capability.as_str());
    builder.push(" AND ra.contextid = ANY(");
    builder.push_bind(context.lineage().to_vec());
    builder.push(")");

    builder
}

/// Resolves contexts and role capabilities from PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAccessControl {
    pool: PgPool,
}

impl PgAccessControl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessControl for PgAccessControl {
    async fn module_context(&self, quiz: &Quiz) -> Result<Option<ContextRecord>, AppError> {
        let record = sqlx::query_as::<_, ContextRecord>(
            r#"
            SELECT
                ctx.id,
                cm.id AS course_module_id,
                cm.course AS course_id,
                ctx.path,
                cm.deletioninprogress AS deletion_in_progress
            FROM course_modules cm
            JOIN modules m ON m.id = cm.module AND m.name = 'quiz'
            JOIN contexts ctx ON ctx.instanceid = cm.id AND ctx.contextlevel = $3
            WHERE cm.instance = $1 AND cm.course = $2
            "#,
        )
        .bind(quiz.id)
        .bind(quiz.course)
        .bind(CONTEXT_LEVEL_MODULE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve context of quiz {}: {:?}", quiz.id, e);
            AppError::from(e)
        })?;

        Ok(record)
    }

    async fn has_capability(
        &self,
        user_id: i64,
        capability: Capability,
        context: &ModuleContext,
    ) -> Result<bool, AppError> {
        let mut builder = has_capability_query(user_id, capability, context);

        let allowed = builder
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await?;

        Ok(allowed)
    }
}
