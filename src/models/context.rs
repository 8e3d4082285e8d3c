// src/models/context.rs

use sqlx::FromRow;

use crate::error::AppError;

/// Context level of a course module in the 'contexts' table.
pub const CONTEXT_LEVEL_MODULE: i32 = 70;

/// Raw access-control context of a quiz's course module, as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ContextRecord {
    pub id: i64,
    pub course_module_id: i64,
    pub course_id: i64,

    /// Slash separated ancestor context ids ending with this context,
    /// e.g. `/1/15/42`.
    pub path: String,

    pub deletion_in_progress: bool,
}

/// A validated course-module context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub id: i64,
    pub course_module_id: i64,
    pub course_id: i64,
    lineage: Vec<i64>,
}

impl ModuleContext {
    /// Context ids from the system context down to this one.
    pub fn lineage(&self) -> &[i64] {
        &self.lineage
    }
}

/// Parses `/1/15/42` into `[1, 15, 42]`. Rejects empty segments and
/// non-positive ids.
pub fn parse_context_path(path: &str) -> Option<Vec<i64>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return None;
    }

    rest.split('/')
        .map(|segment| segment.parse::<i64>().ok().filter(|id| *id > 0))
        .collect()
}

impl TryFrom<ContextRecord> for ModuleContext {
    type Error = AppError;

    fn try_from(record: ContextRecord) -> Result<Self, Self::Error> {
        if record.deletion_in_progress {
            return Err(AppError::InvalidContext(
                "Quiz course module is being deleted".to_string(),
            ));
        }

        let lineage = parse_context_path(&record.path)
            .filter(|ids| ids.last() == Some(&record.id))
            .ok_or_else(|| {
                tracing::warn!(
                    "Context {} has malformed path '{}'",
                    record.id,
                    record.path
                );
                AppError::InvalidContext("Quiz context is invalid".to_string())
            })?;

        Ok(Self {
            id: record.id,
            course_module_id: record.course_module_id,
            course_id: record.course_id,
            lineage,
        })
    }
}
