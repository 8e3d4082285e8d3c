// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Public identity of an attempt owner, projected from the 'users' table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserIdentity {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}
