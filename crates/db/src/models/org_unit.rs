use gemelli_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: DbId,
    pub nombre: String,
}
