use serde::{Deserialize, Serialize};

/// Account row linking an authenticated user to their students. Only the
/// identifier is read; the auth-user column is used as a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Parent {
    pub id: i64,
}
