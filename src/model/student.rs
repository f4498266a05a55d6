use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "parent_id": 3,
        "name": "Ada Lovelace",
        "email": "ada@school.example",
        "qr_code": "STU-0007"
    })
)]
pub struct Student {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = 3)]
    pub parent_id: i64,

    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[schema(example = "ada@school.example")]
    pub email: String,

    #[schema(example = "STU-0007")]
    pub qr_code: String,
}
