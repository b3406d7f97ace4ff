use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,

    #[schema(example = "jane@acme.example", format = "email")]
    pub email: String,

    #[schema(example = "Jane Admin")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub sub: String,
    pub name: String,
    pub tenant_id: String,
    pub exp: usize,
    pub jti: String,
}
