use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload identifying a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid, // users.id
    pub email: String,
    pub iat: i64, // issued at (unix seconds)
    pub exp: i64, // expires at (unix seconds)
}
