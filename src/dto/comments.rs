use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CommentView;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentCreated {
    pub status: u16,
    pub comment: CommentView,
}
