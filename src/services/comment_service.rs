use chrono::Local;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;

use crate::{
    entity::{
        comment::{ActiveModel as CommentActive, Column as CommentCol, Entity as Comments, Model as CommentModel},
        product::Entity as Products,
        users::{Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CommentAuthor, CommentView},
    state::AppState,
};

const MAX_CONTENT_LEN: usize = 255;

/// Comments of a product, newest first.
pub async fn load_comments(state: &AppState, product_id: i32) -> AppResult<Vec<CommentView>> {
    let rows = Comments::find()
        .filter(CommentCol::ProductId.eq(product_id))
        .order_by_desc(CommentCol::CreatedDate)
        .order_by_desc(CommentCol::Id)
        .find_also_related(Users)
        .all(&state.orm)
        .await?;

    rows.into_iter()
        .map(|(comment, user)| {
            let user = user.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("comment {} has no author", comment.id))
            })?;
            Ok(comment_view(comment, user))
        })
        .collect()
}

pub async fn save_comment(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    content: &str,
) -> AppResult<CommentView> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("content is required".into()));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::BadRequest(format!(
            "content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }

    if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let author = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let comment = CommentActive {
        id: NotSet,
        content: Set(content.to_string()),
        created_date: Set(Local::now().naive_local()),
        user_id: Set(author.id),
        product_id: Set(product_id),
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(comment_id = comment.id, product_id, "comment saved");
    Ok(comment_view(comment, author))
}

fn comment_view(comment: CommentModel, user: UserModel) -> CommentView {
    CommentView {
        id: comment.id,
        content: comment.content,
        created_date: comment.created_date,
        user: CommentAuthor {
            name: user.name,
            avatar: user.image,
        },
    }
}
