//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::types::BlogPost;
use crate::error::AppError;
use crate::filters;
use crate::routes::load_list;
use crate::shell::Shell;
use crate::state::AppState;

/// Blog index template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/blog_index.html")]
pub struct BlogIndexTemplate {
    pub shell: Shell,
    pub posts: Vec<BlogPost>,
    pub notice: Option<&'static str>,
}

/// Blog post template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/blog_post.html")]
pub struct BlogPostTemplate {
    pub shell: Shell,
    pub post: BlogPost,
}

/// Display the blog index.
pub async fn index(State(state): State<AppState>, shell: Shell) -> impl IntoResponse {
    let (posts, notice) = load_list(&state, &shell, "blogs").await;
    BlogIndexTemplate {
        shell,
        posts,
        notice,
    }
}

/// Display a single blog post.
///
/// A backend 404 renders the not-found page.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    shell: Shell,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound(format!("blog post {slug:?}")));
    }
    let path = format!("blogs/{}", urlencoding::encode(&slug));
    let post: BlogPost = state.api().get(&path, shell.credentials()).await?;

    Ok(BlogPostTemplate { shell, post })
}

/// A slug names exactly one path segment under `blogs/`.
///
/// Dot segments would be resolved by the URL join and reach other backend
/// paths.
fn is_valid_slug(slug: &str) -> bool {
    !matches!(slug, "" | "." | "..") && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("reading-food-labels"));
        assert!(is_valid_slug("v1.2-release"));

        for slug in ["", ".", "..", "../me", "a/b", "a\\b"] {
            assert!(!is_valid_slug(slug), "{slug:?} should be rejected");
        }
    }
}
