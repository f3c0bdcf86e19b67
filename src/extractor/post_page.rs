//! Scraper for the post view page (`index.php?page=post&s=view&id=<ID>`).
use crate::{
    error::ExtractorError,
    post::{rating::Rating, Post},
    text::{extract_all, safe_int, Rule},
};

/// Fields of the post page, in the order they show up in the HTML.
///
/// The empty delimiters rely on the cursor left by the previous rule: `height` is whatever comes
/// between the `x` of `Size: WxH` and the next tag, and `score` sits inside the `<span>` that
/// follows the `Score:` label.
const POST_PAGE_RULES: [Rule<'static>; 11] = [
    (None, r#"<meta name="keywords""#, ""),
    (Some("tags"), " imageboard, ", "\""),
    (Some("id"), "<li>Id: ", "<"),
    (Some("created_at"), "<li>Posted: ", "<"),
    (Some("width"), "<li>Size: ", "x"),
    (Some("height"), "", "<"),
    (Some("source"), r#"<li>Source: <a href=""#, "\""),
    (Some("rating"), "<li>Rating: ", "<"),
    (None, "<li>Score: ", ""),
    (Some("score"), ">", "<"),
    (Some("file_url"), r#"<li><a href="http"#, "\""),
];

/// Builds a [`Post`] out of the HTML of a post page.
///
/// Fields that can't be found are left empty and numbers that can't be parsed become `0`.
/// Only a missing file link is an error, since there would be nothing to download.
pub fn parse_post_page(page: &str) -> Result<Post, ExtractorError> {
    let (data, _) = extract_all(page, &POST_PAGE_RULES, 0);

    let Some(file_url) = data.get("file_url") else {
        return Err(ExtractorError::MissingField {
            field: String::from("file_url"),
        });
    };

    let owned = |key: &str| data.get(key).map(|v| v.trim().to_string());

    let post = Post {
        id: safe_int(data.get("id").copied(), 0),
        tags: owned("tags").unwrap_or_default(),
        created_at: owned("created_at"),
        width: safe_int(data.get("width").copied(), 0),
        height: safe_int(data.get("height").copied(), 0),
        source: owned("source"),
        rating: data
            .get("rating")
            .map_or(Rating::Unknown, |r| Rating::from_rating_str(r)),
        score: safe_int(data.get("score").copied(), 0),
        ..Default::default()
    };

    Ok(post.with_file_url(format!("http{file_url}")))
}
