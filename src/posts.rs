//! Post helpers shared by the feed, detail and edit views.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use std::cmp::Reverse;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::net::types::{Owner, Post};
use crate::state::session::Session;

pub const DEFAULT_EXCERPT_LEN: usize = 150;
const EMPTY_EXCERPT: &str = "No preview available";

/// Whether the logged-in user owns `post`. Requires both ids to be known.
#[must_use]
pub fn is_author(post: &Post, session: &Session) -> bool {
    let owner_id = post.owner.as_ref().and_then(Owner::id);
    let user_id = session.user_data().and_then(|u| u.id.as_deref());
    matches!((owner_id, user_id), (Some(owner), Some(user)) if owner == user)
}

/// Newest first by `createdAt`, falling back to `updatedAt`. Posts without a
/// parseable timestamp go last in their original order.
pub fn sort_latest_first(posts: &mut [Post]) {
    posts.sort_by_key(|post| Reverse(timestamp(post)));
}

fn timestamp(post: &Post) -> Option<OffsetDateTime> {
    [post.created_at.as_deref(), post.updated_at.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
}

/// Plain-text preview of editor HTML, at most `max_chars` characters plus
/// `...` when cut.
#[must_use]
pub fn excerpt(html: &str, max_chars: usize) -> String {
    if html.is_empty() {
        return EMPTY_EXCERPT.to_owned();
    }

    let decoded = strip_tags(html)
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Replace each complete `<...>` tag with a space. A `<` with no closing `>`
/// is ordinary text.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push(' ');
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
