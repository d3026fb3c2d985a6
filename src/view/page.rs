//! Feed page rendering
//!
//! One page shows everything: the post forms, an optional message from a
//! failed upload, and the feed with edit/delete controls per post.

use std::fmt::Write;

use super::escape::escape_html;
use crate::feed::{FeedStore, Post, PostKind};
use crate::upload::FILE_FIELD;

const STYLE: &str = r"
        * { box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.5;
            max-width: 720px;
            margin: 0 auto;
            padding: 24px 16px;
            background: #f5f5f7;
            color: #222;
        }
        h1 { margin-bottom: 16px; }
        form.compose { background: #fff; padding: 12px; border-radius: 8px; margin-bottom: 12px; }
        form.compose textarea { width: 100%; min-height: 72px; }
        .message { background: #fde8e8; color: #9b1c1c; padding: 8px 12px; border-radius: 6px; }
        .feed { list-style: none; padding: 0; }
        .post { background: #fff; padding: 12px; border-radius: 8px; margin: 12px 0; }
        .post-text p { white-space: pre-wrap; word-wrap: break-word; margin: 0 0 8px; }
        .post-image img { max-width: 100%; display: block; margin-bottom: 8px; }
        .controls { display: flex; gap: 8px; }
        .controls form { display: inline; }
        .empty { color: #777; }
";

/// Render the full board page
pub fn render_feed_page(title: &str, feed: &FeedStore, message: Option<&str>) -> String {
    let title = escape_html(title);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <h1>{title}</h1>
    <form class="compose" action="/submit" method="post">
        <textarea name="post" placeholder="Write something..."></textarea>
        <button type="submit">Post</button>
    </form>
    <form class="compose" action="/upload" method="post" enctype="multipart/form-data">
        <input type="file" name="{FILE_FIELD}" accept="image/png,image/jpeg,image/gif">
        <button type="submit">Upload image</button>
    </form>
"#
    );

    if let Some(message) = message {
        let _ = writeln!(
            html,
            r#"    <p class="message">{}</p>"#,
            escape_html(message)
        );
    }

    if feed.is_empty() {
        html.push_str("    <p class=\"empty\">No posts yet.</p>\n");
    } else {
        html.push_str("    <ul class=\"feed\">\n");
        for post in feed.list() {
            render_post(&mut html, post);
        }
        html.push_str("    </ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_post(html: &mut String, post: &Post) {
    let id = post.id;
    let content = escape_html(&post.content);

    let _ = writeln!(
        html,
        r#"        <li class="post post-{}" id="post-{id}">"#,
        post.kind
    );
    match post.kind {
        PostKind::Text => {
            let _ = writeln!(html, "            <p>{content}</p>");
        }
        PostKind::Image => {
            let _ = writeln!(html, r#"            <img src="{content}" alt="Uploaded image">"#);
        }
    }
    let _ = write!(
        html,
        r#"            <div class="controls">
                <form action="/update" method="post">
                    <input type="hidden" name="itemId" value="{id}">
                    <input type="text" name="updatedContent" value="{content}" required>
                    <button type="submit">Save</button>
                </form>
                <form action="/delete" method="post">
                    <input type="hidden" name="itemId" value="{id}">
                    <button type="submit">Delete</button>
                </form>
            </div>
        </li>
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_feed() {
        let html = render_feed_page("Board", &FeedStore::new(), None);
        assert!(html.contains("<title>Board</title>"));
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("class=\"message\""));
    }

    #[test]
    fn test_renders_posts_in_order() {
        let mut store = FeedStore::new();
        let first = store.append_text("first note").unwrap();
        let image = store.append_image("/uploads/cat.png");

        let html = render_feed_page("Board", &store, None);

        let text_at = html.find("first note").unwrap();
        let img_at = html.find(r#"<img src="/uploads/cat.png""#).unwrap();
        assert!(text_at < img_at);
        assert!(html.contains(&format!(r#"id="post-{first}""#)));
        assert!(html.contains(&format!(r#"name="itemId" value="{image}""#)));
        assert!(html.contains(r#"class="post post-image""#));
    }

    #[test]
    fn test_escapes_user_content() {
        let mut store = FeedStore::new();
        store.append_text("<b>\"hi\"</b>").unwrap();

        let html = render_feed_page("<Board>", &store, Some("<oops>"));

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;&quot;hi&quot;&lt;/b&gt;"));
        assert!(html.contains("<title>&lt;Board&gt;</title>"));
        assert!(html.contains("&lt;oops&gt;"));
    }

    #[test]
    fn test_message() {
        let html = render_feed_page("Board", &FeedStore::new(), Some("Only image files are allowed"));
        assert!(html.contains(r#"<p class="message">Only image files are allowed</p>"#));
    }
}
