// Feed store
// Ordered in-memory sequence of posts, oldest first

use super::error::FeedError;
use super::post::{Post, PostId, PostKind};

/// Holds the feed and provides the only legal mutations on it
#[derive(Debug, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
    next_id: u64,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current posts in display order
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Current display position of a post
    pub fn position(&self, id: PostId) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    /// Append a text post
    ///
    /// Blank text is rejected. The text is stored as submitted; trimming is
    /// only used for the emptiness check.
    pub fn append_text(&mut self, text: &str) -> Result<PostId, FeedError> {
        if text.trim().is_empty() {
            return Err(FeedError::EmptyText);
        }
        Ok(self.push(PostKind::Text, text.to_string()))
    }

    /// Append an image post pointing at an already stored upload
    pub fn append_image(&mut self, url: impl Into<String>) -> PostId {
        self.push(PostKind::Image, url.into())
    }

    /// Replace the content of a post in place; its kind never changes
    pub fn update(&mut self, id: PostId, content: &str) -> Result<(), FeedError> {
        if content.is_empty() {
            return Err(FeedError::EmptyContent);
        }
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(FeedError::NotFound(id))?;
        post.content = content.to_string();
        Ok(())
    }

    /// Remove a post, returning it
    pub fn delete(&mut self, id: PostId) -> Result<Post, FeedError> {
        let index = self.position(id).ok_or(FeedError::NotFound(id))?;
        Ok(self.posts.remove(index))
    }

    fn push(&mut self, kind: PostKind, content: String) -> PostId {
        let id = PostId::new(self.next_id);
        self.next_id += 1;
        self.posts.push(Post { id, kind, content });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(store: &FeedStore) -> Vec<(PostKind, &str)> {
        store
            .list()
            .iter()
            .map(|p| (p.kind, p.content.as_str()))
            .collect()
    }

    #[test]
    fn test_append_text() {
        let mut store = FeedStore::new();
        let id = store.append_text("hello").unwrap();

        assert_eq!(store.list().len(), 1);
        let tail = store.list().last().unwrap();
        assert_eq!(tail.id, id);
        assert_eq!(tail.kind, PostKind::Text);
        assert_eq!(tail.content, "hello");
    }

    #[test]
    fn test_lookup() {
        let mut store = FeedStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);

        let a = store.append_text("a").unwrap();
        let b = store.append_image("/uploads/b.png");
        assert!(!store.is_empty());
        assert_eq!(store.len(), 2);

        let post = store.get(b).unwrap();
        assert_eq!((post.kind, post.content.as_str()), (PostKind::Image, "/uploads/b.png"));
        assert_eq!(store.position(a), Some(0));
        assert_eq!(store.position(b), Some(1));

        store.delete(a).unwrap();
        assert!(store.get(a).is_none());
        assert_eq!(store.position(a), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_text_keeps_whitespace() {
        let mut store = FeedStore::new();
        store.append_text("  padded  ").unwrap();
        assert_eq!(store.list()[0].content, "  padded  ");
    }

    #[test]
    fn test_append_blank_text_rejected() {
        let mut store = FeedStore::new();
        assert_eq!(store.append_text(""), Err(FeedError::EmptyText));
        assert_eq!(store.append_text("   "), Err(FeedError::EmptyText));
        assert_eq!(store.append_text("\n\t"), Err(FeedError::EmptyText));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = FeedStore::new();
        let texts = ["one", "two", "three", "four"];
        for t in texts {
            store.append_text(t).unwrap();
        }
        let listed: Vec<&str> = store.list().iter().map(|p| p.content.as_str()).collect();
        assert_eq!(listed, texts);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut store = FeedStore::new();
        let a = store.append_text("a").unwrap();
        let b = store.append_image("/uploads/b.png");
        store.delete(b).unwrap();
        let c = store.append_text("c").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_delete_shifts_later_posts() {
        let mut store = FeedStore::new();
        let a = store.append_text("a").unwrap();
        let b = store.append_text("b").unwrap();
        let c = store.append_text("c").unwrap();

        let removed = store.delete(b).unwrap();
        assert_eq!(removed.content, "b");
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.position(a), Some(0));
        assert_eq!(store.position(c), Some(1));
        assert!(store.get(b).is_none());
    }

    #[test]
    fn test_delete_unknown_is_rejected() {
        let mut store = FeedStore::new();
        store.append_text("a").unwrap();

        let missing = PostId::new(42);
        assert_eq!(store.delete(missing), Err(FeedError::NotFound(missing)));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_deleted_id_stays_invalid() {
        let mut store = FeedStore::new();
        let a = store.append_text("a").unwrap();
        store.append_text("b").unwrap();
        store.delete(a).unwrap();

        assert!(store.delete(a).is_err());
        assert_eq!(contents(&store), vec![(PostKind::Text, "b")]);
    }

    #[test]
    fn test_update_replaces_only_target() {
        let mut store = FeedStore::new();
        let a = store.append_text("a").unwrap();
        let b = store.append_text("b").unwrap();

        store.update(b, "bee").unwrap();
        assert_eq!(
            contents(&store),
            vec![(PostKind::Text, "a"), (PostKind::Text, "bee")]
        );
        assert_eq!(store.get(a).unwrap().content, "a");
    }

    #[test]
    fn test_update_never_changes_kind() {
        let mut store = FeedStore::new();
        let id = store.append_text("caption").unwrap();
        store.update(id, "/uploads/cat.png").unwrap();

        let post = store.get(id).unwrap();
        assert_eq!(post.kind, PostKind::Text);
        assert_eq!(post.content, "/uploads/cat.png");
    }

    #[test]
    fn test_update_rejections() {
        let mut store = FeedStore::new();
        let id = store.append_text("a").unwrap();

        assert_eq!(store.update(id, ""), Err(FeedError::EmptyContent));
        let missing = PostId::new(9);
        assert_eq!(store.update(missing, "x"), Err(FeedError::NotFound(missing)));
        assert_eq!(store.get(id).unwrap().content, "a");
    }

    #[test]
    fn test_update_accepts_whitespace_content() {
        let mut store = FeedStore::new();
        let id = store.append_text("a").unwrap();
        store.update(id, "  ").unwrap();
        assert_eq!(store.get(id).unwrap().content, "  ");
    }

    #[test]
    fn test_feed_scenario() {
        let mut store = FeedStore::new();

        let hello = store.append_text("hello").unwrap();
        assert_eq!(contents(&store), vec![(PostKind::Text, "hello")]);

        assert!(store.append_text("").is_err());
        assert_eq!(contents(&store), vec![(PostKind::Text, "hello")]);

        let image = store.append_image("/uploads/a.png");
        assert_eq!(
            contents(&store),
            vec![(PostKind::Text, "hello"), (PostKind::Image, "/uploads/a.png")]
        );

        store.delete(hello).unwrap();
        assert_eq!(contents(&store), vec![(PostKind::Image, "/uploads/a.png")]);
        assert_eq!(store.position(image), Some(0));

        store.update(image, "/uploads/b.png").unwrap();
        assert_eq!(contents(&store), vec![(PostKind::Image, "/uploads/b.png")]);
    }
}
