//! Deferred content convention.
//!
//! A render callback marks heavy sub-resources (favicons, thumbnails) with
//! the [`DEFERRED_CLASS`] class and puts the real source in
//! [`PENDING_SRC_ATTR`]. Promotion copies it into [`LIVE_SRC_ATTR`] and
//! clears both markers.

use linkshelf_core::node::Node;

pub const DEFERRED_CLASS: &str = "lazy-image";
pub const PENDING_SRC_ATTR: &str = "data-src";
pub const LIVE_SRC_ATTR: &str = "src";

/// An `img` node whose source loads once its item nears the viewport.
pub fn deferred_image(src: impl Into<String>) -> Node {
    Node::new("img")
        .with_class(DEFERRED_CLASS)
        .with_attr(PENDING_SRC_ATTR, src)
}

pub fn has_deferred(root: &Node) -> bool {
    root.query_class(DEFERRED_CLASS)
        .iter()
        .any(|n| n.has_attr(PENDING_SRC_ATTR))
}

/// Promotes every deferred marker in `root`'s subtree and returns how many
/// were promoted. Markers without a pending source are left alone.
pub fn promote_deferred(root: &Node) -> usize {
    let mut promoted = 0;
    for marker in root.query_class(DEFERRED_CLASS) {
        if let Some(src) = marker.remove_attr(PENDING_SRC_ATTR) {
            marker.set_attr(LIVE_SRC_ATTR, src);
            marker.remove_class(DEFERRED_CLASS);
            promoted += 1;
        }
    }
    promoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_nested_markers_once() {
        let card = Node::new("div")
            .with_child(deferred_image("https://a.example/favicon.ico"))
            .with_child(Node::new("div").with_child(deferred_image("https://b.example/icon.png")));

        assert!(has_deferred(&card));
        assert_eq!(promote_deferred(&card), 2);
        assert!(!has_deferred(&card));
        assert_eq!(promote_deferred(&card), 0);

        let imgs: Vec<_> = card
            .children()
            .into_iter()
            .flat_map(|c| if c.tag() == "img" { vec![c] } else { c.children() })
            .collect();
        assert_eq!(imgs[0].attr(LIVE_SRC_ATTR).as_deref(), Some("https://a.example/favicon.ico"));
        assert_eq!(imgs[1].attr(LIVE_SRC_ATTR).as_deref(), Some("https://b.example/icon.png"));
        assert!(imgs.iter().all(|i| !i.has_class(DEFERRED_CLASS)));
    }

    #[test]
    fn marker_without_source_is_left_alone() {
        let img = Node::new("img").with_class(DEFERRED_CLASS);
        assert_eq!(promote_deferred(&img), 0);
        assert!(img.has_class(DEFERRED_CLASS));
        assert!(!img.has_attr(LIVE_SRC_ATTR));
    }
}
