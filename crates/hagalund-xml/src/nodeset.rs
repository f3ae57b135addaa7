#![forbid(unsafe_code)]

//! NodeSet type returned by same-document resolvers.
//!
//! A `NodeSet` names a set of nodes of a parsed document by their
//! `NodeId` index.  Same-document references select either the whole
//! document or the subtree of one element, with or without comments,
//! so the set also remembers the byte span of the selected subtree.

use std::collections::HashSet;
use std::ops::Range;

/// A set of XML document nodes identified by `NodeId` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    nodes: HashSet<usize>,
    /// Whether comment nodes were kept when the set was built.
    with_comments: bool,
    /// Byte range of the subtree root in the document text, if the set
    /// was built from a single element.
    span: Option<Range<usize>>,
}

impl NodeSet {
    /// Create a node set containing all nodes in the document.
    pub fn all(doc: &roxmltree::Document<'_>) -> Self {
        Self::collect(doc.root(), true, None)
    }

    /// Create a node set containing all nodes except comments.
    /// Per W3C DSig, `URI=""` selects the document without comments.
    pub fn all_without_comments(doc: &roxmltree::Document<'_>) -> Self {
        Self::collect(doc.root(), false, None)
    }

    /// Create a node set for a subtree rooted at the given node (without comments).
    pub fn tree_without_comments(root: roxmltree::Node<'_, '_>) -> Self {
        Self::collect(root, false, Some(root.range()))
    }

    /// Create a node set for a subtree rooted at the given node (with comments).
    pub fn tree_with_comments(root: roxmltree::Node<'_, '_>) -> Self {
        Self::collect(root, true, Some(root.range()))
    }

    fn collect(
        root: roxmltree::Node<'_, '_>,
        with_comments: bool,
        span: Option<Range<usize>>,
    ) -> Self {
        let nodes = root
            .descendants()
            .filter(|n| with_comments || !n.is_comment())
            .map(|n| n.id().get_usize())
            .collect();
        Self {
            nodes,
            with_comments,
            span,
        }
    }

    /// Check if a node is in this set.
    pub fn contains(&self, node: roxmltree::Node<'_, '_>) -> bool {
        self.nodes.contains(&node.id().get_usize())
    }

    /// Whether comment nodes are part of the set.
    pub fn includes_comments(&self) -> bool {
        self.with_comments
    }

    /// Byte range of the selected subtree, `None` for whole-document sets.
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    /// Check if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the set.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = "<root><!-- c1 --><a Id=\"x\">text<!-- c2 --><b/></a></root>";

    fn element<'a>(doc: &'a roxmltree::Document<'a>, name: &str) -> roxmltree::Node<'a, 'a> {
        doc.descendants()
            .find(|n| n.has_tag_name(name))
            .unwrap()
    }

    #[test]
    fn test_all_with_and_without_comments() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let all = NodeSet::all(&doc);
        let plain = NodeSet::all_without_comments(&doc);
        assert_eq!(all.len(), plain.len() + 2);
        assert!(all.includes_comments());
        assert!(!plain.includes_comments());
        assert!(all.span().is_none());
        assert!(plain.contains(doc.root()));
    }

    #[test]
    fn test_subtree_selection() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let a = element(&doc, "a");
        let set = NodeSet::tree_without_comments(a);
        // a, text, b
        assert_eq!(set.len(), 3);
        assert!(set.contains(element(&doc, "b")));
        assert!(!set.contains(element(&doc, "root")));

        let span = set.span().unwrap();
        assert!(XML[span].starts_with("<a Id=\"x\">"));

        let with = NodeSet::tree_with_comments(a);
        assert_eq!(with.len(), 4);
    }
}
