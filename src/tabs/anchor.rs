//! Lazy anchor index for tab panels
//!
//! Deep links may point at a heading inside a tab's content rather than at
//! the tab itself. To resolve those, each panel's rendered markup is
//! scanned for header-anchor links the first time it mounts, and the found
//! fragments are cached per tab. The cache is advisory: a tab that never
//! mounted has no entry and simply cannot satisfy content-anchor lookups.

use std::collections::HashSet;

use regex::Regex;

/// Per-tab cache of fragment identifiers found inside rendered panels
pub struct AnchorIndex {
    /// One entry per tab; `None` means "not yet scanned"
    sets: Vec<Option<HashSet<String>>>,

    /// Matches opening `<a ...>` tags
    anchor_tag: Regex,

    /// Captures the fragment of an in-page `href="#..."` attribute
    href: Regex,

    /// Captures the `class="..."` attribute value
    class_attr: Regex,
}

impl std::fmt::Debug for AnchorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorIndex")
            .field("sets", &self.sets)
            .finish()
    }
}

impl AnchorIndex {
    /// Create an index for a group with `tab_count` tabs, nothing scanned
    pub fn new(tab_count: usize) -> Self {
        Self {
            sets: vec![None; tab_count],
            anchor_tag: Regex::new(r"<a\s[^>]*>").expect("anchor tag pattern is valid"),
            href: Regex::new(r##"href\s*=\s*"#([^"]+)""##).expect("href pattern is valid"),
            class_attr: Regex::new(r#"class\s*=\s*"([^"]*)""#).expect("class pattern is valid"),
        }
    }

    /// Check whether the panel at `index` has been scanned
    pub fn is_scanned(&self, index: usize) -> bool {
        self.sets.get(index).map(Option::is_some).unwrap_or(false)
    }

    /// Scan `content` for header-anchor links and cache them for `index`
    ///
    /// At most one scan happens per tab; later calls for the same index are
    /// ignored, so re-activating a tab does not rescan its subtree.
    pub fn record(&mut self, index: usize, content: &str) {
        debug_assert!(index < self.sets.len(), "panel index {} out of range", index);
        let Some(slot) = self.sets.get_mut(index) else {
            return;
        };
        if slot.is_some() {
            return;
        }

        let mut anchors = HashSet::new();
        for tag in self.anchor_tag.find_iter(content) {
            let tag = tag.as_str();

            let is_header_anchor = self
                .class_attr
                .captures(tag)
                .map(|c| c[1].split_whitespace().any(|class| class == "header-anchor"))
                .unwrap_or(false);
            if !is_header_anchor {
                continue;
            }

            if let Some(captures) = self.href.captures(tag) {
                anchors.insert(captures[1].to_string());
            }
        }

        log::trace!("panel {} mounted with {} anchors", index, anchors.len());
        *slot = Some(anchors);
    }

    /// Find the tab whose cached anchors contain `fragment`
    pub fn lookup(&self, fragment: &str) -> Option<usize> {
        self.sets
            .iter()
            .position(|set| set.as_ref().is_some_and(|anchors| anchors.contains(fragment)))
    }
}
