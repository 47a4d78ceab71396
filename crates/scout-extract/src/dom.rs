//! Owned element tree built from the tree-sitter HTML grammar.
//!
//! The grammar's `text` tokens exclude surrounding whitespace, so the gaps
//! between sibling nodes are re-inserted from the source as text nodes.
//! `script`/`style` bodies, comments and the doctype are dropped here.
//! Elements nested deeper than [`MAX_DEPTH`] are flattened to their text, so
//! every walk over the resulting tree is bounded.

use std::borrow::Cow;

use ast_grep_core::Node;
use ast_grep_language::{LanguageExt, SupportLang};

/// Deepest element nesting kept in the tree.
pub const MAX_DEPTH: usize = 256;

/// An element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name; `#document` for the root.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl Element {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            HtmlNode::Element(el) => Some(el),
            HtmlNode::Text(_) => None,
        })
    }

    /// Every descendant element in document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// First descendant element matching `pred`, in document order.
    #[must_use]
    pub fn find(&self, pred: impl Fn(&Self) -> bool + Copy) -> Option<&Self> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendants, whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut raw = String::new();
        push_text(self, &mut raw);
        collapse_whitespace(&raw)
    }

    /// Remove every descendant element whose tag is in `tags`.
    pub fn prune(&mut self, tags: &[&str]) {
        self.children.retain(|child| match child {
            HtmlNode::Element(el) => !tags.contains(&el.tag.as_str()),
            HtmlNode::Text(_) => true,
        });
        for child in &mut self.children {
            if let HtmlNode::Element(el) = child {
                el.prune(tags);
            }
        }
    }
}

fn collect_descendants<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn push_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(inner) => {
                out.push(' ');
                push_text(inner, out);
                out.push(' ');
            }
        }
    }
}

/// Collapse runs of whitespace to one space and trim the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an HTML document into a `#document` root element.
#[must_use]
pub fn parse_document(html: &str) -> Element {
    let tree = SupportLang::Html.ast_grep(html);
    let root = tree.root();
    let mut children = Vec::new();
    convert_children(&root, html, &mut children, 1);
    Element {
        tag: "#document".to_string(),
        attrs: Vec::new(),
        children,
    }
}

/// Convert `node`'s children into elements at nesting level `depth`.
fn convert_children<D: ast_grep_core::Doc>(
    node: &Node<D>,
    source: &str,
    out: &mut Vec<HtmlNode>,
    depth: usize,
) {
    let mut prev_end: Option<usize> = None;

    for child in node.children() {
        let range = child.range();
        if let Some(prev) = prev_end
            && range.start > prev
            && let Some(gap) = source.get(prev..range.start)
        {
            out.push(HtmlNode::Text(gap.to_string()));
        }
        prev_end = Some(range.end);

        match child.kind().as_ref() {
            "element" if depth > MAX_DEPTH => out.push(HtmlNode::Text(flatten_text(&child))),
            "element" => {
                if let Some(el) = convert_element(&child, source, depth) {
                    out.push(HtmlNode::Element(el));
                }
            }
            "text" => out.push(HtmlNode::Text(child.text().to_string())),
            "entity" => out.push(HtmlNode::Text(decode_entities(&child.text()).into_owned())),
            // Recovered parse errors still carry usable content.
            "ERROR" if depth > MAX_DEPTH => out.push(HtmlNode::Text(flatten_text(&child))),
            "ERROR" => convert_children(&child, source, out, depth + 1),
            _ => {}
        }
    }
}

fn convert_element<D: ast_grep_core::Doc>(
    node: &Node<D>,
    source: &str,
    depth: usize,
) -> Option<Element> {
    let tag = node
        .children()
        .find(|c| matches!(c.kind().as_ref(), "start_tag" | "self_closing_tag"))?;
    let tag_name = tag
        .children()
        .find(|c| c.kind().as_ref() == "tag_name")?
        .text()
        .to_ascii_lowercase();

    let mut children = Vec::new();
    convert_children(node, source, &mut children, depth + 1);

    Some(Element {
        tag: tag_name,
        attrs: tag_attrs(&tag),
        children,
    })
}

/// All text under `node`, gathered with an explicit stack.
fn flatten_text<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    let mut raw = String::new();
    let mut stack: Vec<_> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        match current.kind().as_ref() {
            "text" => raw.push_str(&current.text()),
            "entity" => raw.push_str(&decode_entities(&current.text())),
            "element" | "ERROR" => {
                let mut children: Vec<_> = current.children().collect();
                children.reverse();
                stack.extend(children);
                continue;
            }
            _ => continue,
        }
        raw.push(' ');
    }
    collapse_whitespace(&raw)
}

fn tag_attrs<D: ast_grep_core::Doc>(tag: &Node<D>) -> Vec<(String, String)> {
    tag.children()
        .filter(|c| c.kind().as_ref() == "attribute")
        .filter_map(|attr| {
            let name = attr
                .children()
                .find(|c| c.kind().as_ref() == "attribute_name")?
                .text()
                .to_ascii_lowercase();
            let value = attr
                .children()
                .find_map(|c| match c.kind().as_ref() {
                    "attribute_value" => Some(c.text().to_string()),
                    "quoted_attribute_value" => Some(
                        c.children()
                            .find(|v| v.kind().as_ref() == "attribute_value")
                            .map(|v| v.text().to_string())
                            .unwrap_or_default(),
                    ),
                    _ => None,
                })
                .unwrap_or_default();
            Some((name, decode_entities(&value).into_owned()))
        })
        .collect()
}

/// Decode named and numeric character references.
///
/// Unknown references are kept verbatim.
#[must_use]
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let end = candidate
            .char_indices()
            .skip(1)
            .take(32)
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '#'))
            .map_or(candidate.len(), |(i, _)| i);
        let name = &candidate[1..end];
        let has_semicolon = candidate[end..].starts_with(';');

        match decode_reference(name) {
            Some(decoded) => {
                out.push(decoded);
                rest = &candidate[end + usize::from(has_semicolon)..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builds_nested_elements_with_attributes() {
        let doc = parse_document(
            r#"<html><body><div id="main" class="post"><p>Hello <a href="/x">world</a></p></div></body></html>"#,
        );
        let div = doc.find(|el| el.tag == "div").unwrap();
        assert_eq!(div.attr("id"), Some("main"));
        assert_eq!(div.attr("CLASS"), Some("post"));
        assert_eq!(div.text(), "Hello world");

        let link = div.find(|el| el.tag == "a").unwrap();
        assert_eq!(link.attr("href"), Some("/x"));
    }

    #[test]
    fn keeps_whitespace_between_text_and_entities() {
        let doc = parse_document("<p>Tom &amp; Jerry</p>");
        let p = doc.find(|el| el.tag == "p").unwrap();
        assert_eq!(p.text(), "Tom & Jerry");
    }

    #[test]
    fn script_and_style_bodies_are_dropped() {
        let doc = parse_document(
            "<body><script>var x = 1;</script><style>p { color: red }</style><p>Visible</p></body>",
        );
        assert_eq!(doc.text(), "Visible");
    }

    #[test]
    fn prune_removes_matching_subtrees() {
        let mut doc = parse_document(
            "<body><nav><a href=\"/\">Home</a></nav><p>Body text</p><footer>(c)</footer></body>",
        );
        doc.prune(&["nav", "footer"]);
        assert_eq!(doc.text(), "Body text");
    }

    fn depth(el: &Element) -> usize {
        1 + el.child_elements().map(depth).max().unwrap_or(0)
    }

    #[test]
    fn pathological_nesting_is_flattened_at_max_depth() {
        let html = format!(
            "<html><body>{}<p>hello</p>{}</body></html>",
            "<div>".repeat(10_000),
            "</div>".repeat(10_000)
        );
        let doc = parse_document(&html);

        // `#document` plus at most MAX_DEPTH element levels.
        assert!(depth(&doc) <= MAX_DEPTH + 1);
        assert!(doc.text().contains("hello"));
    }

    #[test]
    fn nesting_below_the_limit_keeps_its_elements() {
        let html = format!("{}<p>deep</p>{}", "<div>".repeat(50), "</div>".repeat(50));
        let doc = parse_document(&html);
        let p = doc.find(|el| el.tag == "p").unwrap();
        assert_eq!(p.text(), "deep");
    }

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_entities("a &lt;b&gt; &#39;c&#x27; &nbsp;d"), "a <b> 'c' \u{a0}d");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn unknown_references_are_kept() {
        assert_eq!(decode_entities("AT&T &bogus; 5 & 6"), "AT&T &bogus; 5 & 6");
    }

    #[test]
    fn attribute_values_are_decoded() {
        let doc = parse_document(r#"<a href="/search?q=a&amp;page=2">next</a>"#);
        let link = doc.find(|el| el.tag == "a").unwrap();
        assert_eq!(link.attr("href"), Some("/search?q=a&page=2"));
    }
}
