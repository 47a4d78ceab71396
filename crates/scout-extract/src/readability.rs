//! Main-content detection.
//!
//! Boilerplate elements are pruned, then the content root is chosen in order
//! of preference: the largest `<article>`, `<main>` (or `role="main"`), the
//! best-scoring `<div>`/`<section>`, and finally `<body>`.

use reqwest::Url;

use crate::dom::{Element, collapse_whitespace, parse_document};
use crate::markdown;

/// Elements that never carry article content.
pub const REMOVED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "iframe", "svg", "img", "picture", "figure",
];

/// Minimum paragraph score for a `div`/`section` to beat `<body>`.
const MIN_BLOCK_SCORE: f64 = 25.0;

/// Readable content of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readable {
    pub title: Option<String>,
    pub markdown: String,
}

/// Extract the title and main content of `html` as Markdown.
///
/// Returns `None` when the page has no readable text. `max_chars` caps the
/// Markdown length in characters; 0 means unlimited.
#[must_use]
pub fn extract_readable(html: &str, page_url: &Url, max_chars: usize) -> Option<Readable> {
    let mut doc = parse_document(html);
    let title = page_title(&doc);
    doc.prune(REMOVED_TAGS);

    let root = content_root(&doc);
    let markdown = markdown::render(root, page_url);
    let markdown = truncate_chars(markdown.trim(), max_chars);
    if markdown.is_empty() {
        return None;
    }

    Some(Readable { title, markdown })
}

/// `og:title`, then `<title>`, then the first `<h1>`.
#[must_use]
pub fn page_title(doc: &Element) -> Option<String> {
    let og_title = doc
        .find(|el| el.tag == "meta" && el.attr("property") == Some("og:title"))
        .and_then(|meta| meta.attr("content"))
        .map(collapse_whitespace);
    let title_tag = || doc.find(|el| el.tag == "title").map(Element::text);
    let first_h1 = || doc.find(|el| el.tag == "h1").map(Element::text);

    og_title
        .filter(|t| !t.is_empty())
        .or_else(|| title_tag().filter(|t| !t.is_empty()))
        .or_else(|| first_h1().filter(|t| !t.is_empty()))
}

fn content_root(doc: &Element) -> &Element {
    let descendants = doc.descendants();

    let article = descendants
        .iter()
        .filter(|el| el.tag == "article")
        .map(|el| (el.text().len(), *el))
        .filter(|(len, _)| *len > 0)
        .max_by_key(|(len, _)| *len)
        .map(|(_, el)| el);
    if let Some(article) = article {
        return article;
    }

    let main = descendants
        .iter()
        .copied()
        .find(|el| (el.tag == "main" || el.attr("role") == Some("main")) && !el.text().is_empty());
    if let Some(main) = main {
        return main;
    }

    let best_block = descendants
        .iter()
        .filter(|el| el.tag == "div" || el.tag == "section")
        .map(|el| (block_score(el), *el))
        .filter(|(score, _)| *score >= MIN_BLOCK_SCORE)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, el)| el);
    if let Some(block) = best_block {
        return block;
    }

    descendants
        .into_iter()
        .find(|el| el.tag == "body")
        .unwrap_or(doc)
}

/// Text length of direct `<p>` children, discounted by the block's link density.
#[allow(clippy::cast_precision_loss)]
fn block_score(el: &Element) -> f64 {
    let paragraph_chars: usize = el
        .child_elements()
        .filter(|child| child.tag == "p")
        .map(|p| p.text().chars().count())
        .sum();
    if paragraph_chars == 0 {
        return 0.0;
    }
    paragraph_chars as f64 * (1.0 - link_density(el))
}

#[allow(clippy::cast_precision_loss)]
fn link_density(el: &Element) -> f64 {
    let total = el.text().chars().count();
    if total == 0 {
        return 1.0;
    }
    let linked: usize = el
        .descendants()
        .into_iter()
        .filter(|d| d.tag == "a")
        .map(|a| a.text().chars().count())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return s.to_string();
    }
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => s[..cut].trim_end().to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page_url() -> Url {
        Url::parse("https://news.example/story").unwrap()
    }

    fn extract(html: &str) -> Option<Readable> {
        extract_readable(html, &page_url(), 0)
    }

    #[test]
    fn prefers_og_title() {
        let doc = parse_document(
            r#"<html><head><meta property="og:title" content="OG Title"><title>Tag Title</title></head><body><h1>Heading</h1></body></html>"#,
        );
        assert_eq!(page_title(&doc).as_deref(), Some("OG Title"));
    }

    #[test]
    fn falls_back_to_title_tag_then_h1() {
        let with_title = parse_document(
            "<html><head><title> Tag   Title </title></head><body><h1>Heading</h1></body></html>",
        );
        assert_eq!(page_title(&with_title).as_deref(), Some("Tag Title"));

        let h1_only = parse_document("<html><body><h1>Heading</h1></body></html>");
        assert_eq!(page_title(&h1_only).as_deref(), Some("Heading"));

        let none = parse_document("<html><body><p>text</p></body></html>");
        assert_eq!(page_title(&none), None);
    }

    #[test]
    fn article_element_wins_over_surrounding_chrome() {
        let html = r#"<html><head><title>Acme expands</title></head><body>
            <nav><a href="/">Home</a> <a href="/news">News</a></nav>
            <div class="sidebar"><p>Subscribe to our newsletter for more updates every week.</p></div>
            <article>
              <h2>Acme expands to Europe</h2>
              <p>Acme Corp announced a new plant in <a href="/places/lyon">Lyon</a>.</p>
              <img src="/plant.jpg" alt="The plant">
            </article>
            <footer>Copyright 2026</footer>
        </body></html>"#;

        let readable = extract(html).unwrap();
        assert_eq!(readable.title.as_deref(), Some("Acme expands"));
        assert_eq!(
            readable.markdown,
            "## Acme expands to Europe\n\nAcme Corp announced a new plant in [Lyon](https://news.example/places/lyon)."
        );
    }

    #[test]
    fn deeply_nested_page_still_renders() {
        let html = format!(
            "<html><body>{}<p>hello</p>{}</body></html>",
            "<div>".repeat(10_000),
            "</div>".repeat(10_000)
        );
        let readable = extract(&html).unwrap();
        assert!(readable.markdown.contains("hello"));
    }

    #[test]
    fn main_element_is_used_without_article() {
        let html = "<body><header>Site</header><main><p>Main body text.</p></main><aside>Ads</aside></body>";
        assert_eq!(extract(html).unwrap().markdown, "Main body text.");
    }

    #[test]
    fn role_main_counts_as_main() {
        let html = r#"<body><div role="main"><p>Role main text.</p></div><div><p>x</p></div></body>"#;
        assert_eq!(extract(html).unwrap().markdown, "Role main text.");
    }

    #[test]
    fn paragraph_rich_block_beats_link_lists() {
        let html = r#"<body>
            <div id="links">
              <p><a href="/a">A very long link title that goes on and on for a while</a></p>
              <p><a href="/b">Another very long link title that goes on and on</a></p>
            </div>
            <div id="story">
              <p>The company reported strong quarterly growth across all regions.</p>
              <p>Analysts expect the trend to continue into next year.</p>
            </div>
            <p>Stray footer text outside any block.</p>
        </body>"#;

        assert_eq!(
            extract(html).unwrap().markdown,
            "The company reported strong quarterly growth across all regions.\n\n\
             Analysts expect the trend to continue into next year."
        );
    }

    #[test]
    fn body_is_the_last_resort() {
        let html = "<body><span>Short</span> <b>note</b></body>";
        assert_eq!(extract(html).unwrap().markdown, "Short **note**");
    }

    #[test]
    fn boilerplate_only_page_has_no_content() {
        let html = "<html><head><title>Empty</title></head><body><nav>Menu</nav><script>track()</script></body></html>";
        assert_eq!(extract(html), None);
    }

    #[test]
    fn content_is_truncated_to_max_chars() {
        let html = "<article><p>abcdefghij klmnopqrst</p></article>";
        let readable = extract_readable(html, &page_url(), 11).unwrap();
        assert_eq!(readable.markdown, "abcdefghij");
    }
}
