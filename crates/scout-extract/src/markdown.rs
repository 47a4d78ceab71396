//! Render an element subtree as Markdown.
//!
//! Links are kept and resolved against the page URL; images never reach this
//! point (they are pruned beforehand) and are ignored if they do.

use reqwest::Url;

use crate::dom::{Element, HtmlNode, collapse_whitespace};

/// Line-break marker inside inline buffers (source text never contains it).
const BREAK: char = '\u{1}';

/// Render `root` as Markdown blocks separated by blank lines.
#[must_use]
pub fn render(root: &Element, base: &Url) -> String {
    let renderer = Renderer { base };
    let mut blocks = Vec::new();
    renderer.block(root, &mut blocks);
    blocks.join("\n\n")
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "#document"
            | "html"
            | "body"
            | "main"
            | "article"
            | "section"
            | "div"
            | "p"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "dl"
            | "dt"
            | "dd"
            | "blockquote"
            | "pre"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "hr"
            | "figcaption"
            | "address"
            | "details"
            | "summary"
    )
}

struct Renderer<'a> {
    base: &'a Url,
}

impl Renderer<'_> {
    fn block(&self, el: &Element, out: &mut Vec<String>) {
        match el.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = el.tag[1..].parse::<usize>().unwrap_or(1);
                let text = self.inline_text(el).replace('\n', " ");
                if !text.is_empty() {
                    out.push(format!("{} {text}", "#".repeat(level)));
                }
            }
            "p" | "dt" | "dd" | "figcaption" | "summary" | "address" => {
                push_nonempty(out, self.inline_text(el));
            }
            "ul" | "ol" => {
                let mut lines = Vec::new();
                self.list(el, el.tag == "ol", 0, &mut lines);
                push_nonempty(out, lines.join("\n"));
            }
            "li" => {
                let text = self.inline_text(el);
                if !text.is_empty() {
                    out.push(format!("- {text}"));
                }
            }
            "blockquote" => {
                let mut inner = Vec::new();
                self.children(el, &mut inner);
                let quoted = inner
                    .join("\n\n")
                    .lines()
                    .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
                    .collect::<Vec<_>>()
                    .join("\n");
                push_nonempty(out, quoted);
            }
            "pre" => {
                let mut raw = String::new();
                raw_text(el, &mut raw);
                let code = raw.trim_matches('\n').trim_end();
                if !code.trim().is_empty() {
                    out.push(format!("```\n{code}\n```"));
                }
            }
            "table" => push_nonempty(out, self.table(el)),
            "hr" => out.push("---".to_string()),
            _ => self.children(el, out),
        }
    }

    /// Render children, grouping consecutive inline content into paragraphs.
    fn children(&self, el: &Element, out: &mut Vec<String>) {
        let mut inline = String::new();
        for child in &el.children {
            match child {
                HtmlNode::Text(text) => inline.push_str(text),
                HtmlNode::Element(child) if is_block(&child.tag) => {
                    push_nonempty(out, tidy_inline(&inline));
                    inline.clear();
                    self.block(child, out);
                }
                HtmlNode::Element(child) => self.inline(child, &mut inline),
            }
        }
        push_nonempty(out, tidy_inline(&inline));
    }

    fn inline(&self, el: &Element, buf: &mut String) {
        match el.tag.as_str() {
            "a" => {
                let text = self.inline_text(el);
                if text.is_empty() {
                    return;
                }
                match el.attr("href").and_then(|href| self.resolve(href)) {
                    Some(url) => buf.push_str(&format!("[{text}]({url})")),
                    None => buf.push_str(&text),
                }
            }
            "strong" | "b" => wrap(buf, "**", &self.inline_text(el)),
            "em" | "i" => wrap(buf, "*", &self.inline_text(el)),
            "code" | "kbd" => wrap(buf, "`", &self.inline_text(el)),
            "br" => buf.push(BREAK),
            "img" | "picture" | "video" | "audio" | "canvas" => {}
            tag if is_block(tag) => {
                buf.push(' ');
                self.inline_children(el, buf);
                buf.push(' ');
            }
            _ => self.inline_children(el, buf),
        }
    }

    fn inline_children(&self, el: &Element, buf: &mut String) {
        for child in &el.children {
            match child {
                HtmlNode::Text(text) => buf.push_str(text),
                HtmlNode::Element(child) => self.inline(child, buf),
            }
        }
    }

    fn inline_text(&self, el: &Element) -> String {
        let mut buf = String::new();
        self.inline_children(el, &mut buf);
        tidy_inline(&buf)
    }

    fn list(&self, el: &Element, ordered: bool, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let items = el.child_elements().filter(|child| child.tag == "li");
        for (index, item) in items.enumerate() {
            let mut buf = String::new();
            let mut nested = Vec::new();
            for child in &item.children {
                match child {
                    HtmlNode::Text(text) => buf.push_str(text),
                    HtmlNode::Element(list) if list.tag == "ul" || list.tag == "ol" => {
                        nested.push(list);
                    }
                    HtmlNode::Element(child) => self.inline(child, &mut buf),
                }
            }

            let text = tidy_inline(&buf).replace('\n', " ");
            if !text.is_empty() {
                let marker = if ordered {
                    format!("{}.", index + 1)
                } else {
                    "-".to_string()
                };
                lines.push(format!("{indent}{marker} {text}"));
            }
            for list in nested {
                self.list(list, list.tag == "ol", depth + 1, lines);
            }
        }
    }

    fn table(&self, el: &Element) -> String {
        let rows: Vec<Vec<String>> = el
            .descendants()
            .into_iter()
            .filter(|row| row.tag == "tr")
            .map(|row| {
                row.child_elements()
                    .filter(|cell| cell.tag == "td" || cell.tag == "th")
                    .map(|cell| self.inline_text(cell).replace('\n', " ").replace('|', "\\|"))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .collect();

        let Some(width) = rows.first().map(Vec::len) else {
            return String::new();
        };
        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (index, cells) in rows.iter().enumerate() {
            lines.push(format!("| {} |", cells.join(" | ")));
            if index == 0 {
                lines.push(format!("|{}", " --- |".repeat(width)));
            }
        }
        lines.join("\n")
    }

    /// Absolute URL for `href`, or `None` for fragments and script links.
    fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.to_ascii_lowercase().starts_with("javascript:")
        {
            return None;
        }
        self.base.join(href).ok().map(|url| url.to_string())
    }
}

fn push_nonempty(out: &mut Vec<String>, text: String) {
    if !text.trim().is_empty() {
        out.push(text);
    }
}

fn wrap(buf: &mut String, marker: &str, text: &str) {
    if !text.is_empty() {
        buf.push_str(marker);
        buf.push_str(text);
        buf.push_str(marker);
    }
}

/// Collapse whitespace inside each hard-broken line and drop empty lines.
fn tidy_inline(raw: &str) -> String {
    raw.split(BREAK)
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text with source whitespace intact, for preformatted blocks.
fn raw_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(inner) if inner.tag == "br" => out.push('\n'),
            HtmlNode::Element(inner) => raw_text(inner, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::parse_document;

    fn md(html: &str) -> String {
        let base = Url::parse("https://news.example/2026/story.html").unwrap();
        render(&parse_document(html), &base)
    }

    #[test]
    fn headings_and_paragraphs() {
        assert_eq!(
            md("<h1>Big  news</h1><p>First   paragraph.</p><h3>Details</h3><p>Second.</p>"),
            "# Big news\n\nFirst paragraph.\n\n### Details\n\nSecond."
        );
    }

    #[test]
    fn links_are_resolved_against_the_page() {
        assert_eq!(
            md(r#"<p>See <a href="../about">our team</a> and <a href="https://other.example/x">this</a>.</p>"#),
            "See [our team](https://news.example/about) and [this](https://other.example/x)."
        );
    }

    #[test]
    fn fragment_and_script_links_keep_only_text() {
        assert_eq!(
            md(r##"<p><a href="#top">Top</a> <a href="javascript:void(0)">Share</a></p>"##),
            "Top Share"
        );
    }

    #[test]
    fn emphasis_and_code() {
        assert_eq!(
            md("<p><strong>Bold</strong>, <em>soft</em> and <code>cargo</code></p>"),
            "**Bold**, *soft* and `cargo`"
        );
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            md("<ul><li>One</li><li>Two<ol><li>Alpha</li><li>Beta</li></ol></li></ul>"),
            "- One\n- Two\n  1. Alpha\n  2. Beta"
        );
    }

    #[test]
    fn blockquote_lines_are_prefixed() {
        assert_eq!(
            md("<blockquote><p>Quoted one.</p><p>Quoted two.</p></blockquote>"),
            "> Quoted one.\n>\n> Quoted two."
        );
    }

    #[test]
    fn preformatted_text_keeps_line_breaks() {
        assert_eq!(
            md("<pre>fn main() {\n    run();\n}</pre>"),
            "```\nfn main() {\n    run();\n}\n```"
        );
    }

    #[test]
    fn tables_get_a_header_separator() {
        assert_eq!(
            md("<table><tr><th>Year</th><th>Revenue</th></tr><tr><td>2025</td><td>$1M</td></tr></table>"),
            "| Year | Revenue |\n| --- | --- |\n| 2025 | $1M |"
        );
    }

    #[test]
    fn line_breaks_split_paragraph_lines() {
        assert_eq!(md("<p>Line one<br>Line two</p>"), "Line one\nLine two");
    }

    #[test]
    fn loose_text_between_blocks_becomes_paragraphs() {
        assert_eq!(
            md("<div>Intro text<p>Body.</p>Outro</div>"),
            "Intro text\n\nBody.\n\nOutro"
        );
    }
}
