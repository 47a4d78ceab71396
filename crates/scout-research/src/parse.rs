//! Heuristic parsers for free-text model answers.
//!
//! The article answer is expected as repeated
//!
//! ```text
//! Title: <title>
//! URL: <url>
//! ```
//!
//! blocks. Models decorate this freely (bullets, bold markers, numbering
//! blank lines, prose before and after), so parsing is line-based and
//! degrades to partial records rather than failing.

use scout_core::ArticleRef;

const TITLE_MARKER: &str = "Title";
const URL_MARKER: &str = "URL";

/// Parse `Title:` / `URL:` records in answer order.
///
/// A title line starts a new record, flushing the one in progress even if it
/// never got a URL. A URL line sets the URL of the current record; URL lines
/// before the first title are ignored, as are all other lines.
#[must_use]
pub fn parse_articles(answer: &str) -> Vec<ArticleRef> {
    let mut articles = Vec::new();
    let mut current: Option<ArticleRef> = None;

    for line in answer.lines() {
        if let Some(title) = marker_value(line, TITLE_MARKER) {
            if let Some(done) = current.take() {
                articles.push(done);
            }
            current = Some(ArticleRef::new(title, ""));
        } else if let Some(url) = marker_value(line, URL_MARKER)
            && let Some(article) = current.as_mut()
        {
            article.url = strip_angle_brackets(url).to_string();
        }
    }

    articles.extend(current);
    articles
}

/// Split a comma-separated list of names, dropping blank entries.
#[must_use]
pub fn parse_competitors(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// If `line` is `<marker>: value` (ignoring case, bullets and bold markers),
/// return the trimmed value.
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace());
    let head = rest.get(..marker.len())?;
    if !head.eq_ignore_ascii_case(marker) {
        return None;
    }
    let rest = rest[marker.len()..].trim_start_matches('*');
    let value = rest.strip_prefix(':')?;
    Some(value.trim_matches(|c: char| c == '*' || c.is_whitespace()))
}

fn strip_angle_brackets(url: &str) -> &str {
    url.strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url)
}
