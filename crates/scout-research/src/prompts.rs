//! Prompt templates for the three research queries.

#[must_use]
pub fn overview(company: &str) -> String {
    format!(
        "Provide a concise overview of {company}, including its primary business, industry, \
         and key products/services. Keep it to 3-4 sentences."
    )
}

#[must_use]
pub fn competitors(company: &str) -> String {
    format!(
        "List the top 3-5 direct competitors of {company}. Provide only their names, \
         separated by commas."
    )
}

/// Asks for the `Title:` / `URL:` line format that [`crate::parse::parse_articles`] reads.
#[must_use]
pub fn articles(company: &str) -> String {
    format!(
        "Find 3-5 recent and relevant news articles or reports about {company} or its industry. \
         For each, provide the title and the full URL. Format as:\n\
         Title: [Title]\nURL: [URL]\n\
         Ensure URLs are complete and functional."
    )
}
