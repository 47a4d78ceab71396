//! Company research: three model queries folded into one [`CompanyProfile`].

use scout_core::{CompanyProfile, Diagnostic, ProgressSink, Stage};

use crate::error::{ModelError, ResearchError};
use crate::model::LanguageModel;
use crate::parse::{parse_articles, parse_competitors};
use crate::prompts;

/// A profile plus the reason it is degraded, if it is.
///
/// The profile is always present; when `error` is
/// [`ResearchError::ModelUnavailable`] it is [`CompanyProfile::unavailable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchOutcome {
    pub profile: CompanyProfile,
    pub error: Option<ResearchError>,
}

impl ResearchOutcome {
    /// Whether the profile may be used downstream.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.error.as_ref().is_some_and(ResearchError::is_fatal)
    }
}

/// Asks a language model about a company and parses the answers.
pub struct ResearchPipeline<M> {
    model: M,
}

impl<M: LanguageModel> ResearchPipeline<M> {
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self { model }
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Query overview, competitors and articles for `company`.
    ///
    /// Never fails: a model failure yields the unavailable profile with
    /// [`ResearchError::ModelUnavailable`], and unusable parts of an answer
    /// yield the partial profile with [`ResearchError::ParseDegraded`].
    pub async fn research(&self, company: &str, sink: &dyn ProgressSink) -> ResearchOutcome {
        sink.started(Stage::Research, &format!("researching {company}"));

        match self.query_all(company, sink).await {
            Ok(answers) => {
                let (profile, problems) = answers.into_profile();
                for problem in &problems {
                    tracing::warn!(company, problem = %problem, "research answer degraded");
                    sink.warn(Diagnostic::new(Stage::Research, company, problem.clone()));
                }
                sink.finished(
                    Stage::Research,
                    &format!(
                        "{} competitors, {} articles",
                        profile.competitors.len(),
                        profile.articles.len()
                    ),
                );
                ResearchOutcome {
                    profile,
                    error: (!problems.is_empty())
                        .then(|| ResearchError::ParseDegraded(problems.join("; "))),
                }
            }
            Err((query, error)) => {
                tracing::warn!(company, query, %error, "language model call failed");
                let reason = format!("{query} query failed: {error}");
                sink.warn(Diagnostic::new(Stage::Research, company, reason.clone()));
                ResearchOutcome {
                    profile: CompanyProfile::unavailable(),
                    error: Some(ResearchError::ModelUnavailable(reason)),
                }
            }
        }
    }

    async fn query_all(
        &self,
        company: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Answers, (&'static str, ModelError)> {
        sink.info(Stage::Research, &format!("asking about {company} overview"));
        let overview = self.ask("overview", &prompts::overview(company)).await?;

        sink.info(Stage::Research, &format!("asking about {company} competitors"));
        let competitors = self.ask("competitors", &prompts::competitors(company)).await?;

        sink.info(Stage::Research, &format!("asking for articles about {company}"));
        let articles = self.ask("articles", &prompts::articles(company)).await?;

        Ok(Answers {
            overview,
            competitors,
            articles,
        })
    }

    async fn ask(
        &self,
        query: &'static str,
        prompt: &str,
    ) -> Result<String, (&'static str, ModelError)> {
        self.model.generate(prompt).await.map_err(|e| (query, e))
    }
}

/// Raw answers to the three queries.
struct Answers {
    overview: String,
    competitors: String,
    articles: String,
}

impl Answers {
    /// Parse into a profile, listing every part that could not be used.
    fn into_profile(self) -> (CompanyProfile, Vec<String>) {
        let mut problems = Vec::new();

        let overview = self.overview.trim().to_string();
        if overview.is_empty() {
            problems.push("overview answer was empty".to_string());
        }

        let competitors = parse_competitors(&self.competitors);
        if competitors.is_empty() {
            problems.push("no competitor names in answer".to_string());
        }

        let articles = parse_articles(&self.articles);
        if articles.is_empty() && !self.articles.trim().is_empty() {
            problems.push("no Title:/URL: records in article answer".to_string());
        }
        let missing_urls = articles.iter().filter(|a| !a.has_url()).count();
        if missing_urls > 0 {
            problems.push(format!("{missing_urls} article(s) without a URL"));
        }

        (
            CompanyProfile {
                overview,
                competitors,
                articles,
            },
            problems,
        )
    }
}
