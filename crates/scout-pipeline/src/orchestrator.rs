//! One research request end to end.

use chrono::Utc;
use scout_auth::{AuthSession, TokenEndpoint};
use scout_core::{DiagnosticRecorder, ExtractedArticle, PipelineReport, ProgressSink};
use scout_drive::{PersistenceLayer, StorageApi};
use scout_extract::{ContentExtractor, PageFetcher};
use scout_research::{LanguageModel, ResearchError, ResearchPipeline};

use crate::error::PipelineError;

/// Runs research, extraction and persistence in sequence.
pub struct Orchestrator<M, F, S> {
    research: ResearchPipeline<M>,
    extractor: ContentExtractor<F>,
    persistence: PersistenceLayer<S>,
}

impl<M, F, S> Orchestrator<M, F, S>
where
    M: LanguageModel,
    F: PageFetcher,
    S: StorageApi,
{
    #[must_use]
    pub const fn new(
        research: ResearchPipeline<M>,
        extractor: ContentExtractor<F>,
        persistence: PersistenceLayer<S>,
    ) -> Self {
        Self {
            research,
            extractor,
            persistence,
        }
    }

    #[must_use]
    pub const fn research(&self) -> &ResearchPipeline<M> {
        &self.research
    }

    #[must_use]
    pub const fn extractor(&self) -> &ContentExtractor<F> {
        &self.extractor
    }

    #[must_use]
    pub const fn persistence(&self) -> &PersistenceLayer<S> {
        &self.persistence
    }

    /// Research `company`, extract its articles and save everything.
    ///
    /// The session is checked before any work starts and again before saving,
    /// so a token that lapsed during research is refreshed (once) in between.
    ///
    /// # Errors
    ///
    /// - `PipelineError::EmptyCompanyName` for a blank name.
    /// - `PipelineError::Auth` if no valid token can be obtained.
    /// - `PipelineError::Research` if the language model was unavailable;
    ///   nothing is saved in that case.
    /// - `PipelineError::Persist` if the Drive folders cannot be resolved.
    pub async fn run<P: TokenEndpoint>(
        &self,
        session: &mut AuthSession<P>,
        company: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineReport, PipelineError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(PipelineError::EmptyCompanyName);
        }
        session.get_valid_token().await?;

        let recorder = DiagnosticRecorder::new(sink);
        tracing::info!(company, "research run started");

        let outcome = self.research.research(company, &recorder).await;
        if let Some(error @ ResearchError::ModelUnavailable(_)) = outcome.error {
            tracing::warn!(company, %error, "research failed, nothing will be saved");
            return Err(PipelineError::Research(error));
        }
        let profile = outcome.profile;

        let urls = profile.article_urls();
        let mut articles = self.extractor.extract(&urls, &recorder).await;
        fill_missing_titles(&mut articles, &profile);
        let extracted_count = articles.len();

        let token = session.get_valid_token().await?;
        let record = self
            .persistence
            .persist(&token, company, &profile, &articles, &recorder)
            .await?;

        tracing::info!(
            company,
            folder = %record.company_folder_name,
            files = record.file_links.len(),
            "research run complete"
        );
        Ok(PipelineReport {
            company_name: company.to_string(),
            profile,
            extracted_count,
            record,
            diagnostics: recorder.into_diagnostics(),
            completed_at: Utc::now(),
        })
    }
}

/// Use the model's title for pages that had none of their own.
fn fill_missing_titles(articles: &mut [ExtractedArticle], profile: &scout_core::CompanyProfile) {
    for article in articles {
        let missing = article.title.as_deref().is_none_or(|t| t.trim().is_empty());
        if missing && let Some(title) = profile.title_for(&article.url) {
            article.title = Some(title.to_string());
        }
    }
}
