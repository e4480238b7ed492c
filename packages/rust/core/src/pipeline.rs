//! End-to-end founder run: companies → scrape → prompt → normalize → results.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use founderlens_crawler::ContextFetcher;
use founderlens_shared::{CompanyList, CompanyRecord, FounderList, ResultMapping, RunSummary};

use crate::extraction::{FounderModel, ModelReply, ask_founders};
use crate::normalize::{ReplyKind, classify};

/// Options for a founder run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Companies processed at once. 1 keeps the run strictly sequential.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Result of a founder run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Company → founders, in input order. Every input company has a key.
    pub results: ResultMapping,
    /// Counters for the run.
    pub summary: RunSummary,
    /// `(company, "Error: <detail>")` for every failed model call, in input order.
    pub model_errors: Vec<(String, String)>,
}

/// Progress callback for reporting run status.
pub trait RunProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called as each company's result is collected.
    fn company_done(&self, name: &str, founders: usize, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl RunProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn company_done(&self, _name: &str, _founders: usize, _current: usize, _total: usize) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// What happened for one company.
#[derive(Debug, Clone, Default)]
struct CompanyOutcome {
    founders: FounderList,
    had_context: bool,
    scrape_failed: bool,
    model_error: Option<String>,
    reply_kind: Option<ReplyKind>,
}

/// Run the founder pipeline over `companies`.
///
/// `fetcher = None` skips scraping; every company then gets the name-only
/// prompt. Per-company failures never abort the run.
#[instrument(skip_all, fields(run_id = %Uuid::now_v7(), companies = companies.len()))]
pub async fn run(
    companies: &CompanyList,
    fetcher: Option<&ContextFetcher>,
    model: Arc<dyn FounderModel>,
    options: &RunOptions,
    progress: &dyn RunProgress,
) -> RunOutcome {
    let total = companies.len();
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));

    info!(
        concurrency = options.concurrency,
        scrape = fetcher.is_some(),
        model = model.name(),
        "starting founder run"
    );
    progress.phase("Extracting founders");

    let mut handles = Vec::with_capacity(total);
    for (name, url) in companies {
        let record = CompanyRecord::new(name.clone(), url.clone());
        let fetcher = fetcher.cloned();
        let model = Arc::clone(&model);
        let sem = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");
            process_company(fetcher.as_ref(), model.as_ref(), &record).await
        }));
    }

    let mut results = ResultMapping::with_capacity(total);
    let mut summary = RunSummary::default();
    let mut model_errors = Vec::new();

    for (i, (name, handle)) in companies.keys().zip(handles).enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(company = %name, error = %e, "company task failed");
                CompanyOutcome::default()
            }
        };

        summary.companies += 1;
        summary.with_context += usize::from(outcome.had_context);
        summary.scrape_failures += usize::from(outcome.scrape_failed);
        if let Some(error) = outcome.model_error {
            summary.model_failures += 1;
            model_errors.push((name.clone(), error));
        }
        match outcome.reply_kind {
            Some(ReplyKind::Structured) => summary.structured += 1,
            Some(ReplyKind::Malformed) => summary.malformed += 1,
            Some(ReplyKind::Unparseable) => summary.unparseable += 1,
            None => {}
        }

        progress.company_done(name, outcome.founders.len(), i + 1, total);
        results.insert(name.clone(), outcome.founders);
    }

    info!(
        companies = summary.companies,
        with_context = summary.with_context,
        scrape_failures = summary.scrape_failures,
        model_failures = summary.model_failures,
        "founder run complete"
    );
    progress.done(&summary);

    RunOutcome {
        results,
        summary,
        model_errors,
    }
}

/// Scrape, ask, and normalize for a single company.
#[instrument(skip_all, fields(company = %record.name))]
async fn process_company(
    fetcher: Option<&ContextFetcher>,
    model: &dyn FounderModel,
    record: &CompanyRecord,
) -> CompanyOutcome {
    let mut outcome = CompanyOutcome::default();

    let context = match fetcher {
        Some(fetcher) => {
            let scraped = fetcher.fetch(&record.url).await;
            outcome.scrape_failed = scraped.is_failure();
            scraped.into_context()
        }
        None => None,
    };
    outcome.had_context = context.is_some();

    let reply = ask_founders(model, &record.name, &record.url, context.as_deref()).await;
    match &reply {
        ModelReply::Text(text) => {
            let parsed = classify(text);
            let kind = parsed.kind();
            outcome.reply_kind = Some(kind);
            outcome.founders = parsed.into_founders();
            debug!(
                kind = kind.as_str(),
                founders = outcome.founders.len(),
                "normalized reply"
            );
        }
        ModelReply::Failed(_) => {
            outcome.model_error = Some(reply.as_text());
        }
    }

    outcome
}
