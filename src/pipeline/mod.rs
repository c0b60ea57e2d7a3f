//! Extraction pipeline
//!
//! Sequences the stages of a run: crawl → parse → infer → summarize → filter.
//! Nothing in here fails the caller: problems end up in the [`RunLog`] and,
//! at worst, the module list is empty.

mod log;

pub use log::{LogEntry, LogLevel, RunLog};

use crate::config::Config;
use crate::content::{parse, ParsedPage};
use crate::crawler::Crawler;
use crate::inference::{infer_modules, ModuleMap};
use crate::output::{build_records, ModuleRecord, RunStats};
use crate::summarizer::Summarizer;
use crate::DocmapError;

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Modules that passed the description filter, in discovery order
    pub modules: Vec<ModuleRecord>,

    pub logs: RunLog,

    pub stats: RunStats,
}

/// Runs complete extractions with one configuration
pub struct Pipeline {
    config: Config,
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let summarizer = Summarizer::from_config(&config.summarizer);
        Self { config, summarizer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extracts the module hierarchy of the site behind `urls`
    ///
    /// An empty module list is a valid result; the log explains why.
    pub async fn extract(&self, urls: &[String]) -> ExtractionResult {
        let mut logs = RunLog::new();
        let mut stats = RunStats::default();

        logs.info(format!("Starting extraction for {} URL(s)", urls.len()));

        let modules = match self.run(urls, &mut logs, &mut stats).await {
            Ok(modules) => modules,
            Err(e) => {
                logs.error(DocmapError::Pipeline(e.to_string()).to_string());
                Vec::new()
            }
        };

        ExtractionResult {
            modules,
            logs,
            stats,
        }
    }

    async fn run(
        &self,
        urls: &[String],
        logs: &mut RunLog,
        stats: &mut RunStats,
    ) -> crate::Result<Vec<ModuleRecord>> {
        logs.info("Step 1: Crawling URLs...");
        let crawler = Crawler::new(&self.config)?;
        let report = crawler.crawl(urls).await;

        stats.pages_crawled = report.pages.len();
        stats.links_discovered = report.links_discovered;
        stats.outcomes = report.outcomes.clone();
        stats.crawl_time = report.elapsed;
        stats.timed_out = report.timed_out;

        logs.info(format!("Crawled {} pages", report.pages.len()));
        if report.timed_out {
            logs.warning("Crawl deadline reached; continuing with the pages fetched so far");
        }
        if report.pages.is_empty() {
            logs.warning("No pages were crawled. Check URLs and network connectivity.");
            return Ok(Vec::new());
        }

        logs.info("Step 2: Parsing HTML content...");
        let mut parsed: Vec<ParsedPage> = Vec::with_capacity(report.pages.len());
        for page in &report.pages {
            match parse(&page.html, &page.url) {
                Ok(page) => parsed.push(page),
                Err(e) => logs.warning(format!("Error parsing {}: {}", page.url, e)),
            }
        }
        stats.pages_parsed = parsed.len();
        logs.info(format!("Parsed {} pages", parsed.len()));

        if parsed.is_empty() {
            logs.warning("No pages were successfully parsed.");
            return Ok(Vec::new());
        }

        logs.info("Step 3: Inferring modules and submodules...");
        let mut modules = infer_modules(&parsed);
        logs.info(format!("Inferred {} modules", modules.len()));

        logs.info("Step 4: Generating descriptions...");
        self.summarize(&mut modules);

        logs.info("Step 5: Formatting output...");
        let records = build_records(&modules);
        stats.modules_found = records.len();
        stats.submodules_found = records.iter().map(|r| r.submodules.len()).sum();

        let dropped = modules.len() - records.len();
        if dropped > 0 {
            tracing::debug!("{} modules had no usable description", dropped);
        }

        logs.info(format!(
            "Extraction complete. Generated {} modules",
            records.len()
        ));
        Ok(records)
    }

    /// Fills in module and submodule descriptions
    fn summarize(&self, modules: &mut ModuleMap) {
        for module in modules.iter_mut() {
            module.description = self.summarizer.describe(&module.raw_content);
            for submodule in &mut module.submodules {
                submodule.description = self.summarizer.describe(&submodule.raw_content);
            }
        }
    }
}
