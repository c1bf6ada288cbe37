//! Fetch-then-write pipeline
//!
//! Runs the page fetcher to completion, then the sheet writer. A failure in
//! either stage ends the run; the writer never runs after a failed fetch.

use tracing::info;

use crate::core::{Result, RunSummary, Stage, Target};
use crate::fetch::{PageFetcher, PageRenderer};
use crate::sheets::{SheetWriter, SpreadsheetService};

pub struct Pipeline<R, S> {
    fetcher: PageFetcher<R>,
    writer: SheetWriter<S>,
}

impl<R: PageRenderer, S: SpreadsheetService> Pipeline<R, S> {
    pub fn new(fetcher: PageFetcher<R>, writer: SheetWriter<S>) -> Self {
        Self { fetcher, writer }
    }

    pub fn fetcher(&self) -> &PageFetcher<R> {
        &self.fetcher
    }

    pub fn writer(&self) -> &SheetWriter<S> {
        &self.writer
    }

    /// Scrape `target` and overwrite the writer's tab with the results
    pub async fn run(&self, target: &Target) -> Result<RunSummary> {
        enter(Stage::Fetching);
        let snippets = self.fetcher.fetch(target).await?;

        enter(Stage::Writing);
        let write = self.writer.write(&snippets).await?;

        enter(Stage::Done);
        Ok(RunSummary {
            snippets: snippets.len(),
            write,
        })
    }
}

fn enter(stage: Stage) {
    info!(?stage, "Stage");
}
