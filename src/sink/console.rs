// file: src/sink/console.rs
// description: human readable terminal notification of a search result

use crate::error::Result;
use crate::models::ResolvedResult;
use crate::pipeline::Resolution;
use crate::sink::ResultSink;
use crate::utils::logging::{format_success, format_warning};
use async_trait::async_trait;

pub const NOT_FOUND_TITLE: &str = "No video found";
pub const NOT_FOUND_MESSAGE: &str = "No related explanation video was found.";

#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn render(&self, resolution: &Resolution) -> String {
        let mut output = match &resolution.result {
            ResolvedResult::Found(url) => {
                let keyword = resolution
                    .winner
                    .as_ref()
                    .map(|k| format!(" (matched '{}')", k))
                    .unwrap_or_default();
                format_success(&format!("Playing {}{}", url, keyword))
            }
            ResolvedResult::NotFound => format!(
                "{}\n  {}",
                format_warning(NOT_FOUND_TITLE),
                NOT_FOUND_MESSAGE
            ),
        };

        if self.verbose {
            for report in &resolution.keywords {
                output.push_str(&format!(
                    "\n  [{}] {} -> {} ({} record(s))",
                    report.index, report.keyword, report.outcome, report.records
                ));
            }
            let stats = &resolution.stats;
            output.push_str(&format!(
                "\n  {}/{} keyword(s) matched ({:.0}%)",
                stats.matched,
                stats.keywords_dispatched,
                stats.match_rate()
            ));
        }

        output
    }
}

#[async_trait]
impl ResultSink for ConsoleSink {
    async fn deliver(&self, resolution: &Resolution) -> Result<()> {
        println!("{}", self.render(resolution));
        Ok(())
    }
}
