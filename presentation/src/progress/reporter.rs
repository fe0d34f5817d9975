//! Progress reporting for multi-source searches

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use snaxel_application::ProgressNotifier;
use snaxel_domain::{Envelope, Source, SourceSet};
use std::sync::Mutex;

/// Reports progress with a single bar that ticks once per settled source
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_search_start(&self, query: &str, sources: &SourceSet) {
        let pb = ProgressBar::new(sources.len() as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix(format!("Searching '{}'", query));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_source_complete(&self, source: Source, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), source)
            } else {
                format!("{} {}", "x".red(), source)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_search_complete(&self, envelope: &Envelope) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
            if envelope.has_failures() {
                let failed: Vec<&str> = envelope.failed_sources().map(|(s, _)| s.as_str()).collect();
                eprintln!(
                    "{} {} results, failed: {}",
                    "!".yellow(),
                    envelope.total_results,
                    failed.join(", ")
                );
            }
        }
    }

    fn on_cache_hit(&self, query: &str) {
        eprintln!("{} '{}' served from cache", "*".cyan(), query);
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_search_start(&self, query: &str, sources: &SourceSet) {
        eprintln!(
            "{} {} ({})",
            "->".cyan(),
            format!("Searching '{}'", query).bold(),
            sources
        );
    }

    fn on_source_complete(&self, source: Source, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), source);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), source);
        }
    }

    fn on_search_complete(&self, envelope: &Envelope) {
        eprintln!("  {} results\n", envelope.total_results);
    }

    fn on_cache_hit(&self, query: &str) {
        eprintln!("{} '{}' served from cache", "*".cyan(), query);
    }
}
