//! REPL (Read-Eval-Print Loop) for interactive searching

use super::command::ReplCommand;
use crate::{ConsoleFormatter, ProgressReporter};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use snaxel_application::{
    NoProgress, ProgressNotifier, RunSearchError, RunSearchUseCase, SearchInput, SourceProvider,
};
use snaxel_domain::{OutputFormat, Source, SourceSet};

const HISTORY_CAPACITY: usize = 1000;

/// Interactive search REPL
pub struct SearchRepl<P: SourceProvider + 'static> {
    use_case: RunSearchUseCase<P>,
    sources: Vec<String>,
    limit: Option<usize>,
    format: OutputFormat,
    show_progress: bool,
}

impl<P: SourceProvider + 'static> SearchRepl<P> {
    pub fn new(use_case: RunSearchUseCase<P>, sources: Vec<String>) -> Self {
        Self {
            use_case,
            sources,
            limit: None,
            format: OutputFormat::Full,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("snaxel").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                line_editor = line_editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("snaxel".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }

                    self.process_query(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Snaxel - Interactive Search        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Sources: {}", self.sources.join(", "));
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?            - Show this help");
        println!("  /sources [ids...]        - Show or set the sources to search");
        println!("  /limit [n]               - Show or set results per source");
        println!("  /format full|summary|json");
        println!("  /all <query>             - Search every source");
        println!("  /single <source> <query> - Query one source, bypassing the cache");
        println!("  /cache                   - Show cache statistics");
        println!("  /clear                   - Clear the cache");
        println!("  /cleanup                 - Drop expired cache entries");
        println!("  /quit, /exit, /q         - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::ShowSources => {
                println!("Current sources: {}", self.sources.join(", "));
                println!("Available: {}", SourceSet::all());
            }
            ReplCommand::SetSources(ids) => {
                let (set, ignored) = SourceSet::from_identifiers(&ids);
                if !ignored.is_empty() {
                    println!("Ignoring unknown sources: {}", ignored.join(", "));
                }
                if set.is_empty() {
                    println!("No valid sources given; keeping {}", self.sources.join(", "));
                } else {
                    self.sources = set.iter().map(|s| s.as_str().to_string()).collect();
                    println!("Sources: {}", set);
                }
            }
            ReplCommand::ShowLimit => println!(
                "Limit: {}",
                self.limit.unwrap_or(self.use_case.config().default_limit)
            ),
            ReplCommand::SetLimit(limit) => {
                self.limit = Some(limit);
                println!("Limit: {}", limit);
            }
            ReplCommand::SetFormat(format) => {
                self.format = format;
                println!("Format: {:?}", format);
            }
            ReplCommand::All(query) => self.process_all(&query).await,
            ReplCommand::Single(source, query) => self.process_single(source, &query).await,
            ReplCommand::CacheInfo => {
                let cache = self.use_case.cache();
                println!(
                    "Cache: {} entries, TTL {}s",
                    cache.size(),
                    cache.ttl().as_secs()
                );
            }
            ReplCommand::ClearCache => match self.use_case.cache().clear() {
                Ok(()) => println!("Cache cleared"),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Cleanup => match self.use_case.cache().cleanup() {
                Ok(removed) => println!("Removed {} expired entries", removed),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn progress(&self) -> Box<dyn ProgressNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(NoProgress)
        }
    }

    /// Search the current sources and render the envelope
    async fn search(&self, query: &str) -> Result<String, RunSearchError> {
        let mut input = SearchInput::new(query).with_sources(self.sources.iter().cloned());
        input.limit = self.limit;

        let progress = self.progress();
        let envelope = self
            .use_case
            .execute_with_progress(input, progress.as_ref())
            .await?;
        Ok(ConsoleFormatter::render(&envelope, self.format))
    }

    async fn process_query(&self, query: &str) {
        println!();
        match self.search(query).await {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn process_all(&self, query: &str) {
        println!();
        let progress = self.progress();
        match self
            .use_case
            .execute_all_with_progress(query, self.limit, None, progress.as_ref())
            .await
        {
            Ok(output) => match self.format {
                OutputFormat::Json => println!(
                    "{}",
                    ConsoleFormatter::format_all_json(&output.envelope, &output.summary)
                ),
                _ => println!("{}", ConsoleFormatter::format_summary(&output.summary)),
            },
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn process_single(&self, source: Source, query: &str) {
        println!();
        match self.use_case.execute_single(source, query, self.limit).await {
            Ok(result) => match self.format {
                OutputFormat::Json => {
                    println!("{}", ConsoleFormatter::format_single_json(source, &result))
                }
                _ => println!("{}", ConsoleFormatter::format_source(source, &result)),
            },
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
