//! Slash commands understood by the interactive prompt

use snaxel_domain::{OutputFormat, Source};

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    /// `/sources` with no arguments
    ShowSources,
    /// `/sources web news ...`
    SetSources(Vec<String>),
    /// `/limit` with no arguments
    ShowLimit,
    SetLimit(usize),
    SetFormat(OutputFormat),
    /// `/all <query>`
    All(String),
    /// `/single <source> <query>`
    Single(Source, String),
    /// `/cache`: entry count and TTL
    CacheInfo,
    /// `/clear`: drop every cache entry
    ClearCache,
    /// `/cleanup`: drop expired cache entries
    Cleanup,
    /// A known command used the wrong way
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/sources" if rest.is_empty() => ReplCommand::ShowSources,
            "/sources" => ReplCommand::SetSources(
                rest.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "/limit" if rest.is_empty() => ReplCommand::ShowLimit,
            "/limit" => match rest.parse::<usize>() {
                Ok(limit) if limit > 0 => ReplCommand::SetLimit(limit),
                _ => ReplCommand::Usage("/limit <positive number>"),
            },
            "/format" => match rest.to_ascii_lowercase().as_str() {
                "full" => ReplCommand::SetFormat(OutputFormat::Full),
                "summary" => ReplCommand::SetFormat(OutputFormat::Summary),
                "json" => ReplCommand::SetFormat(OutputFormat::Json),
                _ => ReplCommand::Usage("/format full|summary|json"),
            },
            "/all" if rest.is_empty() => ReplCommand::Usage("/all <query>"),
            "/all" => ReplCommand::All(rest.to_string()),
            "/single" => {
                let parsed = rest
                    .split_once(char::is_whitespace)
                    .and_then(|(id, query)| Some((Source::parse(id)?, query.trim())))
                    .filter(|(_, query)| !query.is_empty());
                match parsed {
                    Some((source, query)) => ReplCommand::Single(source, query.to_string()),
                    None => ReplCommand::Usage("/single <source> <query>"),
                }
            }
            "/cache" => ReplCommand::CacheInfo,
            "/clear" => ReplCommand::ClearCache,
            "/cleanup" => ReplCommand::Cleanup,
            _ => ReplCommand::Unknown(name.to_string()),
        }
    }
}
