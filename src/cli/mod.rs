//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hitmerge",
    version,
    author = "neur0map",
    about = "Merge and deduplicate content search hits",
    long_about = "hitmerge runs a search against a hit corpus, keeps one entry per item according to \
                  language and version preferences, withholds hidden items and prints display-ready \
                  results."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/hitmerge/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Configuration profile to apply
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a hit corpus and print merged results
    Query {
        /// Search query text
        query: String,

        /// JSON corpus of hits and items
        #[arg(long, value_name = "FILE")]
        corpus: PathBuf,

        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Content language; hits in this language win over others
        #[arg(short = 'L', long)]
        language: Option<String>,

        /// Restrict results to the subtree of this item ID
        #[arg(short, long)]
        root: Option<String>,

        /// Search type (defaults to search.default_type)
        #[arg(short = 't', long = "type", value_parser = ["classic", "content-editor", "other"])]
        search_type: Option<String>,

        /// Include items hidden in the content tree
        #[arg(long)]
        show_hidden: bool,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Show only a specific section
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from([
            "hitmerge",
            "query",
            "home",
            "--corpus",
            "hits.json",
            "-L",
            "da",
            "--type",
            "content-editor",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                query,
                language,
                search_type,
                json,
                limit,
                ..
            } => {
                assert_eq!(query, "home");
                assert_eq!(language.as_deref(), Some("da"));
                assert_eq!(search_type.as_deref(), Some("content-editor"));
                assert!(json);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_search_type() {
        let parsed = Cli::try_parse_from([
            "hitmerge", "query", "home", "--corpus", "hits.json", "--type", "bucket",
        ]);
        assert!(parsed.is_err());
    }
}
