use std::path::PathBuf;
use std::sync::Arc;

use hitmerge::cli::{Cli, Commands, ConfigAction};
use hitmerge::config::Config;
use hitmerge::corpus::Corpus;
use hitmerge::error::{HitmergeError, Result};
use hitmerge::pipeline::{ProcessOutcome, ProcessorOptions, SearchArgs, SearchProcessor};
use hitmerge::retrieval::{ItemId, SearchType};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            query,
            corpus,
            limit,
            language,
            root,
            search_type,
            show_hidden,
            json,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            let request = QueryRequest {
                query,
                corpus,
                limit,
                language,
                root,
                search_type,
                show_hidden,
                json,
            };
            cmd_query(config, request)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "hitmerge=debug" } else { "hitmerge=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct QueryRequest {
    query: String,
    corpus: PathBuf,
    limit: Option<usize>,
    language: Option<String>,
    root: Option<String>,
    search_type: Option<String>,
    show_hidden: bool,
    json: bool,
}

fn cmd_query(config: Config, request: QueryRequest) -> Result<()> {
    let corpus = Arc::new(Corpus::load(&request.corpus)?);

    let search_type = match request.search_type {
        Some(value) => value
            .parse::<SearchType>()
            .map_err(HitmergeError::Config)?,
        None => config.search.default_type,
    };

    let mut args = SearchArgs::new(
        request.query,
        search_type,
        request.limit.unwrap_or(config.search.default_limit),
    );
    if let Some(language) = request.language {
        args = args.with_language(language);
    }
    if let Some(root) = request.root {
        let root = root.parse::<ItemId>().map_err(|e| {
            HitmergeError::Config(format!("Invalid root item ID '{}': {}", root, e))
        })?;
        args = args.with_root(root);
    }

    let mut options = ProcessorOptions::from_config(&config);
    options.show_hidden_items |= request.show_hidden;

    let processor = SearchProcessor::new(corpus.clone(), corpus, Arc::new(config), options);
    let outcome = processor.process(&mut args);
    tracing::debug!("Search outcome: {:?}", outcome);

    if request.json {
        let json = serde_json::to_string_pretty(&args.result).map_err(|e| HitmergeError::Json {
            source: e,
            context: "Failed to serialize results".to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }

    match outcome {
        ProcessOutcome::Delegated | ProcessOutcome::Legacy => {
            println!("Bucketed search is disabled; request handed to the legacy engine");
        }
        ProcessOutcome::QueryFailed => {
            println!("Search failed, see log for details");
        }
        ProcessOutcome::EmptyQuery | ProcessOutcome::Cancelled => {
            println!("No results");
        }
        ProcessOutcome::Completed { merged, added } => {
            println!("{} results ({} merged)", added, merged);
            for result in args.result.iter() {
                if result.url.is_empty() {
                    println!("  [{}] {}", result.icon, result.title);
                } else {
                    println!("  [{}] {} <{}>", result.icon, result.title, result.url);
                }
            }
        }
    }

    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show { section } => {
            let config = load_config(config_path, profile)?;
            let value = serde_json::to_value(&config).map_err(|e| HitmergeError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;

            let shown = match section {
                Some(section) => value.get(&section).cloned().ok_or_else(|| {
                    HitmergeError::Config(format!("Unknown config section: {}", section))
                })?,
                None => value,
            };

            let json = serde_json::to_string_pretty(&shown).map_err(|e| HitmergeError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| HitmergeError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            let config = Config::default();
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'hitmerge config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        return Ok(config);
    }

    if let Some(profile) = profile {
        Config::load_with_profile(&path, &profile)
    } else {
        Config::load(&path)
    }
}
