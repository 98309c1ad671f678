use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;

use model_manager_core::{
    compact_choices, delete_models, detailed_html, format_size, open_containing_folder,
    resolve_base_dir, unique_categories, CategoryFilter, Config, ModelLibrary,
    ModelManagerError, Query, Result, Selection, SortKey, Stats, ViewMode, ALL_CATEGORIES,
};

mod args;
mod logging;
mod output;
use args::{Cli, Commands, ConfigAction, FilterArgs, OutputFormat, Shell};

#[cfg(feature = "gui")]
mod gui;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    // Handle GUI flag
    #[cfg(feature = "gui")]
    if cli.gui {
        return match gui::run(base_dir, cli.roots) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
                ExitCode::FAILURE
            }
        };
    }

    #[cfg(not(feature = "gui"))]
    if cli.gui {
        eprintln!(
            "{} GUI not available. Build with: cargo install --path crates/model-manager-cli --features gui",
            "[ERROR]".red().bold()
        );
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Some(Commands::List {
            filter,
            sort,
            format,
            selected,
        }) => handle_list(
            &base_dir,
            &cli.roots,
            &filter,
            sort,
            format,
            &selected,
        ),
        Some(Commands::Stats { filter, selected }) => {
            handle_stats(&base_dir, &cli.roots, &filter, &selected)
        }
        Some(Commands::Categories) => handle_categories(&base_dir, &cli.roots),
        Some(Commands::Delete { paths, yes }) => handle_delete(&paths, yes),
        Some(Commands::Open { path }) => handle_open(&path),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "model-manager", &mut io::stdout());
}

/// Roots from `--root` when given, otherwise the configured ones
fn resolve_roots(config: &Config, cli_roots: &[PathBuf]) -> Vec<PathBuf> {
    if cli_roots.is_empty() {
        config.model_dirs()
    } else {
        cli_roots.to_vec()
    }
}

/// Load config and scan once
fn load_library(base_dir: &Path, cli_roots: &[PathBuf]) -> Result<(Config, ModelLibrary)> {
    let config = Config::load(base_dir)?;
    let roots = resolve_roots(&config, cli_roots);
    debug!(?roots, "scanning");

    let mut library = ModelLibrary::with_classifier(config.classifier()?);
    library.refresh(&roots);
    Ok((config, library))
}

/// Selection from user-supplied paths, canonicalized to match scan results
fn selection_from(paths: &[PathBuf]) -> Selection {
    paths
        .iter()
        .map(|p| fs::canonicalize(p).unwrap_or_else(|_| p.clone()))
        .collect()
}

fn build_query(filter: &FilterArgs, sort: SortKey) -> Query {
    Query::new()
        .search(filter.search.as_str())
        .category(
            filter
                .category
                .parse::<CategoryFilter>()
                .unwrap_or_default(),
        )
        .sort(sort)
}

fn handle_list(
    base_dir: &Path,
    cli_roots: &[PathBuf],
    filter: &FilterArgs,
    sort: Option<SortKey>,
    format: Option<OutputFormat>,
    selected: &[PathBuf],
) -> Result<()> {
    let (config, library) = load_library(base_dir, cli_roots)?;
    let query = build_query(filter, sort.unwrap_or(config.display.sort));
    let models = query.apply(library.models());
    let selection = selection_from(selected);

    let format = format.unwrap_or(match config.display.view {
        ViewMode::Compact => OutputFormat::Compact,
        ViewMode::Detailed => OutputFormat::Text,
    });

    match format {
        OutputFormat::Text => {
            output::print_stats(&Stats::compute(&models, &selection));
            println!();
            output::print_table(&models, &selection);
        }
        OutputFormat::Compact => {
            for choice in compact_choices(&models) {
                let marker = if selection.contains(&choice.path) {
                    "[x]"
                } else {
                    "[ ]"
                };
                println!("{} {}", marker, choice.label);
            }
        }
        OutputFormat::Html => {
            println!("{}", Stats::compute(&models, &selection).to_html());
            println!("{}", detailed_html(&models, &selection));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&models)?);
        }
    }

    Ok(())
}

fn handle_stats(
    base_dir: &Path,
    cli_roots: &[PathBuf],
    filter: &FilterArgs,
    selected: &[PathBuf],
) -> Result<()> {
    let (config, library) = load_library(base_dir, cli_roots)?;
    let models = build_query(filter, config.display.sort).apply(library.models());
    output::print_stats(&Stats::compute(&models, &selection_from(selected)));
    Ok(())
}

fn handle_categories(base_dir: &Path, cli_roots: &[PathBuf]) -> Result<()> {
    let (_, library) = load_library(base_dir, cli_roots)?;
    let models = library.models();

    println!();
    for label in unique_categories(models) {
        let (count, size) = if label == ALL_CATEGORIES {
            (models.len(), models.iter().map(|m| m.size_bytes).sum())
        } else {
            models
                .iter()
                .filter(|m| m.category.label == label)
                .fold((0usize, 0u64), |(n, s), m| (n + 1, s + m.size_bytes))
        };
        println!(
            "  {:<14} {:>5} files  {:>10}",
            label.cyan(),
            count,
            format_size(size)
        );
    }
    println!();
    Ok(())
}

fn handle_delete(paths: &[PathBuf], yes: bool) -> Result<()> {
    if paths.is_empty() {
        return Err(ModelManagerError::NothingSelected);
    }

    if !yes {
        println!();
        println!("{}", "Permanently delete these files?".yellow());
        let mut total = 0u64;
        for path in paths {
            match fs::metadata(path) {
                Ok(m) => {
                    total += m.len();
                    println!("  {} ({})", path.display(), format_size(m.len()));
                }
                Err(_) => println!("  {} {}", path.display(), "(not found)".dimmed()),
            }
        }
        println!();
        println!("Total: {}", format_size(total).bold());
        println!("{}", "Deleted files do NOT go to the recycle bin.".red());
        print!("Type 'yes' to confirm: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = delete_models(paths)?;
    println!();
    if report.has_errors() {
        println!("{}", report.to_string().yellow());
    } else {
        println!("{}", report.to_string().green());
    }
    Ok(())
}

fn handle_open(path: &Path) -> Result<()> {
    let folder = open_containing_folder(path)?;
    println!("{} {}", "✅ Opened:".green(), folder.display());
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ModelManagerError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            if !config.rules.is_empty() {
                println!("{} = {} custom", "rules".cyan(), config.rules.len());
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_list_options() {
        let cli = Cli::try_parse_from([
            "model-manager",
            "--root",
            "/a",
            "--root",
            "/b",
            "list",
            "--search",
            "flux",
            "--category",
            "Checkpoint",
            "--sort",
            "name",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        match cli.command {
            Some(Commands::List {
                filter,
                sort,
                format,
                ..
            }) => {
                assert_eq!(filter.search, "flux");
                assert_eq!(filter.category, "Checkpoint");
                assert_eq!(sort, Some(SortKey::Name));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_sort_parses_through_sort_key() {
        let cli = Cli::try_parse_from(["model-manager", "list", "--sort", "modified"]).unwrap();
        match cli.command {
            Some(Commands::List { sort, .. }) => assert_eq!(sort, Some(SortKey::Date)),
            _ => panic!("expected list command"),
        }

        assert!(Cli::try_parse_from(["model-manager", "list", "--sort", "sideways"]).is_err());
    }

    #[test]
    fn build_query_treats_all_as_no_filter() {
        let filter = FilterArgs {
            search: String::new(),
            category: "All".to_string(),
        };
        let query = build_query(&filter, SortKey::Date);
        assert_eq!(query.category, CategoryFilter::All);
        assert_eq!(query.sort, SortKey::Date);
    }

    #[test]
    fn cli_roots_override_config() {
        let config = Config::default();
        let roots = resolve_roots(&config, &[PathBuf::from("/custom")]);
        assert_eq!(roots, vec![PathBuf::from("/custom")]);
    }

    #[test]
    fn delete_without_paths_is_nothing_selected() {
        let err = handle_delete(&[], true).unwrap_err();
        assert!(matches!(err, ModelManagerError::NothingSelected));
    }
}
