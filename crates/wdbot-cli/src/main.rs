//! wdbot CLI - Audit and repair knowledge-graph items from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::create::CreateArgs;
use commands::labels::LabelTarget;
use commands::{check, create, labels, rules, tv_show, Global, RunArgs};
use std::path::PathBuf;
use wdbot_model::EntityKind;

#[derive(Parser)]
#[command(name = "wdbot")]
#[command(about = "Check and fix data-quality constraints on Wikidata items", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to load instead of ~/.wdbot and .wdbot
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging, including every passed and failed constraint
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check constraints on the given items
    Check {
        /// Item IDs in the format Q######
        #[arg(required = true)]
        item_ids: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Check the series, seasons or episodes of a TV show
    CheckTvShow {
        /// ID of the television series
        series_id: String,

        /// Which items of the show to check
        #[arg(long, value_enum, default_value = "all")]
        child_type: tv_show::ChildType,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Create the season items of a series
    CreateSeasons {
        /// ID of the television series
        series_id: String,

        /// Number of seasons to create, starting at season 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number_of_seasons: u32,

        #[command(flatten)]
        create: CreateArgs,
    },

    /// Create episode items from a titles file
    CreateEpisodes {
        /// ID of the television series
        series_id: String,

        /// ID of the season the episodes belong to
        season_id: String,

        /// Lines of `series ordinal,season ordinal,title`
        titles_file: PathBuf,

        /// Accept titles containing '[' or ']'
        #[arg(long)]
        confirm_titles: bool,

        #[command(flatten)]
        create: CreateArgs,
    },

    /// Set missing English labels on every selected item, without prompting
    FixLabels {
        /// Which items to select
        #[arg(value_enum)]
        target: LabelTarget,

        /// Only episodes of this series
        #[arg(long)]
        series: Option<String>,

        /// Only print the labels that would be set
        #[arg(long)]
        dry: bool,
    },

    /// List the constraints applied to each kind of item
    Rules {
        /// Only show one kind (episode, season, series, board_game)
        #[arg(long, value_parser = parse_kind)]
        kind: Option<EntityKind>,
    },
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    EntityKind::ALL
        .into_iter()
        .find(|kind| kind.to_string() == s)
        .ok_or_else(|| {
            format!(
                "unknown kind '{}'; valid values: episode, season, series, board_game",
                s
            )
        })
}

fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WDBOT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let global = Global {
        config: cli.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Check { item_ids, run } => check::run(&global, &item_ids, &run),
        Commands::CheckTvShow {
            series_id,
            child_type,
            run,
        } => tv_show::run(&global, &series_id, child_type, &run),
        Commands::CreateSeasons {
            series_id,
            number_of_seasons,
            create: args,
        } => create::run_seasons(&global, &series_id, number_of_seasons, &args),
        Commands::CreateEpisodes {
            series_id,
            season_id,
            titles_file,
            confirm_titles,
            create: args,
        } => create::run_episodes(
            &global,
            &series_id,
            &season_id,
            &titles_file,
            confirm_titles,
            &args,
        ),
        Commands::FixLabels {
            target,
            series,
            dry,
        } => labels::run(&global, target, series.as_deref(), dry),
        Commands::Rules { kind } => rules::run(&global, kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::OutputFormat;

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from([
            "wdbot",
            "check",
            "Q1",
            "q2",
            "--autofix",
            "--accumulate",
            "--filter",
            "P495,P449",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Check { item_ids, run } => {
                assert_eq!(item_ids, vec!["Q1", "q2"]);
                assert!(run.autofix);
                assert!(run.accumulate);
                assert!(!run.interactive);
                assert!(!run.no_sort);
                assert_eq!(run.filter, "P495,P449");
                assert_eq!(run.format, OutputFormat::Json);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_check_requires_ids() {
        assert!(Cli::try_parse_from(["wdbot", "check"]).is_err());
    }

    #[test]
    fn test_tv_show_defaults_to_all_members() {
        let cli = Cli::try_parse_from(["wdbot", "check-tv-show", "Q4"]).unwrap();
        match cli.command {
            Commands::CheckTvShow {
                series_id,
                child_type,
                run,
            } => {
                assert_eq!(series_id, "Q4");
                assert_eq!(child_type, tv_show::ChildType::All);
                assert_eq!(run.format, OutputFormat::Text);
            }
            _ => panic!("expected check-tv-show"),
        }
    }

    #[test]
    fn test_tv_show_child_type() {
        let cli =
            Cli::try_parse_from(["wdbot", "check-tv-show", "Q4", "--child-type", "season"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::CheckTvShow {
                child_type: tv_show::ChildType::Season,
                ..
            }
        ));
        assert!(
            Cli::try_parse_from(["wdbot", "check-tv-show", "Q4", "--child-type", "movie"]).is_err()
        );
    }

    #[test]
    fn test_create_seasons_args() {
        let cli = Cli::try_parse_from(["wdbot", "create-seasons", "Q4", "6", "--quickstatements"])
            .unwrap();
        match cli.command {
            Commands::CreateSeasons {
                series_id,
                number_of_seasons,
                create,
            } => {
                assert_eq!(series_id, "Q4");
                assert_eq!(number_of_seasons, 6);
                assert!(create.quickstatements);
            }
            _ => panic!("expected create-seasons"),
        }
        assert!(Cli::try_parse_from(["wdbot", "create-seasons", "Q4", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["wdbot", "create-seasons", "Q4", "2", "--dry", "--quickstatements"])
                .is_err()
        );
    }

    #[test]
    fn test_create_episodes_args() {
        let cli = Cli::try_parse_from([
            "wdbot",
            "create-episodes",
            "Q4",
            "Q40",
            "lost_S01.csv",
            "--confirm-titles",
            "--dry",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::CreateEpisodes {
                confirm_titles: true,
                ref titles_file,
                ref create,
                ..
            } if titles_file == &PathBuf::from("lost_S01.csv") && create.dry
        ));
    }

    #[test]
    fn test_fix_labels_args() {
        let cli = Cli::try_parse_from(["wdbot", "fix-labels", "board-game", "--dry"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::FixLabels {
                target: LabelTarget::BoardGame,
                series: None,
                dry: true,
            }
        ));
        assert!(Cli::try_parse_from(["wdbot", "fix-labels", "season"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["wdbot", "rules", "--verbose", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(Cli::try_parse_from(["wdbot", "rules", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_rules_kind() {
        let cli = Cli::try_parse_from(["wdbot", "rules", "--kind", "board_game"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Rules {
                kind: Some(EntityKind::BoardGame)
            }
        ));
        assert!(Cli::try_parse_from(["wdbot", "rules", "--kind", "movie"]).is_err());
    }
}
