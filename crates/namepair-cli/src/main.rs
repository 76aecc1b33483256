use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use namepair_cli::config::AppConfig;
use namepair_cli::logging::init_logging;
use namepair_cli::output::{self, PairView};
use namepair_core::model::{CombinationId, Gender, GenderMode, ParseGroupError, ScoringGroup};
use namepair_core::{AppInfo, Ranker, Store};

/// Pairwise ranking of first/middle name combinations.
#[derive(Debug, Parser)]
#[command(
    name = AppInfo::name(),
    author,
    version = AppInfo::version(),
    about = "Rank first/middle name combinations by head-to-head choices"
)]
struct Cli {
    /// Path to the YAML configuration file (defaults apply when it is missing).
    #[arg(short, long, value_name = "FILE", default_value = "namepair.yaml", global = true)]
    config: PathBuf,

    /// Override the store location.
    #[arg(long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    /// Override the RNG seed used for pairing.
    #[arg(long, value_name = "SEED", global = true)]
    seed: Option<u64>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register names and generate their combinations.
    Add {
        #[arg(required = true, value_name = "TEXT")]
        names: Vec<String>,
        /// M, F or N.
        #[arg(short, long, default_value = "N")]
        gender: Gender,
    },
    /// Show the next pair to compare.
    Pick {
        #[arg(long, default_value = "1")]
        group: ScoringGroup,
        /// M or F.
        #[arg(long)]
        gender: GenderMode,
    },
    /// Record that WINNER was preferred over LOSER.
    Decide {
        #[arg(long, default_value = "1")]
        group: ScoringGroup,
        #[arg(long)]
        winner: u32,
        #[arg(long)]
        loser: u32,
    },
    /// Record that neither combination was chosen.
    Skip {
        #[arg(long, default_value = "1")]
        group: ScoringGroup,
        a: u32,
        b: u32,
    },
    /// Show the highest-rated combinations.
    Leaderboard {
        /// 1, 2 or combined.
        #[arg(long, default_value = "1")]
        group: BoardScope,
        #[arg(long)]
        gender: Option<GenderMode>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List names by reputation.
    Names {
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Inspect or change tunable settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Inspect or relabel the scoring groups.
    Groups {
        #[command(subcommand)]
        action: Option<GroupAction>,
    },
    /// Show the decision log.
    History {
        #[arg(long)]
        group: Option<ScoringGroup>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
}

#[derive(Debug, Subcommand)]
enum GroupAction {
    List,
    Rename { group: ScoringGroup, label: String },
}

#[derive(Debug, Clone, Copy)]
enum BoardScope {
    Group(ScoringGroup),
    Combined,
}

impl FromStr for BoardScope {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("combined") {
            return Ok(BoardScope::Combined);
        }
        s.parse().map(BoardScope::Group)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_path_or_default(&cli.config)?;

    if let Some(data) = cli.data {
        config.data_path = data;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;
    let store = Store::open_json(&config.data_path)
        .with_context(|| format!("opening store at {}", config.data_path.display()))?;
    let mut ranker = match config.seed {
        Some(seed) => Ranker::with_seed(store, seed),
        None => Ranker::new(store),
    };

    run(cli.command, &mut ranker, cli.json)
}

fn run(command: Command, ranker: &mut Ranker, json: bool) -> Result<()> {
    match command {
        Command::Add { names, gender } => {
            let mut added = Vec::with_capacity(names.len());
            for text in &names {
                let name = ranker
                    .add_name(text, gender)
                    .with_context(|| format!("adding name '{text}'"))?;
                added.push(name);
            }
            if json {
                return print_json(&added);
            }
            for name in &added {
                println!(
                    "Added #{} {} ({} new combination{})",
                    name.id,
                    name.text,
                    name.created,
                    if name.created == 1 { "" } else { "s" }
                );
            }
        }
        Command::Pick { group, gender } => {
            let Some(pair) = ranker.pick_pair(group, gender) else {
                if json {
                    return print_json(&serde_json::Value::Null);
                }
                println!("Not enough {gender} combinations in group {group} yet; add more names.");
                return Ok(());
            };
            let view = PairView::new(ranker.state(), group, &pair)
                .context("picked combination is missing from the store")?;
            if json {
                return print_json(&view);
            }
            println!("{}", view.to_text());
        }
        Command::Decide {
            group,
            winner,
            loser,
        } => {
            let summary = ranker
                .apply_decision(group, CombinationId(winner), CombinationId(loser))
                .context("recording decision")?;
            if json {
                return print_json(&summary);
            }
            let update = summary.update;
            println!(
                "Decision #{}: #{winner} {:.1} -> {:.1}, #{loser} {:.1} -> {:.1}",
                summary.sequence,
                update.winner_before,
                update.winner_after,
                update.loser_before,
                update.loser_after
            );
        }
        Command::Skip { group, a, b } => {
            let sequence = ranker
                .record_skip(group, CombinationId(a), CombinationId(b))
                .context("recording skip")?;
            if json {
                return print_json(&json!({ "sequence": sequence }));
            }
            println!("Skip #{sequence}: #{a} and #{b} go back in the pool");
        }
        Command::Leaderboard {
            group,
            gender,
            limit,
        } => match group {
            BoardScope::Group(group) => {
                let rows = ranker.top_combinations(group, gender, limit);
                if json {
                    return print_json(&rows);
                }
                println!("{}", ranker.state().group(group).label);
                print!("{}", output::combination_table(&rows));
            }
            BoardScope::Combined => {
                let rows = ranker.top_combinations_combined(gender, limit);
                if json {
                    return print_json(&rows);
                }
                print!("{}", output::combined_table(&rows));
            }
        },
        Command::Names { gender, limit } => {
            let rows = ranker.top_names(gender, limit.unwrap_or(usize::MAX));
            if json {
                return print_json(&rows);
            }
            print!("{}", output::name_table(&rows));
        }
        Command::Settings { action } => match action {
            SettingsAction::List => {
                let settings = ranker.state().settings_map();
                if json {
                    return print_json(settings);
                }
                for (key, value) in settings {
                    println!("{key} = {value}");
                }
            }
            SettingsAction::Get { key } => {
                let Some(value) = ranker.state().setting(&key) else {
                    bail!("setting '{key}' is not set");
                };
                if json {
                    return print_json(&json!({ "key": key, "value": value }));
                }
                println!("{value}");
            }
            SettingsAction::Set { key, value } => {
                let stored = ranker
                    .set_setting(&key, &value)
                    .with_context(|| format!("updating setting '{key}'"))?;
                if json {
                    return print_json(&json!({ "key": key, "value": stored }));
                }
                println!("{key} = {stored}");
            }
        },
        Command::Groups { action } => match action.unwrap_or(GroupAction::List) {
            GroupAction::List => {
                let groups: Vec<_> = ScoringGroup::ALL
                    .into_iter()
                    .map(|group| {
                        let profile = ranker.state().group(group);
                        json!({
                            "group": group.number(),
                            "label": profile.label,
                            "accent": profile.accent,
                        })
                    })
                    .collect();
                if json {
                    return print_json(&groups);
                }
                for group in ScoringGroup::ALL {
                    let profile = ranker.state().group(group);
                    println!("{group}: {} ({})", profile.label, profile.accent);
                }
            }
            GroupAction::Rename { group, label } => {
                ranker
                    .rename_group(group, &label)
                    .with_context(|| format!("renaming group {group}"))?;
                if json {
                    return print_json(ranker.state().group(group));
                }
                println!("{group}: {}", ranker.state().group(group).label);
            }
        },
        Command::History { group, limit } => {
            let records = ranker.decisions(group);
            let skip = limit.map_or(0, |limit| records.len().saturating_sub(limit));
            let shown = &records[skip..];
            let groups: Vec<ScoringGroup> = match group {
                Some(group) => vec![group],
                None => ScoringGroup::ALL.to_vec(),
            };

            if json {
                let stats: Vec<_> = groups
                    .iter()
                    .map(|&g| json!({ "group": g.number(), "stats": ranker.session_stats(g) }))
                    .collect();
                return print_json(&json!({ "decisions": shown, "stats": stats }));
            }
            for record in shown {
                println!("{}", output::history_line(record));
            }
            for g in groups {
                let stats = ranker.session_stats(g);
                println!(
                    "group {g}: {} decisions, {} skips",
                    stats.decisions, stats.skips
                );
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
