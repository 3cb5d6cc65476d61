use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docstore_audit::api::{DocumentSource, FirestoreClient, SnapshotSource};
use docstore_audit::config::Config;
use docstore_audit::diagnostics::{self, MatchCollection, PredictionOrigin};
use docstore_audit::models::{FieldValue, Match};
use docstore_audit::reconcile::UnknownTimePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "docstore-audit",
    version,
    about = "Read-only diagnostics for match, competition and prediction documents"
)]
struct Cli {
    /// Firestore project ID (overrides FIRESTORE_PROJECT_ID)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Firestore database ID (overrides FIRESTORE_DATABASE_ID)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Write raw responses to this directory (overrides SNAPSHOT_DIR)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    /// Read previously written responses from this directory instead of the network
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// List competitions, newest first
    Competitions {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Find competitions whose name or league ID contains a term
    SearchCompetitions {
        #[arg(long, default_value = "t20")]
        term: String,
    },
    /// List matches with status and verification flag
    Matches(TargetArgs),
    /// Count matches per "team1 vs team2" label
    TeamPairs(TargetArgs),
    /// Report matches sharing team pair and scheduled time
    Duplicates {
        #[command(flatten)]
        target: TargetArgs,

        /// How matches without a scheduled time are grouped (overrides UNKNOWN_TIME_POLICY)
        #[arg(long)]
        unknown_time: Option<UnknownTimePolicy>,
    },
    /// Show matches whose team names contain the given fragments
    FindMatch {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        team1: String,

        #[arg(long)]
        team2: String,
    },
    /// Check a competition's predictions against its current matches
    Orphans {
        #[arg(long)]
        competition: String,
    },
    /// Count non-upcoming matches for every competition of a league
    LeagueStatus {
        #[arg(long)]
        league: String,
    },
    /// Show the score of the first finished match
    FinishedScore(TargetArgs),
    /// Fetch and print a single document, e.g. `app_metadata/t20_leaderboard_refresh`
    GetDocument {
        #[arg(long)]
        path: String,
    },
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Contest ID (`competitions/{id}/matches`)
    #[arg(long, conflicts_with = "league", required_unless_present = "league")]
    competition: Option<String>,

    /// Official league ID (`official_leagues/{id}/matches`)
    #[arg(long)]
    league: Option<String>,
}

impl TargetArgs {
    fn collection(&self) -> Result<MatchCollection> {
        match (&self.competition, &self.league) {
            (Some(id), _) => Ok(MatchCollection::Competition(id.clone())),
            (None, Some(id)) => Ok(MatchCollection::League(id.clone())),
            (None, None) => anyhow::bail!("either --competition or --league is required"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docstore_audit=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        println!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(project) = cli.project {
        config.project_id = project;
    }
    if let Some(database) = cli.database {
        config.database_id = database;
    }
    if let Some(dir) = cli.snapshot_dir {
        config.snapshot_dir = Some(dir);
    }

    let source: Box<dyn DocumentSource> = match cli.offline {
        Some(dir) => {
            info!("Reading snapshots from {}", dir.display());
            Box::new(SnapshotSource::new(dir))
        }
        None => {
            config.validate()?;
            info!("Using {}", config.base_path());
            Box::new(FirestoreClient::new(&config)?)
        }
    };
    let source = source.as_ref();

    match cli.command {
        Command::Competitions { limit } => {
            let competitions = diagnostics::latest_competitions(source, limit).await?;
            if competitions.is_empty() {
                println!("No competitions found");
                return Ok(());
            }
            println!("--- Latest Competitions ---");
            for c in competitions {
                println!(
                    "ID: {} | Name: {} | Created: {}",
                    c.id,
                    c.name,
                    c.create_time.as_deref().unwrap_or("N/A")
                );
            }
        }

        Command::SearchCompetitions { term } => {
            let competitions = diagnostics::search_competitions(source, &term).await?;
            println!("--- Competitions matching \"{}\" ---", term);
            if competitions.is_empty() {
                println!("None");
            }
            for c in competitions {
                println!(
                    "ID: {} | Name: {} | LeagueID: {} | Sport: {}",
                    c.id, c.name, c.league_id, c.sport
                );
            }
        }

        Command::Matches(target) => {
            let collection = target.collection()?;
            let matches = diagnostics::load_matches(source, &collection).await?;
            if matches.is_empty() {
                println!("No matches found in {}", collection.path());
                return Ok(());
            }
            println!("--- Matches in {} ---", collection);
            for m in matches {
                println!(
                    "ID: {} | {} | Status: {} | Verified: {}",
                    m.id,
                    m.label(),
                    m.status,
                    m.verified
                );
            }
        }

        Command::TeamPairs(target) => {
            let collection = target.collection()?;
            let counts = diagnostics::team_pair_report(source, &collection).await?;
            if counts.is_empty() {
                println!("No matches found in {}", collection.path());
                return Ok(());
            }
            println!("--- Match Counts in {} ---", collection);
            for pair in counts {
                if pair.count > 1 {
                    println!("DUPLICATE: {} (x{})", pair.label, pair.count);
                } else {
                    println!("OK: {}", pair.label);
                }
            }
        }

        Command::Duplicates {
            target,
            unknown_time,
        } => {
            let collection = target.collection()?;
            let policy = unknown_time.unwrap_or(config.unknown_time_policy);
            let report = diagnostics::duplicate_report(source, &collection, policy).await?;

            println!(
                "--- Duplicates in {} ({} matches scanned) ---",
                collection, report.scanned
            );
            if report.clusters.is_empty() {
                println!("No obvious duplicates found by Team Pair + Time.");
            }
            for cluster in &report.clusters {
                let note = if cluster.unknown_time() {
                    " [unknown time, possible false positive]"
                } else {
                    ""
                };
                println!("DUPLICATE FOUND: {}{}", cluster.key, note);
                for id in &cluster.ids {
                    println!("  - Doc ID: {}", id);
                }
            }
            if report.unknown_time_clusters() > 0 {
                println!(
                    "{} cluster(s) grouped on missing scheduled time; rerun with --unknown-time separate to exclude them",
                    report.unknown_time_clusters()
                );
            }
        }

        Command::FindMatch {
            target,
            team1,
            team2,
        } => {
            let collection = target.collection()?;
            let matches = diagnostics::find_matches(source, &collection, &team1, &team2).await?;
            if matches.is_empty() {
                println!("No matches for {} vs {}", team1, team2);
            }
            for m in matches {
                println!("MATCH: {} | Time: {} | ID: {}", m.label(), m.time_label(), m.id);
            }
        }

        Command::Orphans { competition } => {
            let audit = diagnostics::audit_orphans(source, &competition).await?;
            print_orphan_audit(&audit, config.orphan_sample_size);
        }

        Command::LeagueStatus { league } => {
            let statuses = diagnostics::league_status(source, &league).await?;
            if statuses.is_empty() {
                println!("No competitions found for league {}", league);
            }
            for status in statuses {
                match status.non_upcoming {
                    Some(count) => println!(
                        "Comp {}: {} non-upcoming matches.",
                        status.competition.id, count
                    ),
                    None => println!("Comp {}: matches unavailable", status.competition.id),
                }
            }
        }

        Command::FinishedScore(target) => {
            let collection = target.collection()?;
            match diagnostics::first_finished(source, &collection).await? {
                Some(m) => print_finished(&m)?,
                None => println!("No finished matches in {}", collection),
            }
        }

        Command::GetDocument { path } => match diagnostics::inspect_document(source, &path).await? {
            Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
            None => println!("Document {} not found", path),
        },
    }

    Ok(())
}

fn print_orphan_audit(audit: &diagnostics::OrphanAudit, sample_size: usize) {
    println!("Target Competition: {}", audit.competition_id);
    println!("Found {} current matches.", audit.current_matches);

    match audit.origin {
        PredictionOrigin::Query => println!("Predictions source: structured query"),
        PredictionOrigin::Listing => {
            println!("Predictions source: full listing filtered locally (query unavailable)")
        }
        PredictionOrigin::Unavailable => {
            println!("Predictions source: unavailable, counts below are empty")
        }
    }

    let report = &audit.report;
    println!("Prediction Summary:");
    println!("Valid: {}", report.valid);
    println!("Orphaned: {}", report.orphaned);
    println!("Unique orphaned matches: {}", report.unique_orphaned());
    if report.unique_orphaned() > 0 {
        println!("Sample orphaned IDs: {:?}", report.sample(sample_size));
    }
}

fn print_finished(m: &Match) -> Result<()> {
    println!("Match: {}", m.id);
    match &m.actual_score {
        Some(FieldValue::Map(score)) => println!("{}", serde_json::to_string_pretty(score)?),
        Some(other) => println!("{}", serde_json::to_string(other)?),
        None => println!("None"),
    }
    Ok(())
}
