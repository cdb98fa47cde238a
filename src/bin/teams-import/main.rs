//! Import teams from a spreadsheet into the JSON snapshot and optionally seed MongoDB.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use cyberoscope_back::{
    dao::team_store::{
        TeamStore,
        mongodb::{MongoConfig, MongoTeamStore},
    },
    import::{
        self,
        seed::{self, SeedMode},
        snapshot, spreadsheet,
    },
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line options of the importer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Workbook whose first sheet lists one team per row.
    #[arg(long, default_value = "sample.xlsx")]
    workbook: PathBuf,
    /// Snapshot file merged with the imported teams.
    #[arg(long, default_value = "data/teams.json")]
    out: PathBuf,
    /// Write the merged snapshot into MongoDB (needs MONGODB_URI or MONGO_URI).
    #[arg(long)]
    seed: bool,
    /// How the snapshot is written when seeding.
    #[arg(long, value_enum, default_value_t = SeedMode::Replace)]
    mode: SeedMode,
    /// Print what seeding would change without writing to MongoDB.
    #[arg(long, requires = "seed")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Args::parse()).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    info!(workbook = %args.workbook.display(), "reading workbook");
    let rows = spreadsheet::read_rows(&args.workbook).context("reading workbook")?;
    let imported = import::rows_to_teams(rows);
    info!(count = imported.len(), "found teams in workbook");

    let existing = snapshot::load(&args.out);
    let merged = import::merge_snapshot(existing, imported);
    snapshot::write(&args.out, &merged).context("writing snapshot")?;
    info!(count = merged.len(), out = %args.out.display(), "wrote snapshot");

    if !args.seed {
        return Ok(());
    }

    seed::validate_disjoint(&merged).context("validating snapshot")?;

    let config = MongoConfig::from_env()
        .await
        .context("MONGODB_URI or MONGO_URI must be set to seed the database")?;
    let store: Arc<dyn TeamStore> = Arc::new(
        MongoTeamStore::connect(config)
            .await
            .context("connecting to MongoDB")?,
    );

    let current = store.list_teams().await.context("listing current teams")?;
    let plan = seed::plan(&current, &merged);
    info!(mode = ?args.mode, "seed plan:\n{}", plan.describe(args.mode));

    if args.dry_run {
        println!("{}", plan.describe(args.mode));
        return Ok(());
    }

    let report = seed::apply(store.as_ref(), &merged, args.mode)
        .await
        .context("seeding teams")?;
    println!(
        "seeding complete: inserted {}, updated {}, unchanged {}, removed {}",
        report.inserted, report.updated, report.unchanged, report.removed
    );
    Ok(())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
