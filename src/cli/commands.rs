use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{parse_timestamp, Cli, Commands};
use crate::config;
use crate::error::{ExtractionError, Result};
use crate::models::GasCollectionCatalog;
use crate::processors::{BatchRunner, LocationExtractor};
use crate::remote::HarmonyClient;
use crate::utils::cancel::CancelToken;
use crate::utils::grid::north_america_grid;
use crate::utils::progress::ProgressReporter;
use crate::writers::ObservationWriter;

pub async fn run(cli: Cli) -> Result<i32> {
    init_logging(cli.verbose);

    let settings = config::load(cli.config.as_deref())?;
    let writer = ObservationWriter::connect(&settings.database_url).await?;
    writer.ensure_schema().await?;

    match cli.command {
        Commands::InitDb => {
            println!("Database schema ready at {}", settings.database_url);
        }

        Commands::SeedGrid { step } => {
            let points = north_america_grid(step);
            println!("Seeding {} grid points...", points.len());

            let progress = ProgressReporter::new_spinner("Seeding locations...", false);
            let inserted = writer.seed_locations(&points).await?;
            progress.finish_with_message("Seeding complete");

            println!("Inserted {} new of {} grid points", inserted, points.len());
        }

        Commands::Locations { sample } => {
            let total = writer.location_count().await?;
            println!("{} location(s) stored", total);

            for location in writer.load_locations(Some(sample as i64)).await? {
                println!(
                    "{:>6}  {:>8.2}  {:>8.2}  {}",
                    location.location_id,
                    location.latitude,
                    location.longitude,
                    location.grid_name.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Run {
            start,
            stop,
            location_id,
            limit,
        } => {
            let start = parse_timestamp(&start)?;
            let stop = parse_timestamp(&stop)?;
            if start >= stop {
                return Err(ExtractionError::Config(
                    "window start must precede stop".to_string(),
                ));
            }

            let locations = match location_id {
                Some(id) => {
                    let location = writer.location(id).await?.ok_or_else(|| {
                        ExtractionError::Config(format!("location {} not found", id))
                    })?;
                    vec![location]
                }
                None => writer.load_locations(limit).await?,
            };

            if locations.is_empty() {
                println!("No locations stored; run `tempo-processor seed-grid` first");
                return Ok(1);
            }

            println!(
                "Extracting {} location(s) over [{}, {})",
                locations.len(),
                start,
                stop
            );

            let client = HarmonyClient::from_settings(&settings)?;
            let catalog = GasCollectionCatalog::default();
            let extractor = LocationExtractor::new(&client, &catalog)
                .with_bbox_buffer(settings.extraction.bbox_buffer)
                .with_job_timeout(std::time::Duration::from_secs(
                    settings.extraction.job_timeout_secs,
                ))
                .with_output_format(settings.extraction.output_format.clone());
            let runner = BatchRunner::new(extractor, &writer);

            let cancel = CancelToken::new();
            spawn_ctrl_c_handler(cancel.clone());

            let progress =
                ProgressReporter::new(locations.len() as u64, "Extracting locations...", false);
            let summary = runner
                .run(&locations, start, stop, &cancel, Some(&progress))
                .await;
            progress.finish_with_message(&summary.summary_line());

            println!("{}", summary.summary_line());
            return Ok(summary.exit_code());
        }
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn spawn_ctrl_c_handler(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, finishing current location");
            cancel.cancel();
        }
    });
}
