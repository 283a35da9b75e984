use super::{Target, detect_target, progress_handler};
use crate::cli::QueryArgs;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::table::{format_interactions, format_kind_counts};
use metaromatic::core::io::table::write_interactions_to_path;
use metaromatic::engine::error::DetectionError;
use metaromatic::engine::progress::ProgressReporter;
use metaromatic::engine::tasks::interactions::count_by_kind;
use tracing::{info, warn};

pub async fn run(args: QueryArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let target = Target::resolve(&args.target);
    info!(
        "Detecting interactions in {} (chain {}, {} Å, {}°, model {}).",
        target.label(),
        config.detection.chain,
        config.detection.cutoff_distance,
        config.detection.cutoff_angle,
        config.detection.model
    );

    let progress_handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = tokio::task::block_in_place(|| detect_target(&target, config, &reporter));
    let interactions = match result {
        Ok(found) => found,
        Err(DetectionError::NoInteractions) => {
            warn!("No interactions passed the cutoffs for {}.", target.label());
            println!("No Met-aromatic interactions found in {}.", target.label());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print!("{}", format_interactions(&interactions));
    println!(
        "{} interaction(s) found ({}).",
        interactions.len(),
        format_kind_counts(&count_by_kind(&interactions))
    );

    if let Some(path) = &args.csv {
        info!("Writing interaction table to {:?}", path);
        write_interactions_to_path(&interactions, path).map_err(|e| CliError::Output {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Interactions written to: {}", path.display());
    }

    Ok(())
}
