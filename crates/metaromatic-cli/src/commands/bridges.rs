use super::{Target, bridges_for_target, progress_handler};
use crate::cli::BridgesArgs;
use crate::config::models::AppConfig;
use crate::error::Result;
use crate::utils::table::format_bridges;
use metaromatic::engine::config::DEFAULT_BRIDGE_SIZE;
use metaromatic::engine::error::DetectionError;
use metaromatic::engine::progress::ProgressReporter;
use tracing::info;

pub async fn run(args: BridgesArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let target = Target::resolve(&args.target);
    let size = args
        .size
        .or(config.bridge_size)
        .unwrap_or(DEFAULT_BRIDGE_SIZE);
    info!("Searching {} for {}-residue bridges.", target.label(), size);

    let progress_handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result =
        tokio::task::block_in_place(|| bridges_for_target(&target, config, size, &reporter));
    let bridges = match result {
        Ok(found) => found,
        Err(DetectionError::NoInteractions) => {
            println!("No Met-aromatic interactions found in {}.", target.label());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if bridges.is_empty() {
        println!("No {}-residue bridges found in {}.", size, target.label());
    } else {
        print!("{}", format_bridges(&bridges));
        println!("{} bridge(s) of size {} found.", bridges.len(), size);
    }
    Ok(())
}
