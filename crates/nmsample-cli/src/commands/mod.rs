pub mod generate;
pub mod inspect;

use crate::cli::GeneratorArgs;
use crate::config::{FileConfig, RunConfig};
use crate::error::Result;
use nmsample::core::settings::Settings;
use nmsample::engine::error::GenerationError;
use nmsample::workflows::generate::NormalModesGenerator;
use tracing::info;

/// Merges the run config with CLI overrides and builds the generator.
fn prepare_generator(
    args: &GeneratorArgs,
    cli_seed: Option<u64>,
) -> Result<(NormalModesGenerator, RunConfig)> {
    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let run = file_config.merge_with_cli(args, cli_seed)?;

    info!("Loading settings from {:?}", &args.settings);
    let settings = Settings::load(&args.settings).map_err(GenerationError::from)?;

    let generator = NormalModesGenerator::new(&settings, &args.normal_modes, run.generator.clone())?;
    Ok((generator, run))
}
