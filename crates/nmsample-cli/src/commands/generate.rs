use super::prepare_generator;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use nmsample::core::io::traits::MolecularFile;
use nmsample::core::io::xyz::{XyzFile, XyzMetadata};
use nmsample::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

#[derive(Debug, Serialize)]
struct ManifestRecord {
    index: usize,
    ensemble: String,
    parameter: f64,
    seed: u64,
}

pub fn run(args: GenerateArgs, progress_handler: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    run_with_reporter(args, &reporter)
}

fn run_with_reporter(args: GenerateArgs, reporter: &ProgressReporter<'_>) -> Result<()> {
    reporter.report(Progress::PhaseStart {
        name: "Preparing generator",
    });
    let (generator, run) = prepare_generator(&args.generator, args.seed)?;
    let num_configs = run.num_configs.ok_or_else(|| {
        CliError::Config(
            "The number of configurations is required: pass --num-configs or set `generator.num-configs`."
                .to_string(),
        )
    })?;

    info!("Loading equilibrium geometry from {:?}", &args.geometry);
    let (molecule, _) = XyzFile::read_from_path(&args.geometry).map_err(|e| {
        CliError::FileParsing {
            path: args.geometry.clone(),
            source: e.into(),
        }
    })?;

    let configs = generator
        .generate_configurations(&molecule, num_configs, run.seed)?
        .with_reporter(reporter);
    let seed = configs.seed();
    reporter.report(Progress::Message(format!("Using seed {}", seed)));
    reporter.report(Progress::PhaseFinish);

    let write_error = |e: std::io::Error| CliError::FileWriting {
        path: args.output.clone(),
        source: e.into(),
    };
    let mut writer = BufWriter::new(File::create(&args.output).map_err(write_error)?);
    let mut manifest = match &args.manifest {
        Some(path) => Some(csv::Writer::from_path(path)?),
        None => None,
    };

    let mut written = 0;
    for configuration in configs {
        let configuration = configuration?;
        let metadata = XyzMetadata {
            comment: format!(
                "config {} {} = {:.10e} seed {}",
                configuration.index, configuration.ensemble, configuration.parameter, seed
            ),
        };
        XyzFile::write_to(&configuration.molecule, &metadata, &mut writer).map_err(|e| {
            CliError::FileWriting {
                path: args.output.clone(),
                source: e.into(),
            }
        })?;

        if let Some(manifest) = manifest.as_mut() {
            manifest.serialize(ManifestRecord {
                index: configuration.index,
                ensemble: configuration.ensemble.to_string(),
                parameter: configuration.parameter,
                seed,
            })?;
        }
        written += 1;
    }

    writer.flush().map_err(write_error)?;
    if let Some(mut manifest) = manifest {
        manifest.flush()?;
    }

    info!("Wrote {} configurations to {:?}", written, &args.output);
    println!(
        "✓ {} configuration(s) written to: {} (seed {})",
        written,
        args.output.display(),
        seed
    );
    Ok(())
}
