use super::prepare_generator;
use crate::cli::InspectArgs;
use crate::error::Result;
use nmsample::core::distribution::DistributionFunction;
use nmsample::workflows::generate::NormalModesGenerator;
use std::fmt::Write as _;
use tracing::{info, warn};

pub fn run(args: InspectArgs) -> Result<()> {
    let (generator, run) = prepare_generator(&args.generator, None)?;
    let report = render_report(&generator, run.num_configs)?;
    print!("{}", report);
    Ok(())
}

fn describe(function: Option<&DistributionFunction>, dependent: &str) -> String {
    match function {
        Some(f) => f.describe(dependent),
        None => format!("{} = (none)", dependent),
    }
}

/// Builds the human-readable summary printed by `nmsample inspect`.
fn render_report(generator: &NormalModesGenerator, num_configs: Option<usize>) -> Result<String> {
    let table = generator.table();
    let units = generator.units();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Normal modes: {} ({} atoms, {} negative frequencies)",
        table.len(),
        table.num_atoms(),
        table.negative_frequency_count()
    );
    for (i, mode) in table.modes().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}  {:>12.4} cm-1  reduced mass {:>8.4}",
            i + 1,
            mode.frequency * units.hartree_to_wavenumber,
            mode.reduced_mass
        );
    }

    match generator.validate_mode_count() {
        Ok(()) => {
            let _ = writeln!(out, "Mode count: ok");
        }
        Err(e) => {
            warn!("Mode count check failed: {}", e);
            let _ = writeln!(out, "Mode count: {}", e);
        }
    }

    let _ = writeln!(
        out,
        "Temperature distribution: {}",
        describe(generator.temp_distribution(), "temp")
    );
    let _ = writeln!(
        out,
        "Amplitude distribution:   {}",
        describe(generator.a_distribution(), "A")
    );

    if let Some(n) = num_configs {
        info!("Computing sampling schedule for {} configurations.", n);
        let schedule = generator.schedule(n)?;
        let _ = writeln!(out, "Schedule ({} configs):", schedule.len());
        for (i, planned) in schedule.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>5}  {:<11}  x = {:.4}  parameter = {:.6e}",
                i, planned.ensemble, planned.x, planned.parameter
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::CliError;
    use tempfile::tempdir;

    #[test]
    fn report_lists_modes_distributions_and_schedule() {
        let dir = tempdir().unwrap();
        let args = fixtures::write_inputs(dir.path());
        let (generator, _) = prepare_generator(&args, None).unwrap();

        let report = render_report(&generator, Some(3)).unwrap();
        assert!(report.starts_with("Normal modes: 3 (3 atoms, 0 negative frequencies)"));
        assert!(report.contains("1595.0000 cm-1"));
        assert!(report.contains("Mode count: ok"));
        assert!(report.contains("Temperature distribution: temp = ("));
        assert!(report.contains("A = (none)"));
        assert!(report.contains("Schedule (3 configs):"));
        assert_eq!(report.matches("temperature").count(), 3);
    }

    #[test]
    fn report_without_count_skips_schedule() {
        let dir = tempdir().unwrap();
        let mut args = fixtures::write_inputs(dir.path());
        args.family.linear = true;
        let (generator, _) = prepare_generator(&args, None).unwrap();
        let report = render_report(&generator, None).unwrap();
        assert!(report.contains("A = 2 * x + 0"));
        assert!(!report.contains("Schedule"));
    }

    #[test]
    fn legacy_single_config_schedule_fails() {
        let dir = tempdir().unwrap();
        let mut args = fixtures::write_inputs(dir.path());
        args.legacy = true;
        let (generator, _) = prepare_generator(&args, None).unwrap();
        assert!(matches!(render_report(&generator, Some(1)), Err(CliError::Core(_))));
    }

    #[test]
    fn run_accepts_inputs() {
        let dir = tempdir().unwrap();
        let mut generator = fixtures::write_inputs(dir.path());
        generator.num_configs = Some(2);
        run(InspectArgs { generator }).unwrap();
    }
}
