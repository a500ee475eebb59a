use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use u_rescue::config::{TripVariant, ValidatorConfig, MAX_CAPACITY};
use u_rescue::logging;
use u_rescue::models::Instance;
use u_rescue::runner::{PlanRunner, RunReport};

/// Validates an ambulance rescue plan and prints its score
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Problem instance file (people and hospitals)
    instance: PathBuf,

    /// Plan file; reads stdin when omitted or "-"
    plan: Option<PathBuf>,

    /// Trip record convention
    #[arg(long, value_enum, default_value_t = VariantArg::Nearest)]
    variant: VariantArg,

    /// Maximum people per trip (1 to 4)
    #[arg(long, default_value_t = MAX_CAPACITY, value_parser = parse_capacity)]
    capacity: usize,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// One hospital per trip; unload at the nearest hospital
    Nearest,
    /// Start and end hospital per trip; ambulances move to the end hospital
    ExplicitEnd,
}

impl From<VariantArg> for TripVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Nearest => Self::ReturnToNearest,
            VariantArg::ExplicitEnd => Self::ExplicitEnd,
        }
    }
}

fn parse_capacity(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_CAPACITY).contains(&n) {
        Ok(n)
    } else {
        Err(format!("capacity must be between 1 and {MAX_CAPACITY}"))
    }
}

fn run_plan(runner: &mut PlanRunner, plan: Option<&PathBuf>) -> Result<RunReport> {
    match plan {
        Some(path) if path.as_os_str() != "-" => {
            info!("Reading results: {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("cannot open plan {}", path.display()))?;
            runner
                .run(BufReader::new(file))
                .with_context(|| format!("cannot read plan {}", path.display()))
        }
        _ => {
            info!("Reading results from stdin...");
            runner.run(io::stdin().lock()).context("cannot read plan from stdin")
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    info!("Reading data: {}", args.instance.display());
    let instance = Instance::from_path(&args.instance)
        .with_context(|| format!("cannot load instance {}", args.instance.display()))?;

    let config = ValidatorConfig::new()
        .with_variant(args.variant.into())
        .with_capacity(args.capacity);
    info!("Trip variant: {}, capacity {}", config.variant, config.capacity);
    let mut runner = PlanRunner::new(instance, config);
    let report = run_plan(&mut runner, args.plan.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Total score: {}", report.score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::smallest("1", Ok(1))]
    #[case::largest("4", Ok(4))]
    #[case::zero("0", Err(()))]
    #[case::too_many("5", Err(()))]
    #[case::not_a_number("four", Err(()))]
    fn test_parse_capacity(#[case] input: &str, #[case] expected: Result<usize, ()>) {
        assert_eq!(parse_capacity(input).map_err(|_| ()), expected);
    }

    #[test]
    fn test_capacity_flag_rejects_zero() {
        let parsed = Args::try_parse_from(["u-rescue", "instance.txt", "--capacity", "0"]);
        assert!(parsed.is_err());
        let args = Args::try_parse_from(["u-rescue", "instance.txt"]).unwrap();
        assert_eq!(args.capacity, MAX_CAPACITY);
    }
}
