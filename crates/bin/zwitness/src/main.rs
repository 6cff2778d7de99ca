use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use zeratul_witness::{
    circuits::Multiplier3, parse_inputs_json, CompiledCircuit, Fr, WitnessCalculator, WitnessConfig,
};

#[derive(Parser, Debug)]
#[command(name = "zwitness")]
#[command(about = "compute a circuit witness from json inputs", long_about = None)]
struct Args {
    /// json file mapping main input names to values
    #[arg(long, short)]
    input: PathBuf,

    /// where to write the witness (json array of decimal strings); stdout if unset
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// toml runtime config
    #[arg(long, env = "ZWITNESS_CONFIG")]
    config: Option<PathBuf>,

    /// run subcomponents marked parallel on worker threads
    #[arg(long)]
    parallel: bool,

    /// compiled circuit to run
    #[arg(long, value_enum, default_value_t = Circuit::Multiplier3)]
    circuit: Circuit,

    /// pretty-print the witness json
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Circuit {
    Multiplier3,
}

impl Circuit {
    fn compiled(self, parallel: bool) -> Arc<dyn CompiledCircuit<Fr>> {
        match self {
            Circuit::Multiplier3 if parallel => Arc::new(Multiplier3::parallel()),
            Circuit::Multiplier3 => Arc::new(Multiplier3::new()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zwitness=info,zeratul_witness=info".into()),
        )
        .init();

    let args = Args::parse();
    let witness = run(&args)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &witness)
                .with_context(|| format!("failed to write witness to {}", path.display()))?;
            info!("wrote witness to {}", path.display());
        }
        None => println!("{}", witness),
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<WitnessConfig> {
    let mut config = match &args.config {
        Some(path) => WitnessConfig::load(path)?,
        None => WitnessConfig::default(),
    };
    if args.parallel {
        config.parallel = true;
    }
    Ok(config)
}

/// compute the witness json for the given arguments
fn run(args: &Args) -> Result<String> {
    let config = load_config(args)?;
    let circuit = args.circuit.compiled(config.parallel);

    info!("circuit: {}", circuit.name());
    info!("input: {}", args.input.display());
    info!("parallel: {}", config.parallel);

    let inputs = parse_inputs_json(&read_input(&args.input)?)?;
    let calculator = WitnessCalculator::from_arc(circuit, config);
    let calculation = calculator.run(&inputs)?;

    info!(
        "witness: {} elements, {} components run, {} released",
        calculation.witness.len(),
        calculation.stats.components_run,
        calculation.stats.releases
    );

    Ok(if args.pretty {
        calculation.witness.to_json_pretty()
    } else {
        calculation.witness.to_json()
    })
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read input {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &Path, input: &str) -> Args {
        let path = dir.join("input.json");
        std::fs::write(&path, input).unwrap();
        Args {
            input: path,
            output: None,
            config: None,
            parallel: false,
            circuit: Circuit::Multiplier3,
            pretty: false,
        }
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["zwitness", "--input", "in.json", "--parallel"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert!(args.parallel);
        assert_eq!(args.circuit, Circuit::Multiplier3);

        let args =
            Args::try_parse_from(["zwitness", "-i", "in.json", "--circuit", "multiplier3"]).unwrap();
        assert!(!args.parallel);
        assert!(Args::try_parse_from(["zwitness", "-i", "in.json", "--circuit", "sha256"]).is_err());
    }

    #[test]
    fn test_run_multiplier() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), r#"{"in": ["2", "3", "5"]}"#);
        assert_eq!(run(&args).unwrap(), r#"["1","30","2","3","5","6"]"#);
    }

    #[test]
    fn test_run_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("zwitness.toml");
        std::fs::write(&config, "parallel = true\n").unwrap();

        let mut args = args(dir.path(), r#"{"in": [7, 11, 13]}"#);
        args.config = Some(config);
        assert!(load_config(&args).unwrap().parallel);
        assert_eq!(run(&args).unwrap(), r#"["1","1001","7","11","13","77"]"#);
    }

    #[test]
    fn test_run_reports_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), r#"{"in": [1, 2]}"#);
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("expects 3 values"));

        let missing = Args {
            input: dir.path().join("absent.json"),
            ..args
        };
        assert!(run(&missing).unwrap_err().to_string().contains("failed to read input"));
    }
}
