use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::info;
use logging::{Level, Logger};
use logic::Store;
use synthesis::{
    is_realizable_with_stats, BranchPolicy, Config, InputOutputPartition, OracleBackend, StateEquivalenceMode,
    DEFAULT_SIZE_BUDGET,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Hash,
    Bdd,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    TrueFirst,
    FalseFirst,
    Random,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Oracle {
    Bdd,
    Smt,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// LTLf formula given on the command line
    #[arg(short, long)]
    inline: Option<String>,

    /// File holding the LTLf formula
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Partition file with `.inputs:` and `.outputs:` lines
    #[arg(long)]
    part: PathBuf,

    /// Only accept non-empty traces
    #[arg(short, long)]
    no_empty: bool,

    /// How search states are identified
    #[arg(short, long, value_enum, default_value_t = Mode::Hash)]
    mode: Mode,

    /// Order in which variable values are tried
    #[arg(short, long, value_enum, default_value_t = Strategy::TrueFirst)]
    strategy: Strategy,

    /// Seed of the random branching order
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Race every mode and branching order in parallel
    #[arg(short = 't', long)]
    multithreaded: bool,

    /// One-step realizability back end
    #[arg(long, value_enum, default_value_t = Oracle::Bdd)]
    oracle: Oracle,

    /// Print progress
    #[arg(short, long)]
    verbose: bool,

    /// Name shown in front of every line
    #[arg(long)]
    name: Option<String>,

    /// Largest state formula searched in hash mode before switching to bdd
    #[arg(long, default_value_t = DEFAULT_SIZE_BUDGET)]
    size_budget: usize,
}

impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.inline.is_some() == self.file.is_some() {
            bail!("exactly one of an inline formula (-i, --inline) or a formula file (-f, --file) must be given");
        }
        if self.size_budget == 0 {
            bail!("the size budget (--size-budget) must be positive");
        }
        Ok(())
    }

    fn config(&self) -> Config {
        Config {
            mode: match self.mode {
                Mode::Hash => StateEquivalenceMode::Hash,
                Mode::Bdd => StateEquivalenceMode::Bdd,
            },
            branch: match self.strategy {
                Strategy::TrueFirst => BranchPolicy::TrueFirst,
                Strategy::FalseFirst => BranchPolicy::FalseFirst,
                Strategy::Random => BranchPolicy::Random { seed: self.seed },
            },
            multithreaded: self.multithreaded,
            size_budget: self.size_budget,
            oracle: match self.oracle {
                Oracle::Bdd => OracleBackend::Bdd,
                Oracle::Smt => OracleBackend::Smt,
            },
        }
    }
}

fn run(args: &Args, logger: &Logger) -> anyhow::Result<()> {
    args.validate()?;
    let now = Instant::now();

    let source = match (&args.inline, &args.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(file)) => fs::read_to_string(file)
            .with_context(|| format!("failed to read the formula file {}", file.display()))?,
        (None, None) => bail!("no formula given"),
    };
    let partition = InputOutputPartition::read_from_file(&args.part)
        .with_context(|| format!("failed to read the partition file {}", args.part.display()))?;

    let mut store = Store::new();
    let mut formula = parser::parse_formula(&mut store, source.trim()).context("failed parsing the formula")?;
    if args.no_empty {
        let not_end = store.make_not_end();
        formula = store.make_and(vec![formula, not_end]);
    }
    // printing the formula walks all of it
    if logger.get_mode() {
        logger.log(&format!("formula: {}", logic::to_string(&store, formula)), Level::Info as i8);
        logger.log(
            &format!(
                "inputs: {:?}, outputs: {:?}",
                partition.input_variables, partition.output_variables
            ),
            Level::Info as i8,
        );
    }

    let config = args.config();
    info!("configuration: {:?}", config);
    let (verdict, statistics) =
        is_realizable_with_stats(&mut store, formula, &partition, &config).context("synthesis failed")?;

    logger.report(if verdict { "realizable" } else { "unrealizable" });
    logger.report(&format!("visited states: {}", statistics.visited_states));
    logger.log(&format!("{}", statistics), Level::Info as i8);
    logger.log(
        &format!("finished in {} s", now.elapsed().as_micros() as f64 / 1_000_000.0),
        Level::Completed as i8,
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut logger = Logger::new(args.verbose, Level::Info as i32);
    if let Some(name) = &args.name {
        logger = logger.with_name(name);
    }
    if let Err(error) = run(&args, &logger) {
        logger.raise_error(&format!("{:#}", error), Level::Fatal as i8);
    }
}
