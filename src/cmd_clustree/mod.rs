//! Subcommand modules for the `clustree` binary.

pub mod align;
pub mod score;
pub mod tree;

use clap::*;
use clustree::libs::cost::{CostModel, Objective};
use clustree::libs::phylo::writer::quote_label;
use clustree::libs::phylo::NodeId;
use clustree::libs::seq::SeqSet;
use tracing::info;

pub fn arg_infile() -> Arg {
    Arg::new("infile")
        .required(true)
        .num_args(1)
        .index(1)
        .help("Input FASTA file. [stdin] for standard input")
}

pub fn arg_matrix() -> Arg {
    Arg::new("matrix")
        .required(true)
        .num_args(1)
        .index(2)
        .help("Cost matrix file, or the preset `unit`")
}

pub fn arg_maximize() -> Arg {
    Arg::new("maximize")
        .long("maximize")
        .action(ArgAction::SetTrue)
        .help("Treat matrix values as similarities: higher is better")
}

pub fn arg_gap() -> Arg {
    Arg::new("gap")
        .long("gap")
        .num_args(1)
        .value_parser(value_parser!(f64))
        .help("Linear gap cost for every symbol, replacing the matrix's gap row and column")
}

pub fn arg_names() -> Arg {
    Arg::new("names")
        .long("names")
        .action(ArgAction::SetTrue)
        .help("Label sequences by FASTA name instead of by id")
}

pub fn arg_parallel() -> Arg {
    Arg::new("parallel")
        .long("parallel")
        .short('p')
        .num_args(1)
        .default_value("1")
        .value_parser(value_parser!(usize))
        .help("Number of threads for the pairwise alignments")
}

pub fn arg_outfile() -> Arg {
    Arg::new("outfile")
        .short('o')
        .long("outfile")
        .num_args(1)
        .default_value("stdout")
        .help("Output filename. [stdout] for screen")
}

/// The cost model named by `matrix`, with `--gap` and `--maximize` applied.
pub fn load_cost(args: &ArgMatches) -> anyhow::Result<CostModel> {
    let matrix = args.get_one::<String>("matrix").unwrap();
    let mut cost = CostModel::from_name(matrix)?;

    if let Some(gap) = args.get_one::<f64>("gap") {
        cost.set_gap(*gap);
    }
    if args.get_flag("maximize") {
        cost = cost.with_objective(Objective::Maximize);
    }
    cost.validate()?;

    info!(
        "Cost matrix {} over {} symbols, {:?}",
        matrix,
        cost.alphabet().len(),
        cost.objective()
    );

    Ok(cost)
}

pub fn load_seqs(args: &ArgMatches) -> anyhow::Result<SeqSet> {
    let infile = args.get_one::<String>("infile").unwrap();
    let seqs = SeqSet::from_fasta(infile)?;
    info!("Read {} sequences from {}", seqs.len(), infile);
    Ok(seqs)
}

/// Sets the size of the global rayon pool. Returns whether more than one thread is used.
pub fn init_pool(args: &ArgMatches) -> anyhow::Result<bool> {
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;
    Ok(opt_parallel > 1)
}

/// Leaf labels: the id, or the quoted FASTA name with `--names`.
pub fn leaf_label<'a>(seqs: &'a SeqSet, args: &ArgMatches) -> impl Fn(NodeId) -> String + 'a {
    let by_name = args.get_flag("names");
    move |id| match seqs.get(id) {
        Some(seq) if by_name => quote_label(&seq.name),
        _ => id.to_string(),
    }
}
