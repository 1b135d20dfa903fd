use clap::*;
use clustree::libs::hclust::{ClusterEngine, ClusterOptions};
use itertools::Itertools;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("score")
        .about("Alignment scores of all sequence pairs")
        .after_help(
            r###"
Aligns every unordered pair of sequences once and prints one line per pair:

    first<TAB>second<TAB>score

Notes:
* Pairs are listed in id order, the smaller id first
* The smaller id is aligned as the first sequence

Examples:
1. Edit distances of all pairs, 4 threads:
   clustree score input.fa unit -p 4

2. Label pairs by sequence name, gap cost 2:
   clustree score input.fa matrix.txt --gap 2 --names
"###,
        )
        .arg(super::arg_infile())
        .arg(super::arg_matrix())
        .arg(super::arg_maximize())
        .arg(super::arg_gap())
        .arg(super::arg_names())
        .arg(super::arg_parallel())
        .arg(super::arg_outfile())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let options = ClusterOptions {
        parallel: super::init_pool(args)?,
        ..Default::default()
    };
    let cost = super::load_cost(args)?;
    let seqs = super::load_seqs(args)?;
    let label = super::leaf_label(&seqs, args);

    let engine = ClusterEngine::seed(&seqs, &cost, options)?;

    let mut writer = clustree::writer(args.get_one::<String>("outfile").unwrap())?;
    for (i, j) in seqs.ids().tuple_combinations() {
        let score = engine.store().get(i, j)?;
        writer.write_fmt(format_args!("{}\t{}\t{}\n", label(i), label(j), score))?;
    }

    Ok(())
}
