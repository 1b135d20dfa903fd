use clap::*;
use clustree::libs::hclust::{cluster, ClusterOptions};
use clustree::libs::phylo::writer::{write_merges_with, write_newick_with};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("tree")
        .about("Average-linkage dendrogram of all sequences")
        .after_help(
            r###"
Clusters sequences by repeatedly merging the best-scoring pair of clusters.
The score between a new cluster and any other is the mean of its children's scores.

Output:
* Default: Newick topology, one line per top-level cluster
* --merges: one line per merge, in merge order

    id<TAB>left<TAB>right<TAB>score<TAB>size

Notes:
* Leaves are numbered by FASTA position starting at 1; merged clusters get the next free ids
* Clustering stops with two clusters left; --join merges those as well
* Ties are broken by the smaller pair of ids

Examples:
1. Edit-distance tree:
   clustree tree input.fa unit

2. A single rooted tree labelled by name:
   clustree tree input.fa unit --join --names

3. Merge table with 8 threads for the alignments:
   clustree tree input.fa matrix.txt --merges -p 8 -o merges.tsv
"###,
        )
        .arg(super::arg_infile())
        .arg(super::arg_matrix())
        .arg(super::arg_maximize())
        .arg(super::arg_gap())
        .arg(super::arg_names())
        .arg(
            Arg::new("join")
                .long("join")
                .action(ArgAction::SetTrue)
                .help("Merge the last two clusters into a single root"),
        )
        .arg(
            Arg::new("merges")
                .long("merges")
                .action(ArgAction::SetTrue)
                .help("Print the merge table instead of Newick"),
        )
        .arg(super::arg_parallel())
        .arg(super::arg_outfile())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let options = ClusterOptions {
        join_roots: args.get_flag("join"),
        parallel: super::init_pool(args)?,
    };
    let cost = super::load_cost(args)?;
    let seqs = super::load_seqs(args)?;
    let label = super::leaf_label(&seqs, args);

    let tree = cluster(&seqs, &cost, options)?;

    let out_string = if args.get_flag("merges") {
        write_merges_with(&tree, &label)
    } else {
        write_newick_with(&tree, &label)?
    };

    let mut writer = clustree::writer(args.get_one::<String>("outfile").unwrap())?;
    writer.write_all(out_string.as_ref())?;

    Ok(())
}
