extern crate clap;
use clap::*;
use tracing_subscriber::EnvFilter;

mod cmd_clustree;

fn main() -> anyhow::Result<()> {
    let app = Command::new("clustree")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`clustree` - Sequence dendrograms from pairwise global alignments")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log merge steps to stderr"),
        )
        .subcommand(cmd_clustree::align::make_subcommand())
        .subcommand(cmd_clustree::score::make_subcommand())
        .subcommand(cmd_clustree::tree::make_subcommand())
        .after_help(
            r###"Subcommands:

* align - Global alignment of two sequences
* score - Alignment scores of all sequence pairs
* tree  - Average-linkage dendrogram of all sequences

Matrices:
* `unit` - Edit distance over ACGT
* Any other value is read as a cost-matrix file

Logging:
* `-v` shows progress and every merge
* RUST_LOG overrides the filter, e.g. RUST_LOG=clustree=trace

"###,
        );

    let matches = app.get_matches();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if matches.get_flag("verbose") {
            EnvFilter::new("clustree=debug,info")
        } else {
            EnvFilter::new("clustree=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match matches.subcommand() {
        Some(("align", sub_matches)) => cmd_clustree::align::execute(sub_matches),
        Some(("score", sub_matches)) => cmd_clustree::score::execute(sub_matches),
        Some(("tree", sub_matches)) => cmd_clustree::tree::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
