use clap::*;
use clustree::libs::align::Aligner;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("align")
        .about("Global alignment of two sequences")
        .after_help(
            r###"
Aligns two sequences end to end and prints the optimal score followed by the alignment.

Output:
* score<TAB>value
* the first sequence, gaps as `-`
* markup: `|` match, `.` mismatch, space for a gap
* the second sequence, gaps as `-`

Notes:
* Sequences are picked by id, their position in the FASTA file starting at 1
* Letters are case-insensitive

Examples:
1. The first two sequences, edit distance:
   clustree align input.fa unit

2. Sequences 3 and 5 under a similarity matrix:
   clustree align input.fa blosum.txt --first 3 --second 5 --maximize
"###,
        )
        .arg(super::arg_infile())
        .arg(super::arg_matrix())
        .arg(
            Arg::new("first")
                .long("first")
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Id of the first sequence"),
        )
        .arg(
            Arg::new("second")
                .long("second")
                .num_args(1)
                .default_value("2")
                .value_parser(value_parser!(usize))
                .help("Id of the second sequence"),
        )
        .arg(super::arg_maximize())
        .arg(super::arg_gap())
        .arg(super::arg_outfile())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let opt_first = *args.get_one::<usize>("first").unwrap();
    let opt_second = *args.get_one::<usize>("second").unwrap();

    let cost = super::load_cost(args)?;
    let seqs = super::load_seqs(args)?;

    let first = seqs
        .get(opt_first)
        .ok_or_else(|| anyhow::anyhow!("sequence {} not found", opt_first))?;
    let second = seqs
        .get(opt_second)
        .ok_or_else(|| anyhow::anyhow!("sequence {} not found", opt_second))?;

    let aln = Aligner::new(&cost).align(&first.symbols, &second.symbols)?;

    let mut writer = clustree::writer(args.get_one::<String>("outfile").unwrap())?;
    writer.write_fmt(format_args!("score\t{}\n", aln.score))?;
    writer.write_all(aln.to_text().as_ref())?;

    Ok(())
}
