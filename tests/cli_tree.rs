use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn command_tree_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    cmd.arg("tree").arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Average-linkage dendrogram"));
    Ok(())
}

#[test]
fn command_tree_two_pairs() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    let output = cmd
        .arg("tree")
        .arg("tests/data/four.fa")
        .arg("unit")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "(1,2);\n(3,4);\n");

    Ok(())
}

#[test]
fn command_tree_join_names() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    let output = cmd
        .arg("tree")
        .arg("tests/data/four.fa")
        .arg("unit")
        .arg("--join")
        .arg("--names")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "((S1,S2),(S3,S4));\n");

    Ok(())
}

#[test]
fn command_tree_quoted_names() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    let output = cmd
        .arg("tree")
        .arg("tests/data/named.fa")
        .arg("unit")
        .arg("--names")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "Mm;\n('Hs:chr1','Pt:chr1');\n");

    Ok(())
}

#[test]
fn command_tree_identical() -> anyhow::Result<()> {
    // every pair ties; the smallest pair wins each time
    for _ in 0..3 {
        let mut cmd = Command::cargo_bin("clustree")?;
        let output = cmd
            .arg("tree")
            .arg("tests/data/three.fa")
            .arg("unit")
            .output()?;
        let stdout = String::from_utf8(output.stdout)?;

        assert_eq!(stdout, "3;\n(1,2);\n");
    }

    Ok(())
}

#[test]
fn command_tree_merges() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    let output = cmd
        .arg("tree")
        .arg("tests/data/four.fa")
        .arg("unit")
        .arg("--merges")
        .arg("--join")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(
        stdout,
        "5\t1\t2\t1\t2\n6\t3\t4\t1\t2\n7\t5\t6\t7.5\t4\n"
    );

    Ok(())
}

#[test]
fn command_tree_maximize() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    let output = cmd
        .arg("tree")
        .arg("tests/data/four.fa")
        .arg("tests/data/similarity.txt")
        .arg("--maximize")
        .arg("--merges")
        .arg("--join")
        .arg("--names")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(
        stdout,
        "5\tS1\tS2\t21\t2\n6\tS3\tS4\t21\t2\n7\t5\t6\t1.5\t4\n"
    );

    Ok(())
}

#[test]
fn command_tree_outfile_parallel() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("tree.nwk");

    let mut cmd = Command::cargo_bin("clustree")?;
    cmd.arg("tree")
        .arg("tests/data/four.fa")
        .arg("tests/data/transition.txt")
        .arg("-p")
        .arg("4")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().success().stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read_to_string(&outfile)?, "(1,2);\n(3,4);\n");

    Ok(())
}

#[test]
fn command_tree_unknown_symbol() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    cmd.arg("tree").arg("tests/data/unknown.fa").arg("unit");
    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("no cost defined for symbol pair")
                .and(predicate::str::contains("'N'")),
        );
    Ok(())
}

#[test]
fn command_tree_verbose_logs_to_stderr() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("clustree")?;
    cmd.arg("tree")
        .arg("tests/data/four.fa")
        .arg("unit")
        .arg("-v")
        .env_remove("RUST_LOG");
    cmd.assert()
        .success()
        .stdout("(1,2);\n(3,4);\n")
        .stderr(predicate::str::contains("Merged 1 and 2 into 5"));
    Ok(())
}

#[test]
fn command_tree_error_leaves_no_outfile() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("tree.nwk");

    let mut cmd = Command::cargo_bin("clustree")?;
    cmd.arg("tree")
        .arg("tests/data/unknown.fa")
        .arg("unit")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().failure();

    assert!(!outfile.exists());

    Ok(())
}
