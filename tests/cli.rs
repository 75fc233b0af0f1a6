//! Integration tests driving the pathnet binary on temporary tables.

use std::fs;
use std::path::Path;
use std::process::Command;

const NODES: &str = "name,SUID,TYPE,Pathway:glycolysis,Pathway:TCA\n\
                     glucose,1,compound,1,0\n\
                     pyruvate,2,compound,1,1\n\
                     ATP,3,common,0,0\n\
                     citrate,4,compound,0,1\n\
                     orphan,5,compound,0,0\n";

const EDGES: &str = "SOURCE,TARGET,relationship,pathway,SUID\n\
                     glucose,pyruvate,reaction,glycolysis,10\n\
                     pyruvate,citrate,activate,TCA,11\n\
                     glucose,pyruvate,reaction,glycolysis,12\n\
                     ATP,NADH,inhibit,,13\n";

fn run_in(dir: &Path, args: &[&str]) -> (String, String, i32) {
    // Tests must not depend on a user's pathnet.toml.
    let config = dir.join("pathnet.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let output = Command::new(env!("CARGO_BIN_EXE_pathnet"))
        .current_dir(dir)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute pathnet");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("node table.csv"), NODES).unwrap();
    fs::write(dir.path().join("edge table.csv"), EDGES).unwrap();
    dir
}

fn backups(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .contains("_backup")
        })
        .count()
}

#[test]
fn test_duplicates_report_highest_row() {
    let dir = workspace();
    let (stdout, _, code) = run_in(dir.path(), &["duplicates", "--brief"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Row 4"), "{}", stdout);
    assert!(stdout.contains("1 duplicate groups."));
}

#[test]
fn test_duplicates_remove_writes_backup_first() {
    let dir = workspace();
    let (_, stderr, code) = run_in(
        dir.path(),
        &["-y", "--backup-naming", "suffix", "duplicates", "--remove"],
    );
    assert_eq!(code, 0, "{}", stderr);
    let edges = fs::read_to_string(dir.path().join("edge table.csv")).unwrap();
    assert_eq!(edges.lines().count(), 4);
    assert!(!edges.contains(",12\n"));
    let backup = fs::read_to_string(dir.path().join("edge table_backup.csv")).unwrap();
    assert_eq!(backup, EDGES);
}

#[test]
fn test_declined_prompt_leaves_file_alone() {
    let dir = workspace();
    // stdin is empty, so the confirmation reads end of input
    let (stdout, _, code) = run_in(dir.path(), &["duplicates", "--remove"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Cancelled"));
    assert_eq!(fs::read_to_string(dir.path().join("edge table.csv")).unwrap(), EDGES);
    assert_eq!(backups(dir.path()), 0);
}

#[test]
fn test_missing_both_directions() {
    let dir = workspace();
    let (stdout, _, code) = run_in(dir.path(), &["missing"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Nodes used by no edge (1):\n  orphan"), "{}", stdout);
    assert!(stdout.contains("Edge endpoints missing from the node table (1):\n  NADH"));
}

#[test]
fn test_missing_prune_without_backup() {
    let dir = workspace();
    let (stdout, _, code) = run_in(dir.path(), &["-y", "--no-backup", "missing", "--prune"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Deleted row 6: orphan"));
    let nodes = fs::read_to_string(dir.path().join("node table.csv")).unwrap();
    assert!(!nodes.contains("orphan"));
    assert_eq!(backups(dir.path()), 0);
}

#[test]
fn test_sort_puts_common_first() {
    let dir = workspace();
    let (_, _, code) = run_in(dir.path(), &["-y", "--no-backup", "sort"]);
    assert_eq!(code, 0);
    let nodes = fs::read_to_string(dir.path().join("node table.csv")).unwrap();
    let second_line = nodes.lines().nth(1).unwrap();
    assert_eq!(second_line, "ATP,3,common,0,0");
}

#[test]
fn test_zeros_to_blank() {
    let dir = workspace();
    let (stdout, _, code) = run_in(dir.path(), &["-y", "--no-backup", "zeros"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("6 cells changed."), "{}", stdout);
    let nodes = fs::read_to_string(dir.path().join("node table.csv")).unwrap();
    assert!(nodes.contains("\nATP,3,common,,\n"));
}

#[test]
fn test_zeros_in_range_only() {
    let dir = workspace();
    let (stdout, _, code) = run_in(
        dir.path(),
        &["-y", "--no-backup", "zeros", "--range", "D1:D9"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("3 cells changed."), "{}", stdout);
    let nodes = fs::read_to_string(dir.path().join("node table.csv")).unwrap();
    assert!(nodes.contains("\nATP,3,common,,0\n"));
    assert!(nodes.contains("\nglucose,1,compound,1,0\n"));
}

#[test]
fn test_zeros_rejects_bad_range() {
    let dir = workspace();
    let (_, stderr, code) = run_in(dir.path(), &["zeros", "--range", "D:9"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid cell range"), "{}", stderr);
}

#[test]
fn test_layout_plan_and_ledger() {
    let dir = workspace();
    let (stdout, stderr, code) = run_in(
        dir.path(),
        &["layout", "--strategy", "circle", "-o", "plan.csv"],
    );
    assert_eq!(code, 0, "{}", stderr);
    assert!(stdout.contains("glycolysis: 2 placed, 0 already positioned"), "{}", stdout);
    assert!(stdout.contains("TCA: 1 placed, 1 already positioned"));

    let plan = fs::read_to_string(dir.path().join("plan.csv")).unwrap();
    assert!(plan.starts_with("name,x,y\n"));
    assert!(plan.contains("\ncitrate,2000,2000\n"));

    let ledger = fs::read_to_string(dir.path().join("positioned_nodes.txt")).unwrap();
    assert_eq!(ledger, "1\n2\n4\n");

    // a second run skips everything already positioned
    let (stdout, _, _) = run_in(dir.path(), &["layout", "--pathway", "TCA", "-o", "again.csv"]);
    assert!(stdout.contains("TCA: 0 placed, 2 already positioned"), "{}", stdout);
}

#[test]
fn test_style_json_plan() {
    let dir = workspace();
    let (stdout, _, code) = run_in(dir.path(), &["style", "--json"]);
    assert_eq!(code, 0);
    assert!(stdout.trim_start().starts_with('['));
    assert!(stdout.contains("\"EDGE_TARGET_ARROW_SHAPE\""));
    assert!(stdout.contains("\"element\": \"edge\""));
}

#[test]
fn test_export_markdown() {
    let dir = workspace();
    let (_, _, code) = run_in(dir.path(), &["export", "node table.csv", "-o", "nodes.md"]);
    assert_eq!(code, 0);
    let md = fs::read_to_string(dir.path().join("nodes.md")).unwrap();
    assert!(md.starts_with("# node table.csv"));
    assert!(md.contains("| 2 | glucose | 1 | compound | 1 | 0 |"));
}

#[test]
fn test_missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["repeats"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Failed to load node table.csv"), "{}", stderr);
}

#[cfg(unix)]
#[test]
fn test_batch_exit_code_reflects_failures() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = dir.path().join("scripts");
    fs::create_dir(&scripts).unwrap();
    fs::write(scripts.join("a.sh"), "exit 0\n").unwrap();
    fs::write(scripts.join("b.sh"), "exit 2\n").unwrap();

    let (stdout, _, code) = run_in(dir.path(), &["batch", "scripts"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("[1/2] a.sh"));
    assert!(stdout.contains("Succeeded: 1/2"));
}

#[test]
fn test_batch_rejects_unusable_delay() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("scripts")).unwrap();
    fs::write(dir.path().join("scripts").join("a.sh"), "touch ran\n").unwrap();

    let (_, stderr, code) = run_in(dir.path(), &["batch", "scripts", "--delay", "1e30"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid delay"), "{}", stderr);
    assert!(!dir.path().join("scripts").join("ran").exists());
}
