//! End-to-end pipeline tests against a scripted analyzer

mod support;

use skelcheck::{
    PipelineError, PipelineOrchestrator, RunOutcome, SkelcheckConfig, VerifyRequest,
};
use std::fs;
use std::path::PathBuf;
use support::Workspace;

fn config(ws: &Workspace, extension: &str, workers: usize) -> SkelcheckConfig {
    SkelcheckConfig {
        analyzer: PathBuf::from("/bin/sh"),
        analyzer_args: vec![ws.analyzer_script().display().to_string()],
        analyzer_debug: false,
        analyzer_timeout_secs: 30,
        workers,
        formatter: PathBuf::from("/nonexistent/gofmt"),
        extension: extension.to_string(),
        var_prefix: "racyVar".to_string(),
        log_level: "info".to_string(),
    }
}

fn request(ws: &Workspace, normalize: bool) -> VerifyRequest {
    VerifyRequest {
        input_dir: ws.root().to_path_buf(),
        combined_file: ws.combined(),
        output_csv: ws.csv(),
        normalize,
    }
}

async fn run(ws: &Workspace, extension: &str, workers: usize) -> RunOutcome {
    PipelineOrchestrator::from_config(config(ws, extension, workers))
        .execute(&request(ws, false))
        .await
        .expect("pipeline should succeed")
}

#[tokio::test]
async fn test_read_write_pair_with_analyzer_write() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar1 = 5\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");

    let outcome = run(&ws, "src", 4).await;

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.len(), 19);
    assert_eq!(row[0], "D1");
    assert_eq!(row[1], "a.src");
    assert_eq!(row[2], "TRUE");
    assert_eq!(row[3], "racyVar1 = 5");
    assert_eq!(row[5], "b.src");
    assert_eq!(row[6], "FALSE");
    assert_eq!(row[9], "TRUE");
    assert_eq!(row[10], "read-write");

    assert_eq!(outcome.summary.read_write, 1);
    assert_eq!(outcome.summary.write_write, 0);
    assert_eq!(outcome.summary.cases_with_pattern_issues, 0);
}

#[tokio::test]
async fn test_write_write_pair() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar2 = 1\n");
    ws.fragment("D1", "b.src", "racyVar2 = 2\n");

    run(&ws, "src", 2).await;

    let rows = ws.csv_rows();
    assert_eq!(rows[0][10], "write-write");
    assert_eq!(rows[0][2], "TRUE");
    assert_eq!(rows[0][6], "TRUE");
}

#[tokio::test]
async fn test_three_fragment_directory_is_excluded() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar1 = 5\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");
    for name in ["a.src", "b.src", "c.src"] {
        ws.fragment("D2", name, "racyVar1 = 1\n");
    }

    let outcome = run(&ws, "src", 4).await;

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|r| r[0] != "D2"));
    assert_eq!(outcome.summary.excluded(), 1);
    assert_eq!(outcome.summary.excluded_cases[0].found, 3);
    assert_eq!(outcome.summary.fragments_analyzed, 2);
}

#[tokio::test]
async fn test_analyzer_failure_keeps_row() {
    let ws = Workspace::new();
    ws.fragment("D1", "fail.src", "racyVar1 = 5\n");
    ws.fragment("D1", "ok.src", "racyVar1 = 6\n");
    ws.fragment("D2", "a.src", "racyVar3 = 1\n");
    ws.fragment("D2", "b.src", "print(racyVar3)\n");

    let outcome = run(&ws, "src", 4).await;

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 2);

    let d1 = &rows[0];
    assert_eq!(d1[0], "D1");
    assert_eq!(d1[2], "ERROR");
    assert!(d1[4].starts_with("Error analyzing file:"), "error column: {}", d1[4]);
    assert!(d1[4].ends_with("expected declaration"));
    assert_eq!(d1[6], "TRUE");
    assert_eq!(d1[8], "");
    assert_eq!(d1[9], "TRUE");
    assert_eq!(d1[10], "write-write");

    assert_eq!(rows[1][0], "D2");
    assert_eq!(rows[1][2], "TRUE");
    assert_eq!(outcome.summary.analyzer_failures, 1);
}

#[tokio::test]
async fn test_rerun_produces_identical_report() {
    let ws = Workspace::new();
    for case in ["D1", "D2", "D3"] {
        ws.fragment(case, "read.src", "print(racyVar1)\n");
        ws.fragment(case, "write.src", "racyVar1 = 1\n");
    }

    run(&ws, "src", 3).await;
    let first = fs::read(ws.csv()).unwrap();
    run(&ws, "src", 3).await;
    let second = fs::read(ws.csv()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_worker_count_does_not_change_report() {
    let ws = Workspace::new();
    for i in 0..6 {
        let case = format!("D{}", i);
        ws.fragment(&case, "a.src", &format!("racyVar{} = {}\n", i, i));
        ws.fragment(&case, "b.src", &format!("use(racyVar{})\n", i));
    }

    run(&ws, "src", 1).await;
    let serial = fs::read(ws.csv()).unwrap();
    run(&ws, "src", 8).await;
    let parallel = fs::read(ws.csv()).unwrap();

    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn test_pattern_issues_are_advisory() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "x = 1\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");

    let outcome = run(&ws, "src", 2).await;

    assert_eq!(outcome.summary.cases_with_pattern_issues, 1);
    assert_eq!(outcome.summary.pattern_issues[0].missing, vec!["a.src"]);
    assert_eq!(ws.csv_rows().len(), 1);
}

#[tokio::test]
async fn test_combined_file_lists_every_fragment() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar1 = 5\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");
    ws.fragment("D2", "only.src", "racyVar2 = 1\n");

    let outcome = run(&ws, "src", 2).await;

    let combined = fs::read_to_string(ws.combined()).unwrap();
    assert_eq!(outcome.summary.combined_fragments, 3);
    assert!(combined.contains(&format!("// {}\n", ws.root().join("D2/only.src").display())));
}

#[tokio::test]
async fn test_normalization_before_discovery() {
    let ws = Workspace::new();
    ws.fragment("D1", "Read_1", "func f() {\n\tprint(racyVar1) // read\n}\n");
    ws.fragment("D1", "WRITE_1.go", "package main\n\nfunc g() {\n\tracyVar1 = 2\n}\n");

    let outcome = PipelineOrchestrator::from_config(config(&ws, "go", 2))
        .execute(&request(&ws, true))
        .await
        .unwrap();

    let summary = &outcome.summary;
    assert!(summary.normalized);
    assert!(!summary.formatter_available);
    assert_eq!(summary.files_renamed, 2);
    assert_eq!(summary.package_updates, 1);
    assert_eq!(summary.parse_errors, 0);

    let read = fs::read_to_string(ws.root().join("D1/read1.go")).unwrap();
    assert!(read.starts_with("package main\n\n"));
    assert!(!read.contains("// read"));

    let rows = ws.csv_rows();
    assert_eq!(rows[0][1], "read1.go");
    assert_eq!(rows[0][5], "write1.go");
    assert_eq!(rows[0][6], "TRUE");
    assert_eq!(rows[0][3], "");
    assert_eq!(rows[0][7], "racyVar1 = 2");
    assert_eq!(rows[0][15], "TRUE");
    assert_eq!(rows[0][17], "FALSE");
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_fragment_does_not_abort_run() {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar1 = 5\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");
    ws.fragment("D2", "a.src", "racyVar2 = 1\n");
    let locked = ws.fragment("D2", "b.src", "racyVar2 = 2\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let readable = fs::read(&locked).is_ok();

    let result = PipelineOrchestrator::from_config(config(&ws, "src", 2))
        .execute(&request(&ws, false))
        .await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let outcome = result.expect("an unreadable fragment must not end the run");
    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "D1");
    assert_eq!(rows[1][0], "D2");
    assert!(ws.combined().exists());
    if !readable {
        assert_eq!(outcome.summary.combined_skipped, 1);
        assert_eq!(outcome.summary.combined_fragments, 3);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_case_is_discovered() {
    let ws = Workspace::new();
    let real = ws.scratch.path().join("real_case");
    fs::create_dir_all(&real).unwrap();
    fs::write(real.join("a.src"), "racyVar1 = 5\n").unwrap();
    fs::write(real.join("b.src"), "print(racyVar1)\n").unwrap();
    std::os::unix::fs::symlink(&real, ws.root().join("D1")).unwrap();

    let outcome = run(&ws, "src", 2).await;

    assert_eq!(outcome.summary.subdirectories, 1);
    assert_eq!(outcome.summary.valid_cases, 1);
    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "D1");
    assert_eq!(rows[0][2], "TRUE");
    assert_eq!(rows[0][10], "read-write");
}

#[tokio::test]
async fn test_missing_root_aborts() {
    let ws = Workspace::new();
    let mut req = request(&ws, true);
    req.input_dir = ws.root().join("nope");

    let err = PipelineOrchestrator::from_config(config(&ws, "go", 2))
        .execute(&req)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Discovery(_)));
    assert!(!ws.csv().exists());
}

#[tokio::test]
async fn test_missing_analyzer_reports_errors_for_every_fragment() {
    let ws = Workspace::new();
    ws.fragment("D1", "a.src", "racyVar1 = 5\n");
    ws.fragment("D1", "b.src", "print(racyVar1)\n");
    let mut cfg = config(&ws, "src", 2);
    cfg.analyzer = PathBuf::from("/nonexistent/analyzer");
    cfg.analyzer_args.clear();

    let outcome = PipelineOrchestrator::from_config(cfg)
        .execute(&request(&ws, false))
        .await
        .unwrap();

    let rows = ws.csv_rows();
    assert_eq!(rows[0][2], "ERROR");
    assert_eq!(rows[0][6], "ERROR");
    assert_eq!(rows[0][9], "FALSE");
    assert_eq!(outcome.summary.analyzer_failures, 2);
}
