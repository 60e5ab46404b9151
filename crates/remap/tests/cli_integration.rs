//! CLI integration tests that drive the built `remap` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const OLD_JAVA: &str = "\
package a.b;

public class Old {
    private int x;

    public Old() {}

    public void m() {
        x++;
    }
}
";

const MAPPINGS: &str = "\
CL: a/b/Old a/b/New
FD: a/b/Old/x a/b/New/y
MD: a/b/Old/m ()V a/b/New/n ()V
";

fn remap_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_remap"))
}

/// A temp directory holding `src/`, `out/` and `mappings.srg`.
fn setup_project(mappings: &str) -> TempDir {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    fs::create_dir_all(temp.path().join("src/a/b")).unwrap();
    fs::create_dir_all(temp.path().join("out")).unwrap();
    fs::write(temp.path().join("mappings.srg"), mappings).unwrap();
    fs::write(temp.path().join("src/a/b/Old.java"), OLD_JAVA).unwrap();
    temp
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(remap_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run remap")
}

fn transform(dir: &Path, extra: &[&str]) -> Output {
    let mut args = vec![
        "transform",
        "--source",
        "src",
        "--target",
        "out",
        "--mappings",
        "mappings.srg",
    ];
    args.extend_from_slice(extra);
    run(dir, &args)
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

mod success {
    use super::*;

    #[test]
    fn transform_writes_renamed_tree() {
        let temp = setup_project(MAPPINGS);

        let output = transform(temp.path(), &[]);

        assert!(
            output.status.success(),
            "remap failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(!temp.path().join("out/a/b/Old.java").exists());
        let out = fs::read_to_string(temp.path().join("out/a/b/New.java")).unwrap();
        assert!(out.contains("public class New {"));
        assert!(out.contains("public New() {}"));
        assert!(out.contains("private int y;"));
        assert!(out.contains("public void n() {"));
        assert!(out.contains("        x++;"));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("Remapped 1 file(s), 1 changed, 3 rename(s)"));
    }

    #[test]
    fn transform_json_response() {
        let temp = setup_project(MAPPINGS);

        let output = transform(temp.path(), &["--format", "json"]);

        assert!(output.status.success());
        let value = json(&output);
        assert_eq!(value["status"], "ok");
        assert_eq!(value["schema_version"], "1");
        assert_eq!(value["dry_run"], false);
        assert_eq!(value["summary"]["renamed"], 3);
        assert_eq!(value["mappings"]["types"], 1);
        let renames = value["files"][0]["renames"].as_array().unwrap();
        assert_eq!(renames[0]["kind"], "class");
        assert_eq!(renames[0]["new_name"], "New");
        assert_eq!(value["files"][0]["output_path"], "a/b/New.java");
    }

    #[test]
    fn dry_run_leaves_target_empty() {
        let temp = setup_project(MAPPINGS);

        let output = transform(temp.path(), &["--dry-run", "--format", "json"]);

        assert!(output.status.success());
        assert_eq!(json(&output)["dry_run"], true);
        assert_eq!(fs::read_dir(temp.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let temp = setup_project(MAPPINGS);

        let first = transform(temp.path(), &["--format", "json"]);
        let second = transform(temp.path(), &["--format", "json"]);

        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn check_reports_counts() {
        let temp = setup_project(MAPPINGS);

        let output = run(
            temp.path(),
            &["check", "--mappings", "mappings.srg", "--format", "json"],
        );

        assert!(output.status.success());
        let value = json(&output);
        assert_eq!(value["mappings"]["fields"], 1);
        assert_eq!(value["mappings"]["methods"], 1);
    }
}

mod failures {
    use super::*;

    #[test]
    fn malformed_mappings_exit_6() {
        let temp = setup_project("CL: a/b/Old\n");

        let output = transform(temp.path(), &[]);

        assert_eq!(output.status.code(), Some(6));
        let value = json(&output);
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], 6);
        assert_eq!(value["error"]["details"]["line"], 1);
        assert_eq!(fs::read_dir(temp.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn inconsistent_mappings_exit_6() {
        let temp = setup_project("CL: a/b/Old a/b/New\nFD: a/b/Old/x a/b/Other/y\n");

        let output = run(temp.path(), &["check", "--mappings", "mappings.srg"]);

        assert_eq!(output.status.code(), Some(6));
        let value = json(&output);
        assert_eq!(value["error"]["details"]["violations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_mappings_exit_3() {
        let temp = setup_project(MAPPINGS);

        let output = run(temp.path(), &["check", "--mappings", "nope.srg"]);

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(json(&output)["error"]["details"]["path"], "nope.srg");
    }

    #[test]
    fn java_parse_error_exit_7() {
        let temp = setup_project(MAPPINGS);
        fs::write(
            temp.path().join("src/a/b/Broken.java"),
            "package a.b;\nclass Broken {\n",
        )
        .unwrap();

        let output = transform(temp.path(), &[]);

        assert_eq!(output.status.code(), Some(7));
        let value = json(&output);
        assert_eq!(value["error"]["location"]["file"], "a/b/Broken.java");
        assert_eq!(fs::read_dir(temp.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn target_inside_source_exit_2() {
        let temp = setup_project(MAPPINGS);
        fs::create_dir_all(temp.path().join("src/out")).unwrap();

        let output = run(
            temp.path(),
            &[
                "transform",
                "--source",
                "src",
                "--target",
                "src/out",
                "--mappings",
                "mappings.srg",
            ],
        );

        assert_eq!(output.status.code(), Some(2));
        assert_eq!(json(&output)["error"]["code"], 2);
    }
}
