use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TASKS: &str = r#"[
  {"name": "build-dev", "source": "npm",
   "scope": {"kind": "workspace", "name": "app", "path": "/ws/app"},
   "definition": {"type": "npm", "fileName": "package.json", "script": "build-dev"}},
  {"name": "lint", "source": "npm",
   "scope": {"kind": "workspace", "name": "app", "path": "/ws/app"},
   "definition": {"type": "npm", "fileName": "package.json", "script": "lint"}},
  {"name": "build-prod", "source": "npm",
   "scope": {"kind": "workspace", "name": "app", "path": "/ws/app"},
   "definition": {"type": "npm", "fileName": "package.json", "script": "build-prod"}},
  {"name": "serve", "source": "gulp",
   "scope": {"kind": "workspace", "name": "lib", "path": "/ws/lib"},
   "definition": {"type": "gulp", "fileName": "gulpfile.js"}}
]"#;

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let tasks = dir.path().join("tasks.json");
    fs::write(&tasks, TASKS).unwrap();
    (dir, tasks)
}

fn task_tree(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("task-tree").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_show_prints_grouped_outline() {
    let (dir, tasks) = setup();
    task_tree(&dir)
        .arg("show")
        .arg("--tasks")
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Last Tasks\nFavorites\n"))
        .stdout(predicate::str::contains(
            "app\n  npm\n    build\n      - dev\n      - prod\n    - lint\n",
        ))
        .stdout(predicate::str::contains("lib\n  gulp\n    - serve\n"));
}

#[test]
fn test_show_scoped_rebuild_matches_full_build() {
    let (dir, tasks) = setup();
    let full = task_tree(&dir)
        .args(["show", "--tasks"])
        .arg(&tasks)
        .output()
        .unwrap();
    task_tree(&dir)
        .args(["show", "--source", "npm", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(String::from_utf8(full.stdout).unwrap());
}

#[test]
fn test_show_json_lists_tree_items() {
    let (dir, tasks) = setup();
    task_tree(&dir)
        .args(["show", "--json", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""context_value": "script""#))
        .stdout(predicate::str::contains(r#""context_value": "taskGroupNpm""#));
}

#[test]
fn test_config_discovered_from_working_directory() {
    let (dir, tasks) = setup();
    fs::write(
        dir.path().join(".task-tree.json"),
        r#"{"grouping": {"enabled": false}}"#,
    )
    .unwrap();

    task_tree(&dir)
        .args(["show", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  npm\n    - build-dev\n    - build-prod\n    - lint\n",
        ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (dir, tasks) = setup();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"grouping": {"max_level": 0}}"#).unwrap();

    task_tree(&dir)
        .args(["show", "--tasks"])
        .arg(&tasks)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_counts_per_source() {
    let (dir, tasks) = setup();
    task_tree(&dir)
        .args(["counts", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains("gulp: 1\nnpm: 3\n"))
        .stdout(predicate::str::contains("total: 4"));
}

#[test]
fn test_find_by_task_file_path() {
    let (dir, tasks) = setup();
    task_tree(&dir)
        .args(["find", "/ws/app/package.json", "--name", "lint", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains("🔧 lint"))
        .stdout(predicate::str::contains("script: lint"));
}

#[test]
fn test_find_unknown_reference_fails() {
    let (dir, tasks) = setup();
    task_tree(&dir)
        .args(["find", "no-such-id", "--tasks"])
        .arg(&tasks)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task item matches 'no-such-id'"));
}

#[test]
fn test_missing_task_list_fails() {
    let dir = TempDir::new().unwrap();
    task_tree(&dir)
        .args(["counts", "--tasks", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read task list"));
}
