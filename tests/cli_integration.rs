/*!
 * Integration tests driving the codecat binary
 */

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::tempdir;

fn codecat() -> Command {
    Command::new(env!("CARGO_BIN_EXE_codecat"))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_join_then_split_through_pipe() {
    let project = tempdir().unwrap();
    write(project.path(), "go.mod", "module example.com/shop\n");
    write(
        project.path(),
        "cmd/server/main.go",
        "package main\n\nimport \"example.com/shop/internal/cart\"\n\nfunc main() { cart.New() }\n",
    );
    write(
        project.path(),
        "internal/cart/cart.go",
        "package cart\n\ntype Cart struct{}\n\nfunc New() *Cart { return &Cart{} }",
    );
    write(project.path(), "internal/cart/cart_test.go", "package cart\n");

    let joined = codecat()
        .current_dir(project.path())
        .args(["join", "cmd/server/main.go", "--exclude", "**/*_test.go"])
        .output()
        .unwrap();
    assert!(joined.status.success(), "{}", String::from_utf8_lossy(&joined.stderr));

    let stream = String::from_utf8(joined.stdout.clone()).unwrap();
    assert!(stream.starts_with("// --------- codecat v1\n"));
    assert!(stream.contains("FILE START: \"internal/cart/cart.go\""));
    assert!(!stream.contains("cart_test.go"));

    let out = tempdir().unwrap();
    let mut split = codecat()
        .args(["split", "--out"])
        .arg(out.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .unwrap();
    split
        .stdin
        .take()
        .unwrap()
        .write_all(&joined.stdout)
        .unwrap();
    assert!(split.wait().unwrap().success());

    for rel in ["cmd/server/main.go", "internal/cart/cart.go"] {
        assert_eq!(
            fs::read(out.path().join(rel)).unwrap(),
            fs::read(project.path().join(rel)).unwrap()
        );
    }
    assert!(!out.path().join("internal/cart/cart_test.go").exists());
}

#[test]
fn test_join_without_module_fails() {
    let project = tempdir().unwrap();
    write(project.path(), "main.go", "package main\n");

    let output = codecat()
        .current_dir(project.path())
        .args(["join", "main.go"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--module"));
}

#[test]
fn test_split_rejects_unmarked_input() {
    let project = tempdir().unwrap();
    let input = project.path().join("bundle.txt");
    fs::write(&input, "just some text\n").unwrap();
    let out = project.path().join("out");

    let output = codecat()
        .args(["split", "--in"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_stats_go_to_stderr() {
    let project = tempdir().unwrap();
    write(project.path(), "notes.txt", "hello\n");

    let output = codecat()
        .current_dir(project.path())
        .args(["join", "notes.txt", "--stats"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("JOIN COMPLETE"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("JOIN COMPLETE"));
}

#[test]
fn test_no_subcommand_prints_help_and_fails() {
    let output = codecat().output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
