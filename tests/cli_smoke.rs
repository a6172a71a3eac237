use std::path::PathBuf;
use std::process::Command;

fn exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_splat-expr"))
}

#[test]
fn cli_graph_prints_the_compiled_node() {
    let out = Command::new(exe())
        .args(["graph", "{} + 2 * {}.y", "--arg", "1", "--arg", "input:v:vec3"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.trim(), "add(1, mul(2, v.y))");
}

#[test]
fn cli_eval_prints_json() {
    let out = Command::new(exe())
        .args([
            "eval",
            "{}.opacity * {}",
            "--arg",
            "composite:splat:opacity=float,center=vec3",
            "--arg",
            "input:t:float",
            "--bind",
            "splat.opacity=0.5",
            "--bind",
            "t=4",
        ])
        .output()
        .unwrap();

    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["ty"], "float");
    assert_eq!(v["lanes"][0].as_f64(), Some(2.0));
}

#[test]
fn cli_reports_compile_errors() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("shallow.json");
    std::fs::write(&config, r#"{ "max_depth": 1 }"#).unwrap();

    let out = Command::new(exe())
        .args(["graph", "( 1 )", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("nesting error"), "stderr: {stderr}");
}
