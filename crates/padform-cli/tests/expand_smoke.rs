use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

#[test]
fn writes_one_json_file_per_footprint() {
    let exe = env!("CARGO_BIN_EXE_padform");
    let root = workspace_root();
    let temp = tempfile::tempdir().unwrap();

    let output = Command::new(exe)
        .current_dir(temp.path())
        .args([
            "expand",
            root.join("fixtures/footprints/tht_header.yaml").to_str().unwrap(),
            root.join("fixtures/footprints/single_pad.json").to_str().unwrap(),
            "--config",
            root.join("fixtures/config/tight.yaml").to_str().unwrap(),
            "--output",
            "out",
        ])
        .output()
        .expect("run padform cli");
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let header: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp.path().join("out/tht_header.shapes.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(header["drills"]["top"].as_array().unwrap().len(), 3);
    assert_eq!(header["conductor"]["top"][1]["label"], "GND");

    let pad: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp.path().join("out/single_pad.shapes.json")).unwrap(),
    )
    .unwrap();
    let width = pad["soldermask"]["top"][0]["width"].as_f64().unwrap();
    assert!((width - 1.1).abs() < 1e-9, "width {width}");
}

#[test]
fn summary_reports_counts_in_input_order() {
    let exe = env!("CARGO_BIN_EXE_padform");
    let root = workspace_root();

    let output = Command::new(exe)
        .args([
            "expand",
            root.join("fixtures/footprints/single_pad.yaml").to_str().unwrap(),
            root.join("fixtures/footprints/overrides.yaml").to_str().unwrap(),
            "--summary",
            "--internal-layers",
            "2",
        ])
        .output()
        .expect("run padform cli");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("single_pad: conductor=2/2 "), "{}", lines[0]);
    assert!(lines[1].starts_with("overrides: "), "{}", lines[1]);
    assert!(lines[1].contains(" pours=4/4 "), "{}", lines[1]);
}
