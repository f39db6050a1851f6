use dtogen_engine::DtoType;
use std::process::{Command, Output};
use tempfile::TempDir;

fn dtogen(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dtogen"))
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("failed to run dtogen")
}

fn init(dir: &TempDir) -> String {
    let model = dir.path().join("dtogen.ron");
    let output = dtogen(dir, &["init", "--output", model.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model.exists());
    model.to_str().unwrap().to_string()
}

#[test]
fn init_then_generate_json() {
    let dir = TempDir::new().unwrap();
    let model = init(&dir);

    let output = dtogen(
        &dir,
        &[
            "generate",
            "--root",
            "demo.PersonForm",
            "--model",
            &model,
            "--format",
            "json",
        ],
    );
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let dto: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dto["name"], "demo.PersonFormData");
    assert_eq!(dto["kind"], "FormData");
    let nested: Vec<&str> = dto["nested_types"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["name"].as_str())
        .collect();
    assert!(nested.contains(&"demo.PersonFormData.Name"));
    assert!(nested.contains(&"demo.PersonFormData.Addresses"));
}

#[test]
fn generate_writes_ron_to_a_file() {
    let dir = TempDir::new().unwrap();
    let model = init(&dir);
    let target = dir.path().join("PersonFormData.ron");

    let output = dtogen(
        &dir,
        &[
            "generate",
            "--root",
            "demo.PersonForm",
            "--model",
            &model,
            "--output",
            target.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    let written = std::fs::read_to_string(&target).unwrap();
    let parsed: DtoType = ron::from_str(&written).unwrap();
    assert_eq!(parsed.name, "demo.PersonFormData");
    assert!(
        parsed
            .find("demo.PersonFormData.Addresses.AddressesRowData")
            .is_some()
    );
}

#[test]
fn generate_uses_the_model_in_the_current_directory() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let output = dtogen(&dir, &["generate", "--root", "demo.PersonForm"]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("demo.PersonFormData"));
}

#[test]
fn print_tree_lists_visited_nodes() {
    let dir = TempDir::new().unwrap();
    let model = init(&dir);
    let output = dtogen(
        &dir,
        &["print-tree", "--root", "demo.PersonForm", "--model", &model],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for node in ["MainBox", "NameField", "StreetColumn", "OkButton"] {
        assert!(stdout.contains(node), "{node} missing from:\n{stdout}");
    }
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let model = init(&dir);
    let output = dtogen(&dir, &["init", "--output", &model]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
}

#[test]
fn unknown_root_fails() {
    let dir = TempDir::new().unwrap();
    let model = init(&dir);
    let output = dtogen(
        &dir,
        &["generate", "--root", "demo.Missing", "--model", &model],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("demo.Missing"));
}
