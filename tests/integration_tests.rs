use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper function to run lineplot with arguments, returning stdout on success
fn run_lineplot(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_lineplot"))
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test data");
    path
}

const DECAY: &str = "t signal noise\n\
                     0 1.0 0.10\n\
                     1 0.6 0.12\n\
                     2 0.35 0.09\n\
                     3 0.2 0.11\n\
                     4 0.12 0.10\n";

#[test]
fn test_end_to_end_default_columns() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&[data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_save_png_and_svg() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let png = dir.path().join("out.png");
    let svg = dir.path().join("out.svg");

    let result = run_lineplot(&["-y", "signal", "--save", png.to_str().unwrap(), data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&fs::read(&png).unwrap()));

    let result = run_lineplot(&["-y", "signal", "--save", svg.to_str().unwrap(), data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let text = fs::read_to_string(&svg).unwrap();
    assert!(text.contains("<svg"));
}

#[test]
fn test_end_to_end_multiple_files_with_styles() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.txt", DECAY);
    let b = write_file(dir.path(), "b.txt", DECAY);
    let result = run_lineplot(&[
        "-y",
        "2",
        "-s",
        "lt=--,pt=o",
        "-s",
        "pt=s,fill=none",
        "-c",
        "line.vivid",
        "--title",
        "decay",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_csv_without_header() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "plain.csv", "1,10\n2,20\n3,15\n");
    let result = run_lineplot(&["--sep", ",", "--header", "false", data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_log_axes_and_limits() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&[
        "--log",
        "y",
        "--xlim",
        "0:5",
        "--ylim",
        "0.01:",
        "--legend",
        "loc=outupper right,box=true",
        data.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_cycle_and_preset() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&[
        "--cycle",
        "lt=-|--",
        "--combination",
        "+",
        "--preset",
        "nature",
        data.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_config_file() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let config = write_file(dir.path(), "style.json", r##"{"grid": true, "border": "half"}"##);
    let result = run_lineplot(&["--config", config.to_str().unwrap(), data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_column_not_found() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&["-y", "pressure", data.to_str().unwrap()]);
    assert!(result.is_err(), "Should have failed with column not found");
    assert!(result.unwrap_err().contains("pressure"));
}

#[test]
fn test_end_to_end_empty_file() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "empty.txt", "t v\n");
    let result = run_lineplot(&[data.to_str().unwrap()]);
    assert!(result.is_err(), "Should have failed with empty input");
    assert!(result.unwrap_err().contains("at least one data row"));
}

#[test]
fn test_end_to_end_non_numeric_data() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "mixed.txt", "x y\n1 10\n2 high\n");
    let result = run_lineplot(&[data.to_str().unwrap()]);
    assert!(result.is_err(), "Should have failed with non-numeric data");
    assert!(result.unwrap_err().contains("Failed to parse"));
}

#[test]
fn test_end_to_end_invalid_options() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let path = data.to_str().unwrap();
    assert!(run_lineplot(&["--scaling", "cubic", path]).is_err());
    assert!(run_lineplot(&["--log", "z", path]).is_err());
    assert!(run_lineplot(&["--xlim", "5", path]).is_err());
    assert!(run_lineplot(&["-s", "color", path]).is_err());
    assert!(run_lineplot(&["-c", "line.nope", path]).is_err());
    assert!(run_lineplot(&["--legend", "loc=sideways", path]).is_err());
}

#[test]
fn test_end_to_end_lone_limit_past_data() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&["--xlim", "100:", data.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_oversized_figure() {
    let dir = TempDir::new().unwrap();
    let data = write_file(dir.path(), "decay.txt", DECAY);
    let result = run_lineplot(&["--dpi", "20000", data.to_str().unwrap()]);
    assert!(result.is_err(), "Should have refused the canvas size");
    assert!(result.unwrap_err().contains("too large"));
}

#[test]
fn test_end_to_end_missing_file() {
    let result = run_lineplot(&["/nonexistent/data.txt"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to open"));
}
