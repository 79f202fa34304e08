use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

const DISCRETE_FIXTURE: &str = r#"<ColorMap title="Sea Surface Temperature" units="K">
    <ColorMapEntry rgb="0,0,255" value="270" label="cold"/>
    <ColorMapEntry rgb="255,255,0" value="280" label="mild"/>
    <ColorMapEntry rgb="255,0,0" value="290" label="warm"/>
</ColorMap>"#;

fn write_fixture(dir: &tempfile::TempDir, xml: &str) -> std::path::PathBuf {
    let path = dir.path().join("colormap.xml");
    fs::write(&path, xml).expect("write fixture");
    path
}

#[test]
fn cli_generates_svg_with_tooltips() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(&tmp, DISCRETE_FIXTURE);
    let out = tmp.path().join("legend.svg");

    let exe = assert_cmd::cargo_bin!("legenda-cli");
    let assert = Command::new(exe)
        .args([
            "--colormap",
            fixture.to_string_lossy().as_ref(),
            "--output",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("SVG tooltips added"));
    assert!(stdout.contains("generated successfully"));

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("ShowTooltip"));
    assert!(svg.contains(r#"fill="rgb(0,0,255)""#));
}

#[test]
fn cli_generates_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(&tmp, DISCRETE_FIXTURE);
    let out = tmp.path().join("legend.png");

    let exe = assert_cmd::cargo_bin!("legenda-cli");
    Command::new(exe)
        .args([
            "-c",
            fixture.to_string_lossy().as_ref(),
            "-o",
            out.to_string_lossy().as_ref(),
            "-f",
            "png",
            "-r",
            "horizontal",
        ])
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");
}

#[test]
fn cli_rejects_invalid_orientation() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(&tmp, DISCRETE_FIXTURE);
    let out = tmp.path().join("legend.svg");

    let exe = assert_cmd::cargo_bin!("legenda-cli");
    let assert = Command::new(exe)
        .args([
            "-c",
            fixture.to_string_lossy().as_ref(),
            "-o",
            out.to_string_lossy().as_ref(),
            "-r",
            "diagonal",
        ])
        .assert()
        .failure()
        .code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("diagonal is not a valid legend orientation"));
    assert!(!out.exists());
}

#[test]
fn cli_requires_colormap_and_output() {
    let exe = assert_cmd::cargo_bin!("legenda-cli");
    let assert = Command::new(exe).assert().failure().code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("colormap file must be specified"));
}

#[test]
fn cli_help_prints_usage_to_stdout() {
    let exe = assert_cmd::cargo_bin!("legenda-cli");
    let assert = Command::new(exe).arg("--help").assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(stdout.contains("USAGE:"));
    assert!(stdout.contains("--colormap"));
    assert!(output.stderr.is_empty());
}

#[test]
fn cli_aborts_on_malformed_rgb_without_output() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(
        &tmp,
        r#"<ColorMap><ColorMapEntry rgb="not,a,color" value="0"/></ColorMap>"#,
    );
    let out = tmp.path().join("legend.svg");

    let exe = assert_cmd::cargo_bin!("legenda-cli");
    Command::new(exe)
        .args([
            "-c",
            fixture.to_string_lossy().as_ref(),
            "-o",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .failure()
        .code(1);
    assert!(!out.exists());
}
