//! Exit codes and output contract of the two binaries.

use std::f32::consts::PI;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn busprobe(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_busprobe"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn planner(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_busprobe-plan"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write_tone(path: &Path, secs: f32) {
    let sr = 44100;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(sr as f32 * secs) as usize {
        let v = 0.5 * (2.0 * PI * 440.0 * i as f32 / sr as f32).sin();
        writer.write_sample((v * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn wrong_argument_count_prints_usage() {
    let dir = TempDir::new().unwrap();
    let out = busprobe(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Usage:"));

    let only_input = dir.path().join("in.wav");
    let out = busprobe(&[&only_input]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.wav");
    let output = dir.path().join("report.json");

    let out = busprobe(&[&input, &output]);
    assert_eq!(out.status.code(), Some(2));
    let text = stdout(&out);
    assert!(text.starts_with("[ERROR] Analysis failed: "), "{}", text);
    assert_eq!(text.trim_end().lines().count(), 1);
    assert!(!output.exists());
}

#[test]
fn short_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("short.wav");
    let output = dir.path().join("report.json");
    write_tone(&input, 0.25);

    let out = busprobe(&[&input, &output]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).contains("too short"));
    assert!(!output.exists());
}

#[test]
fn undecodable_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("corrupt.wav");
    let output = dir.path().join("report.json");
    std::fs::write(&input, b"RIFF\x00\x00 this is not a wave file at all").unwrap();

    let out = busprobe(&[&input, &output]);
    assert_eq!(out.status.code(), Some(2));
    let text = stdout(&out);
    assert!(text.starts_with("[ERROR] Analysis failed: "), "{}", text);
    assert_eq!(text.trim_end().lines().count(), 1);
    assert!(!output.exists());
}

#[test]
fn success_writes_flat_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tone.wav");
    let output = dir.path().join("report.json");
    write_tone(&input, 2.0);

    let out = busprobe(&[&input, &output]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out).trim_end(),
        format!("[OK] Analysis written to {}", output.display())
    );

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 6);
    for key in ["loudness", "presence", "sibilance", "low_mid", "stereo_spread", "dynamic_complexity"] {
        assert!(obj[key].is_number(), "{} missing or not numeric", key);
    }
}

#[test]
fn planner_round_trip() {
    let dir = TempDir::new().unwrap();
    let issues = dir.path().join("issues.json");
    let plan = dir.path().join("plan.json");
    std::fs::write(&issues, r#"[{"type": "harsh", "severity": 0.8}]"#).unwrap();

    let out = planner(&[&issues, &plan]);
    assert_eq!(out.status.code(), Some(0));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&plan).unwrap()).unwrap();
    assert_eq!(value["meta"]["version"], "2.0");
    assert_eq!(value["issues"][0]["type"], "harsh");
    assert_eq!(value["issues"][0]["fix"]["depth"], 0.6);
}

#[test]
fn planner_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let issues = dir.path().join("issues.json");
    let plan = dir.path().join("plan.json");
    std::fs::write(&issues, r#"[{"type": "harsh"}]"#).unwrap();

    let out = planner(&[&issues, &plan]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!plan.exists());

    assert_eq!(planner(&[]).status.code(), Some(1));
}
