//! Exit status and stdout of the `png-bench` binary on aborted runs.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{Rgb, RgbImage};
use tempfile::TempDir;

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["raw", "png", "bin"] {
            fs::create_dir(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    fn dir(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    fn add_case(&self, name: &str, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 200, 30]));
        fs::write(
            self.dir("raw").join(format!("{name}-{width}x{height}.raw")),
            img.as_raw(),
        )
        .unwrap();
        img.save(self.dir("png").join(format!("{name}.png"))).unwrap();
    }

    fn encoder(&self, body: &str) -> PathBuf {
        let path = self.dir("bin").join("png_encoder");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn run(&self, encoder: &Path) -> Output {
        Command::new(env!("CARGO_BIN_EXE_png-bench"))
            .arg("run")
            .arg("--raw-dir")
            .arg(self.dir("raw"))
            .arg("--reference-dir")
            .arg(self.dir("png"))
            .arg("--encoder")
            .arg(encoder)
            .arg("--no-color")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

#[test]
fn failing_encoder_exits_non_zero_without_table() {
    let ws = Workspace::new();
    ws.add_case("flat", 4, 4);
    let output = ws.run(&ws.encoder("exit 1"));

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Benchmark aborted"));
}

#[test]
fn empty_corpus_exits_non_zero_without_table() {
    let ws = Workspace::new();
    let output = ws.run(&ws.encoder(r#"cp "$1" "$2""#));

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input"));
}

#[test]
fn successful_run_prints_table() {
    let ws = Workspace::new();
    ws.add_case("flat", 4, 4);
    let output = ws.run(&ws.encoder(r#"cp "$1" "$2""#));

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Benchmarking 1 images using: candidate, image-rs"));
    assert!(stdout.contains("Totals (bytes):"));
}
