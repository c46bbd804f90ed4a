//! Raster backends that shell out to host PDF tools.
//!
//! Ghostscript and pdftoppm cover hosts where the crate was built
//! without the `rendering` feature, or where the in-process backend
//! fails on a document. Each run gets a scratch directory that is
//! removed when the handle drops, success or not.

use std::fs;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::raster::{RasterBackend, RasterImage};

/// Converters get this long before they are killed.
const CHILD_DEADLINE: Duration = Duration::from_secs(20);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ===== GHOSTSCRIPT =====

pub(crate) struct Ghostscript;

impl RasterBackend for Ghostscript {
    fn name(&self) -> &'static str {
        "ghostscript"
    }

    fn available(&self) -> bool {
        probe("gs", "--version", true)
    }

    fn render(&self, pdf: &[u8], dpi: u32) -> Result<RasterImage> {
        let dir = tempfile::tempdir()?;
        let pdf_path = dir.path().join("page.pdf");
        let png_path = dir.path().join("page.png");
        fs::write(&pdf_path, pdf)?;

        let mut cmd = Command::new("gs");
        cmd.args(["-q", "-dSAFER", "-dBATCH", "-dNOPAUSE", "-sDEVICE=png16m"])
            .arg(format!("-r{}", dpi))
            .args([
                "-dTextAlphaBits=4",
                "-dGraphicsAlphaBits=4",
                "-dFirstPage=1",
                "-dLastPage=1",
            ])
            .arg(format!("-sOutputFile={}", png_path.display()))
            .arg(&pdf_path);
        run_to_completion(self.name(), &mut cmd, CHILD_DEADLINE)?;
        read_png(self.name(), &png_path)
    }
}

// ===== PDFTOPPM =====

pub(crate) struct Pdftoppm;

impl RasterBackend for Pdftoppm {
    fn name(&self) -> &'static str {
        "pdftoppm"
    }

    fn available(&self) -> bool {
        // Exit codes vary across poppler versions; existing is enough.
        probe("pdftoppm", "-v", false)
    }

    fn render(&self, pdf: &[u8], dpi: u32) -> Result<RasterImage> {
        let dir = tempfile::tempdir()?;
        let pdf_path = dir.path().join("page.pdf");
        fs::write(&pdf_path, pdf)?;

        // Output lands at `{prefix}.png` with -singlefile.
        let prefix = dir.path().join("page");
        let mut cmd = Command::new("pdftoppm");
        cmd.args(["-png", "-r"])
            .arg(dpi.to_string())
            .args(["-f", "1", "-l", "1", "-singlefile"])
            .arg(&pdf_path)
            .arg(&prefix);
        run_to_completion(self.name(), &mut cmd, CHILD_DEADLINE)?;
        read_png(self.name(), &dir.path().join("page.png"))
    }
}

// ===== SHARED PLUMBING =====

/// Check whether a host tool answers a trivial invocation.
fn probe(program: &str, arg: &str, require_success: bool) -> bool {
    Command::new(program)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| !require_success || status.success())
        .unwrap_or(false)
}

/// Run a converter with a hard deadline, surfacing its first stderr
/// line on failure.
fn run_to_completion(backend: &str, cmd: &mut Command, deadline: Duration) -> Result<()> {
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .map_err(|e| backend_error(backend, format!("failed to start: {}", e)))?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(backend_error(
                        backend,
                        format!("killed after {}s timeout", deadline.as_secs()),
                    ));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(backend_error(backend, format!("wait failed: {}", e))),
        }
    };
    if status.success() {
        return Ok(());
    }

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    let detail = stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let message = if detail.is_empty() {
        format!("exited with {}", status)
    } else {
        format!("exited with {}: {}", status, detail)
    };
    Err(backend_error(backend, message))
}

fn read_png(backend: &str, path: &std::path::Path) -> Result<RasterImage> {
    let image = image::open(path)
        .map_err(|e| backend_error(backend, format!("output unreadable: {}", e)))?
        .to_rgb8();
    Ok(RasterImage {
        width: image.width(),
        height: image.height(),
        pixels: image.into_raw(),
    })
}

fn backend_error(backend: &str, message: String) -> Error {
    Error::Raster {
        backend: backend.to_string(),
        message,
    }
}
