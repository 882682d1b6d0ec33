//! `bookmarks build-site`: copy the static navigation site template and drop
//! the canonical `bookmarks.json` next to it.

use anyhow::{Context, Result};
use bookmark_parse::{Document, ImportOptions};
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// File name the site's scripts load the bookmark tree from.
pub const DATA_FILE: &str = "bookmarks.json";

/// Options passed from the CLI to the site builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteOpts {
    pub quiet: bool,
    pub verbose: bool,
}

/// What a site build touched.
#[derive(Debug, Default, PartialEq)]
pub struct SiteReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl SiteReport {
    pub fn print_summary(&self, site_dir: &Path) {
        let mut parts = Vec::new();
        if self.created > 0 {
            parts.push(format!("{} created", self.created));
        }
        if self.updated > 0 {
            parts.push(format!("{} updated", self.updated));
        }
        if self.unchanged > 0 {
            parts.push(format!("{} unchanged", self.unchanged));
        }
        println!(
            "{} {} {}",
            "Static site generated at".green().bold(),
            site_dir.display(),
            format!("({})", parts.join(", ")).dimmed()
        );
    }
}

/// Result status for a single copied asset.
#[derive(Debug, PartialEq)]
enum FileStatus {
    New,
    Updated,
    Unchanged,
}

/// Write a document as pretty canonical JSON, creating parent directories.
pub fn write_canonical(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = document
        .to_json_pretty()
        .context("Failed to serialize bookmark document")?;
    fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Copy the template tree into `site_dir` and write `bookmarks.json`.
pub fn build_static_site(
    document: &Document,
    site_dir: &Path,
    static_source: &Path,
    opts: SiteOpts,
) -> Result<SiteReport> {
    if !static_source.is_dir() {
        anyhow::bail!(
            "Static template directory not found: {}",
            static_source.display()
        );
    }

    fs::create_dir_all(site_dir)
        .with_context(|| format!("Failed to create {}", site_dir.display()))?;

    let mut report = SiteReport::default();
    for rel_path in list_files_recursive(static_source)? {
        let status = copy_single_file(&static_source.join(&rel_path), &site_dir.join(&rel_path))?;
        match status {
            FileStatus::New => {
                report.created += 1;
                if !opts.quiet {
                    println!("  {} {} (new)", "+".green(), rel_path.display());
                }
            }
            FileStatus::Updated => {
                report.updated += 1;
                if !opts.quiet {
                    println!("  {} {} (updated)", "~".yellow(), rel_path.display());
                }
            }
            FileStatus::Unchanged => {
                report.unchanged += 1;
                if opts.verbose && !opts.quiet {
                    println!("  {} {} (unchanged)", "-".dimmed(), rel_path.display());
                }
            }
        }
    }

    let data_path = site_dir.join(DATA_FILE);
    write_canonical(document, &data_path)?;
    if !opts.quiet {
        println!("  {} {}", "data".dimmed(), data_path.display());
    }

    Ok(report)
}

/// Copy one file unless the destination already has identical content.
fn copy_single_file(src: &Path, dst: &Path) -> Result<FileStatus> {
    let status = if !dst.exists() {
        FileStatus::New
    } else if file_hash(src)? == file_hash(dst)? {
        return Ok(FileStatus::Unchanged);
    } else {
        FileStatus::Updated
    };

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} -> {}", src.display(), dst.display()))?;
    Ok(status)
}

/// Compute SHA-256 hash of file contents.
fn file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recursively list all files under a directory, returning relative paths.
fn list_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.push(rel);
        }
    }

    Ok(files)
}

/// Everything a rebuild needs.
pub struct SiteJob<'a> {
    pub input: &'a Path,
    pub site_dir: &'a Path,
    pub static_source: &'a Path,
    pub options: &'a ImportOptions,
    pub opts: SiteOpts,
}

impl SiteJob<'_> {
    pub fn run(&self) -> Result<SiteReport> {
        let document = crate::load_document(self.input, self.options)?;
        build_static_site(&document, self.site_dir, self.static_source, self.opts)
    }
}

/// Watch the input file for changes and rebuild the site on each save.
///
/// Debounces rapid events (e.g. browsers that write in stages) with a 200ms window.
/// Ctrl+C exits cleanly.
pub fn watch_and_rebuild(job: &SiteJob<'_>) -> Result<()> {
    let file_path = fs::canonicalize(job.input)
        .with_context(|| format!("Cannot resolve path '{}'", job.input.display()))?;

    let watch_dir = file_path.parent().ok_or_else(|| {
        anyhow::anyhow!("Cannot determine parent directory of '{}'", job.input.display())
    })?;

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        job.input.display()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                let affects_input = event
                    .paths
                    .iter()
                    .any(|p| p.canonicalize().ok().as_ref() == Some(&file_path));

                if relevant && affects_input && last_rebuild.elapsed() > debounce {
                    // Let the writer finish before reading.
                    std::thread::sleep(Duration::from_millis(50));

                    match job.run() {
                        Ok(report) => {
                            last_rebuild = Instant::now();
                            if !job.opts.quiet {
                                report.print_summary(job.site_dir);
                            }
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
