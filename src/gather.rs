//! `bookmarks gather`: locate a Chromium-family browser's `Bookmarks` file and copy it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Browsers whose profile layout we know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Browser {
    Brave,
    Chrome,
    Chromium,
    Edge,
    Vivaldi,
}

impl Browser {
    pub fn name(self) -> &'static str {
        match self {
            Browser::Brave => "brave",
            Browser::Chrome => "chrome",
            Browser::Chromium => "chromium",
            Browser::Edge => "edge",
            Browser::Vivaldi => "vivaldi",
        }
    }

    /// Per-platform data directory, relative to the platform's base directory.
    fn data_dir(self, platform: Platform) -> &'static [&'static str] {
        use Browser::*;
        use Platform::*;
        match (self, platform) {
            (Chrome, Windows) => &["Google", "Chrome", "User Data"],
            (Chrome, MacOs) => &["Google", "Chrome"],
            (Chrome, Linux) => &["google-chrome"],
            (Chromium, Windows) => &["Chromium", "User Data"],
            (Chromium, MacOs) => &["Chromium"],
            (Chromium, Linux) => &["chromium"],
            (Edge, Windows) => &["Microsoft", "Edge", "User Data"],
            (Edge, MacOs) => &["Microsoft Edge"],
            (Edge, Linux) => &["microsoft-edge"],
            (Brave, Windows) => &["BraveSoftware", "Brave-Browser", "User Data"],
            (Brave, MacOs | Linux) => &["BraveSoftware", "Brave-Browser"],
            (Vivaldi, Windows) => &["Vivaldi", "User Data"],
            (Vivaldi, MacOs) => &["Vivaldi"],
            (Vivaldi, Linux) => &["vivaldi"],
        }
    }
}

/// Operating systems with a known bookmark location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "windows" => Some(Platform::Windows),
            "macos" => Some(Platform::MacOs),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }
}

/// Base directories the path templates hang off.
#[derive(Debug, Clone, Default)]
pub struct BaseDirs {
    pub home: Option<PathBuf>,
    /// `%LOCALAPPDATA%` on Windows.
    pub local_app_data: Option<PathBuf>,
}

impl BaseDirs {
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
            local_app_data: dirs::data_local_dir(),
        }
    }
}

/// Build the path of a browser's `Bookmarks` file. `None` when the needed
/// base directory is unknown.
pub fn bookmark_path(
    browser: Browser,
    profile: &str,
    platform: Platform,
    base: &BaseDirs,
) -> Option<PathBuf> {
    let mut path = match platform {
        Platform::Windows => base.local_app_data.clone()?,
        Platform::MacOs => base.home.as_ref()?.join("Library").join("Application Support"),
        Platform::Linux => base.home.as_ref()?.join(".config"),
    };
    for part in browser.data_dir(platform) {
        path.push(part);
    }
    path.push(profile);
    path.push("Bookmarks");
    Some(path)
}

/// Fill `{browser}` and `{profile}` in a destination template and expand `~`.
pub fn render_destination(template: &str, browser: Browser, profile: &str) -> PathBuf {
    let rendered = template
        .replace("{browser}", browser.name())
        .replace("{profile}", profile);
    expand_tilde(&rendered)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or(path.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Outcome of a gather run, mapped to exit codes by the caller.
#[derive(Debug, PartialEq)]
pub enum GatherOutcome {
    Copied(PathBuf),
    /// The file was not where the template says (exit 1).
    Missing(PathBuf),
    /// No template for this platform (exit 2).
    UnsupportedPlatform,
}

impl GatherOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            GatherOutcome::Copied(_) => 0,
            GatherOutcome::Missing(_) => 1,
            GatherOutcome::UnsupportedPlatform => 2,
        }
    }
}

/// Locate the bookmark file and copy it to `destination`.
pub fn gather(
    browser: Browser,
    profile: &str,
    destination: &Path,
    platform: Option<Platform>,
    base: &BaseDirs,
    quiet: bool,
) -> Result<GatherOutcome> {
    let Some(source) = platform.and_then(|p| bookmark_path(browser, profile, p, base)) else {
        eprintln!(
            "{} Unsupported combination for browser '{}' on this platform.",
            "error:".red().bold(),
            browser.name()
        );
        return Ok(GatherOutcome::UnsupportedPlatform);
    };

    if !source.is_file() {
        eprintln!(
            "{} Could not locate bookmark file for browser '{}' profile '{}'.",
            "error:".red().bold(),
            browser.name(),
            profile
        );
        eprintln!("  {} {}", "Looked for:".dimmed(), source.display());
        return Ok(GatherOutcome::Missing(source));
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(&source, destination).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    tracing::debug!(from = %source.display(), to = %destination.display(), "copied bookmark file");

    if !quiet {
        println!(
            "{} {}",
            "Bookmarks copied to".green().bold(),
            destination.display()
        );
    }
    Ok(GatherOutcome::Copied(destination.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> BaseDirs {
        BaseDirs {
            home: Some(PathBuf::from("/home/ada")),
            local_app_data: Some(PathBuf::from("C:/Users/ada/AppData/Local")),
        }
    }

    #[test]
    fn linux_chrome_path() {
        let path = bookmark_path(Browser::Chrome, "Default", Platform::Linux, &base()).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/ada/.config/google-chrome/Default/Bookmarks")
        );
    }

    #[test]
    fn macos_edge_path() {
        let path = bookmark_path(Browser::Edge, "Profile 1", Platform::MacOs, &base()).unwrap();
        assert_eq!(
            path,
            PathBuf::from(
                "/home/ada/Library/Application Support/Microsoft Edge/Profile 1/Bookmarks"
            )
        );
    }

    #[test]
    fn windows_brave_path() {
        let path = bookmark_path(Browser::Brave, "Default", Platform::Windows, &base()).unwrap();
        let expected: PathBuf = [
            "C:/Users/ada/AppData/Local",
            "BraveSoftware",
            "Brave-Browser",
            "User Data",
            "Default",
            "Bookmarks",
        ]
        .iter()
        .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn missing_base_dir_gives_none() {
        let path = bookmark_path(Browser::Vivaldi, "Default", Platform::Windows, &BaseDirs::default());
        assert_eq!(path, None);
    }

    #[test]
    fn destination_template_is_rendered() {
        let path = render_destination(
            "data/raw/{browser}_{profile}_Bookmarks.json",
            Browser::Chromium,
            "Default",
        );
        assert_eq!(path, PathBuf::from("data/raw/chromium_Default_Bookmarks.json"));
    }

    #[test]
    fn gather_copies_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let source = home.join(".config/chromium/Default/Bookmarks");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, r#"{"roots": {}}"#).unwrap();

        let base = BaseDirs {
            home: Some(home),
            local_app_data: None,
        };
        let dest = dir.path().join("out/raw/Bookmarks.json");
        let outcome = gather(
            Browser::Chromium,
            "Default",
            &dest,
            Some(Platform::Linux),
            &base,
            true,
        )
        .unwrap();
        assert_eq!(outcome, GatherOutcome::Copied(dest.clone()));
        assert_eq!(fs::read_to_string(&dest).unwrap(), r#"{"roots": {}}"#);
    }

    #[test]
    fn gather_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = BaseDirs {
            home: Some(dir.path().to_path_buf()),
            local_app_data: None,
        };
        let outcome = gather(
            Browser::Chrome,
            "Default",
            &dir.path().join("dest.json"),
            Some(Platform::Linux),
            &base,
            true,
        )
        .unwrap();
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn gather_without_platform_is_unsupported() {
        let outcome = gather(
            Browser::Chrome,
            "Default",
            Path::new("dest.json"),
            None,
            &base(),
            true,
        )
        .unwrap();
        assert_eq!(outcome, GatherOutcome::UnsupportedPlatform);
        assert_eq!(outcome.exit_code(), 2);
    }
}
