// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to a file since the TUI owns
/// the terminal; `RUST_LOG` wins over the configured level.
pub fn init(level: &str, path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    tracing::debug!(path = %path.display(), "logging initialized");
    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}; set [log].file to a writable path", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{build_filter, open_log_file};
    use anyhow::Result;
    use std::io::Write;

    #[test]
    fn open_log_file_creates_parent_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested/dir/tours.log");
        let mut file = open_log_file(&path)?;
        writeln!(file, "hello")?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn open_log_file_appends() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("tours.log");
        writeln!(open_log_file(&path)?, "first")?;
        writeln!(open_log_file(&path)?, "second")?;
        assert_eq!(std::fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn build_filter_accepts_levels_and_directives() -> Result<()> {
        build_filter("info")?;
        build_filter("tours_api=debug,warn")?;
        Ok(())
    }
}
