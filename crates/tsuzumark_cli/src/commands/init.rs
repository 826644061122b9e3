//! Init command implementation

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};
use tsuzumark_core::{AnnotatorConfig, DEFAULT_CONFIG};

pub fn run_init(force: bool) -> Result<()> {
    let path = write_starter_config(Path::new("."), force)?;

    let rules = AnnotatorConfig::from_json(DEFAULT_CONFIG)
        .map(|config| config.rules.len())
        .into_diagnostic()?;
    info!("Created {} with {} rule entries", path.display(), rules);
    Ok(())
}

/// Writes [`DEFAULT_CONFIG`] as the preferred config file in `dir`.
///
/// Symlinks are never followed. With `force`, an existing file is replaced.
fn write_starter_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(AnnotatorConfig::CONFIG_FILES[0]);
    warn_about_shadowed(dir);

    let mut file = loop {
        match create_no_follow(&path) {
            Ok(file) => break file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "{} already exists. Use --force to overwrite.",
                        path.display()
                    ));
                }
                // Another process may remove it first; retry either way.
                match std::fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    };

    file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
    let relative = match path.strip_prefix(dir) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path.clone(),
    };
    Ok(relative)
}

fn create_no_follow(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    options.open(path)
}

/// Discovery prefers the first config file name, so any later one stops
/// being read once the starter file exists.
fn warn_about_shadowed(dir: &Path) {
    for name in &AnnotatorConfig::CONFIG_FILES[1..] {
        let other = dir.join(name);
        if other.exists() {
            warn!(
                "{} will be ignored; {} takes precedence",
                name,
                AnnotatorConfig::CONFIG_FILES[0]
            );
        }
    }
}
