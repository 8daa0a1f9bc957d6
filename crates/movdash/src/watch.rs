//! Interactive mode: re-run the whole pipeline whenever the movement file or
//! the selection file changes.
//!
//! Every pass re-reads the source from disk. A failed pass is logged and the
//! previous dashboard is left untouched; the process keeps waiting.

use crate::cli::WatchArgs;
use crate::commands::{format_tables, render_pass};
use anyhow::Context;
use movdash_config::Config;
use movdash_graphs::SelectionRequest;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Files whose changes trigger a new pass
#[derive(Debug, Clone)]
pub struct WatchTargets {
    files: Vec<PathBuf>,
}

impl WatchTargets {
    pub fn new<I, P>(paths: I) -> std::io::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files = paths
            .into_iter()
            .map(|p| std::path::absolute(p.as_ref()))
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { files })
    }

    /// Directories to register with the watcher; files replaced by editors
    /// are only seen through their parent
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        self.files
            .iter()
            .filter_map(|f| f.parent().map(Path::to_path_buf))
            .collect()
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.files.iter().any(|target| same_file(target, path))
    }

    /// Whether `event` is a content change to one of the targets
    pub fn is_relevant(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) && event.paths.iter().any(|p| self.matches(p))
    }
}

fn same_file(target: &Path, candidate: &Path) -> bool {
    if target == candidate {
        return true;
    }
    if target.file_name() != candidate.file_name() {
        return false;
    }
    match (target.parent(), candidate.parent()) {
        (Some(a), Some(b)) => match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

/// State of a watch session
pub struct WatchSession {
    config: Config,
    selection: Option<PathBuf>,
    debounce: Duration,
}

impl WatchSession {
    pub fn new(config: &Config, args: &WatchArgs) -> Self {
        let mut config = config.clone();
        args.source.apply(&mut config);
        args.output.apply(&mut config);

        Self {
            config,
            selection: args.selection.clone(),
            debounce: Duration::from_millis(args.debounce_ms),
        }
    }

    pub fn targets(&self) -> std::io::Result<WatchTargets> {
        let mut paths = vec![PathBuf::from(&self.config.source.path)];
        paths.extend(self.selection.iter().cloned());
        WatchTargets::new(paths)
    }

    /// Read the selection file; a missing file means all defaults
    fn request(&self) -> movdash_common::Result<SelectionRequest> {
        match &self.selection {
            Some(path) if path.exists() => SelectionRequest::from_yaml_file(path),
            Some(path) => {
                warn!("Selection file {} not found, using defaults", path.display());
                Ok(SelectionRequest::default())
            }
            None => Ok(SelectionRequest::default()),
        }
    }

    /// Run one pass; `Some(report)` on success, errors are logged
    pub fn pass(&self) -> Option<String> {
        let result = self
            .request()
            .and_then(|request| render_pass(&self.config, &request));

        match result {
            Ok((tables, path)) => {
                info!(
                    "Dashboard updated at {} ({} records)",
                    path.display(),
                    tables.filtered_count
                );
                match format_tables(&tables, &self.config.dashboard) {
                    Ok(report) => Some(report),
                    Err(err) => {
                        error!("Cannot format the aggregate tables: {}", err);
                        None
                    }
                }
            }
            Err(err) => {
                error!("Pass failed, keeping previous dashboard: {}", err);
                None
            }
        }
    }

    /// Block on file events until the channel closes
    pub fn run(&self) -> anyhow::Result<()> {
        if let Some(report) = self.pass() {
            println!("{report}");
        }

        let targets = self.targets().context("resolving watched paths")?;
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).context("starting file watcher")?;
        for dir in targets.directories() {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("watching {}", dir.display()))?;
            debug!("Watching {}", dir.display());
        }
        info!("Waiting for changes (Ctrl-C to stop)");

        while let Ok(event) = rx.recv() {
            if !self.triggers(&targets, event) {
                continue;
            }

            // Let bursts of writes settle before re-reading
            while rx.recv_timeout(self.debounce).is_ok() {}

            info!("Change detected, re-running");
            if let Some(report) = self.pass() {
                println!("{report}");
            }
        }

        Ok(())
    }

    fn triggers(&self, targets: &WatchTargets, event: notify::Result<Event>) -> bool {
        match event {
            Ok(event) => targets.is_relevant(&event),
            Err(err) => {
                warn!("File watcher error: {}", err);
                false
            }
        }
    }
}
