//! Test helpers for running commands against in-memory and on-disk planners.

use super::*;
use camino::Utf8PathBuf;
use serde_json::Value;
use tempfile::TempDir;
use wayfarer_core::test_support::SequentialIds;
use wayfarer_core::{MemoryStore, Planner, Seed};

/// A seeded planner over volatile storage.
pub(super) fn memory_planner() -> Planner<MemoryStore, SequentialIds> {
    let planner = Planner::with_ids(MemoryStore::default(), SequentialIds::starting_at(9_000));
    planner
        .initialize(&Seed::bundled().expect("bundled seed parses"))
        .expect("initialize planner");
    planner
}

/// Decode a command's JSON output.
pub(super) fn json_output(buffer: &[u8]) -> Value {
    serde_json::from_slice(buffer).expect("command printed JSON")
}

/// A scratch directory with a UTF-8 path.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub(super) fn write(&self, relative: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(relative);
        std::fs::write(&path, contents).expect("write workspace file");
        path
    }
}

/// Parse `args` as a full command line and run it, capturing stdout.
pub(super) fn run_line(args: &[&str]) -> Result<Vec<u8>, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("wayfarer").chain(args.iter().copied()))?;
    let mut buffer = Vec::new();
    run_with(cli, &mut buffer)?;
    Ok(buffer)
}
