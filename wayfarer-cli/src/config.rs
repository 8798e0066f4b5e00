//! Layered storage settings shared by every command.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{Planner, Seed, SqliteStore};

use crate::CliError;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_SEED_POIS: &str = "seed-pois";
pub(crate) const ARG_SEED_USER: &str = "seed-user";
pub(crate) const ENV_SEED_POIS: &str = "WAYFARER_CMDS_STORE_SEED_POIS";
pub(crate) const ENV_SEED_USER: &str = "WAYFARER_CMDS_STORE_SEED_USER";
pub(crate) const DEFAULT_DATABASE: &str = "wayfarer.db";

/// Storage flags accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct GlobalArgs {
    /// Path to the SQLite database holding the catalog and trips.
    #[arg(long = ARG_DATABASE, value_name = "path", global = true)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// JSON file replacing the bundled POI catalog on first run.
    #[arg(long = ARG_SEED_POIS, value_name = "path", global = true)]
    pub(crate) seed_pois: Option<Utf8PathBuf>,
    /// JSON file replacing the bundled user record on first run.
    #[arg(long = ARG_SEED_USER, value_name = "path", global = true)]
    pub(crate) seed_user: Option<Utf8PathBuf>,
}

/// Storage options layered from CLI flags, the `[cmds.store]` table of a
/// configuration file, and `WAYFARER_CMDS_STORE_*` environment variables.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "store", about = "Locate the planner database and its seed datasets")]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct StoreArgs {
    /// Path to the SQLite database holding the catalog and trips.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// JSON file replacing the bundled POI catalog on first run.
    #[arg(long = ARG_SEED_POIS, value_name = "path")]
    #[serde(default)]
    pub(crate) seed_pois: Option<Utf8PathBuf>,
    /// JSON file replacing the bundled user record on first run.
    #[arg(long = ARG_SEED_USER, value_name = "path")]
    #[serde(default)]
    pub(crate) seed_user: Option<Utf8PathBuf>,
}

impl From<GlobalArgs> for StoreArgs {
    fn from(args: GlobalArgs) -> Self {
        Self {
            database: args.database,
            seed_pois: args.seed_pois,
            seed_user: args.seed_user,
        }
    }
}

impl StoreArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StoreConfig::try_from(merged)
    }
}

/// Seed datasets supplied on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeedFiles {
    pub(crate) pois: Utf8PathBuf,
    pub(crate) user: Utf8PathBuf,
}

/// Resolved storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) seed: Option<SeedFiles>,
}

impl TryFrom<StoreArgs> for StoreConfig {
    type Error = CliError;

    fn try_from(args: StoreArgs) -> Result<Self, Self::Error> {
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let seed = match (args.seed_pois, args.seed_user) {
            (None, None) => None,
            (Some(pois), Some(user)) => Some(SeedFiles { pois, user }),
            (Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_SEED_USER,
                    env: ENV_SEED_USER,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_SEED_POIS,
                    env: ENV_SEED_POIS,
                });
            }
        };
        Ok(Self { database, seed })
    }
}

impl StoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(seed) = &self.seed {
            require_existing(&seed.pois, ARG_SEED_POIS)?;
            require_existing(&seed.user, ARG_SEED_USER)?;
        }
        Ok(())
    }

    /// The seed written into an empty database.
    pub(crate) fn load_seed(&self) -> Result<Seed, CliError> {
        let Some(files) = &self.seed else {
            return Ok(Seed::bundled()?);
        };
        let pois = read_source(&files.pois, ARG_SEED_POIS)?;
        let user = read_source(&files.user, ARG_SEED_USER)?;
        Ok(Seed::from_json(&pois, &user)?)
    }

    /// Open the database and initialize it with the configured seed.
    pub(crate) fn open_planner(&self) -> Result<Planner<SqliteStore>, CliError> {
        wayfarer_fs::ensure_parent_dir(&self.database).map_err(|source| {
            CliError::PrepareDatabase {
                path: self.database.clone(),
                source,
            }
        })?;
        let planner = Planner::new(SqliteStore::open(self.database.as_std_path())?);
        let report = planner.initialize(&self.load_seed()?)?;
        debug!("opened {} ({report:?})", self.database);
        Ok(planner)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wayfarer_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::ReadSource {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_source(path: &Utf8Path, field: &'static str) -> Result<String, CliError> {
    wayfarer_fs::read_to_string(path).map_err(|source| CliError::ReadSource {
        field,
        path: path.to_path_buf(),
        source,
    })
}
