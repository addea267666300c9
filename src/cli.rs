use crate::storage::DeletePolicy;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Every flag is optional and overrides the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "coursebase",
    version,
    about = "CRUD gateway for the online-courses catalogue"
)]
pub struct Cli {
    /// Interface to bind (env: APP_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (env: APP_PORT)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Snapshot file to load at startup and rewrite after every change
    /// (env: COURSEBASE_DATA_FILE)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Keep everything in memory even if a snapshot file is configured
    #[arg(long, conflicts_with = "data_file")]
    pub memory_only: bool,

    /// `cascade` or `restrict` (env: COURSEBASE_DELETE_POLICY)
    #[arg(long, value_name = "POLICY")]
    pub delete_policy: Option<DeletePolicy>,

    /// Allowed CORS origin, repeatable (env: COURSEBASE_CORS_ORIGINS, comma separated)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Log filter directive (env: RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}
