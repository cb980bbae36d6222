//! Chamber Setup
//!
//! Loading the bill, the roster and the facts pack from disk, and building
//! the legislature from them.

pub mod bill;
pub mod facts;
pub mod roster;

pub use bill::load_bill;
pub use facts::{facts_to_prompt_block, load_facts, Fact};
pub use roster::{AgencyConfig, AgentSettings, Legislature, RepresentativeConfig, Roster};

use std::path::PathBuf;
use thiserror::Error;

use crate::components::RosterError;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bill file {} is empty", .0.display())]
    EmptyBill(PathBuf),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, SetupError> {
    std::fs::read_to_string(path).map_err(|source| SetupError::Io {
        path: path.to_path_buf(),
        source,
    })
}
