//! FSF Core - reader for FSL FEAT design files
//!
//! Parses `.fsf` design descriptions into typed records and rebuilds the
//! numbered structures (contrasts, EV groups, events, group membership)
//! that FEAT stores as flat keys. Also reads the companion `.mat` design
//! matrix files.
//!
//! # Architecture
//!
//! ```text
//! .fsf text → grammar (per line) → DesignBuilder → FlatDesign
//!                                                      ↓
//!                                                 DerivedView → contrasts, EVGs, events, groupmem
//!
//! .mat text → parse_matrix → DesignMatrix
//! ```
//!
//! # Example
//!
//! ```ignore
//! let fsf = fsf_core::load("design.fsf")?;
//! for (name, weights) in fsf.contrasts_real()? {
//!     println!("{name}: {weights:?}");
//! }
//! ```

pub mod derived;
pub mod design;
pub mod error;
pub mod fsf;
pub mod matrix;
pub mod parser;

use std::path::Path;

/// Crate version, as reported by the `fsf version` command
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use derived::{ContrastKind, Contrasts, DerivedView, Event};
pub use design::{ContainerKind, ContainerValue, FlatDesign, TypedValue};
pub use error::{Error, Result};
pub use fsf::{load, loads, Attrs, Fsf};
pub use matrix::{parse_matrix, DesignMatrix, Matrix};
pub use parser::parse_design;

/// Read the whole file at `path` as text
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
