//! FSF design object — parsed design plus its derived views

use std::path::Path;

use indexmap::IndexMap;

use crate::derived::{ContrastKind, Contrasts, DerivedView, Event};
use crate::design::{FlatDesign, TypedValue};
use crate::matrix::Matrix;
use crate::parser::parse_design;
use crate::Result;

/// A parsed FEAT design file
#[derive(Debug, Clone, PartialEq)]
pub struct Fsf {
    /// Original file text
    pub contents: String,
    /// Parsed containers
    pub design: FlatDesign,
}

impl Fsf {
    /// Parse design text
    pub fn from_string(contents: &str) -> Result<Self> {
        Ok(Fsf {
            design: parse_design(contents)?,
            contents: contents.to_string(),
        })
    }

    /// Read and parse the design file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_string(&crate::read_file(path)?)
    }

    /// Attribute view of the `fmri` fields
    pub fn attrs(&self) -> Attrs<'_> {
        Attrs {
            design: &self.design,
        }
    }

    pub fn view(&self) -> DerivedView<'_> {
        DerivedView::new(&self.design)
    }

    /// First-level inputs or lower-level FEAT directories, in file order
    pub fn feat_files(&self) -> Vec<String> {
        self.design.files("feat_files")
    }

    pub fn n_contrasts(&self) -> usize {
        self.view().n_contrasts()
    }

    pub fn contrasts_real(&self) -> Result<Contrasts> {
        self.view().contrasts(ContrastKind::Real)
    }

    pub fn contrasts_orig(&self) -> Result<Contrasts> {
        self.view().contrasts(ContrastKind::Orig)
    }

    pub fn evgs(&self) -> Result<Matrix> {
        self.view().explanatory_variable_groups()
    }

    pub fn events(&self) -> Result<IndexMap<String, Event>> {
        self.view().events()
    }

    pub fn groupmem(&self) -> Result<Vec<f64>> {
        self.view().group_membership()
    }
}

impl std::str::FromStr for Fsf {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Fsf::from_string(s)
    }
}

/// Read-only lookup over the `fmri` fields of a design
#[derive(Debug, Clone, Copy)]
pub struct Attrs<'a> {
    design: &'a FlatDesign,
}

impl<'a> Attrs<'a> {
    pub fn get(&self, name: &str) -> Option<&'a TypedValue> {
        self.design.field(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(TypedValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(TypedValue::as_bool)
    }

    /// Field names in file order; dunder names are hidden
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.design
            .fmri()
            .into_iter()
            .flat_map(|fmri| fmri.keys())
            .map(String::as_str)
            .filter(|k| !k.starts_with("__"))
    }

    pub fn version(&self) -> Option<&'a str> {
        self.get_str("version")
    }

    pub fn tr(&self) -> Option<f64> {
        self.get_float("tr")
    }

    pub fn level(&self) -> Option<i64> {
        self.get_int("level")
    }

    pub fn outputdir(&self) -> Option<&'a str> {
        self.get_str("outputdir")
    }
}

/// Load a design from a file
pub fn load(path: impl AsRef<Path>) -> Result<Fsf> {
    Fsf::from_file(path)
}

/// Load a design from text
pub fn loads(contents: &str) -> Result<Fsf> {
    Fsf::from_string(contents)
}
