//! Derived views over the flat `fmri` namespace
//!
//! FEAT writes numbered structures as flat keys: `conname_real.2`,
//! `con_real2.5`, `evg3.1`, `evtitle4`, `groupmem.7`. The views here
//! collect keys under a prefix, order them by their trailing index and
//! rebuild the structure. Nothing is cached; each call rescans the design.

use indexmap::IndexMap;
use serde::Serialize;

use crate::design::{FlatDesign, TypedValue};
use crate::matrix::Matrix;
use crate::parser::coerce::parse_flag;
use crate::{Error, Result};

/// Which contrast set to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastKind {
    /// Contrasts over the full set of EVs, including derived ones
    Real,
    /// Contrasts over the EVs as the user entered them
    Orig,
}

impl ContrastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContrastKind::Real => "real",
            ContrastKind::Orig => "orig",
        }
    }
}

/// Contrast name to weight vector, in contrast order
pub type Contrasts = IndexMap<String, Vec<f64>>;

/// Per-event model settings; `None` where the design does not set the field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    pub shape: Option<i64>,
    pub convolve: Option<i64>,
    pub convolve_phase: Option<f64>,
    pub tempfilt: Option<bool>,
    pub deriv: Option<bool>,
    pub custom: Option<String>,
}

/// Read-only projections of a design's `fmri` container
#[derive(Debug, Clone, Copy)]
pub struct DerivedView<'a> {
    design: &'a FlatDesign,
}

impl<'a> DerivedView<'a> {
    pub fn new(design: &'a FlatDesign) -> Self {
        DerivedView { design }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<(&'a String, &'a TypedValue)> {
        self.design
            .fmri()
            .map(|fmri| fmri.iter().filter(|(k, _)| k.starts_with(prefix)).collect())
            .unwrap_or_default()
    }

    fn count_prefix(&self, prefix: &str) -> usize {
        self.keys_with_prefix(prefix).len()
    }

    /// Indexed keys under `prefix` with their values, ordered by index
    fn numbered_entries(&self, prefix: &str) -> Result<Vec<(u64, &'a String, &'a TypedValue)>> {
        let mut entries = Vec::new();
        for (key, value) in self.keys_with_prefix(prefix) {
            let index = trailing_index(key).ok_or_else(|| Error::UnindexedKey {
                prefix: prefix.to_string(),
                key: key.clone(),
            })?;
            entries.push((index, key, value));
        }
        entries.sort_by_key(|(index, _, _)| *index);
        if let Some(pair) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateIndex {
                prefix: prefix.to_string(),
                index: pair[0].0,
            });
        }
        Ok(entries)
    }

    /// Values of all keys starting with `prefix`, ordered by the key's
    /// trailing integer
    ///
    /// # Errors
    /// `UnindexedKey` when a matching key has no trailing digits;
    /// `DuplicateIndex` when two keys share a trailing integer.
    pub fn numbered_vals(&self, prefix: &str) -> Result<Vec<&'a TypedValue>> {
        Ok(self
            .numbered_entries(prefix)?
            .into_iter()
            .map(|(_, _, value)| value)
            .collect())
    }

    /// [`numbered_vals`](Self::numbered_vals) converted to numbers
    pub fn numbered_numbers(&self, prefix: &str) -> Result<Vec<f64>> {
        self.numbered_entries(prefix)?
            .into_iter()
            .map(|(_, key, value)| {
                value.as_f64().ok_or_else(|| Error::NotNumeric {
                    key: key.clone(),
                    raw: value.to_string(),
                })
            })
            .collect()
    }

    /// Number of contrasts, counted from the `conname_real.*` keys
    pub fn n_contrasts(&self) -> usize {
        self.count_prefix("conname_real.")
    }

    /// Named contrast vectors of one kind, in contrast order
    ///
    /// Empty when the design has no `conname_<kind>.1`. Both kinds must
    /// name the same number of contrasts, and names must be unique.
    pub fn contrasts(&self, kind: ContrastKind) -> Result<Contrasts> {
        let tag = kind.as_str();
        let mut contrasts = Contrasts::new();
        if self.design.field(&format!("conname_{}.1", tag)).is_none() {
            return Ok(contrasts);
        }

        let expected = self.n_contrasts();
        let found = self.count_prefix(&format!("conname_{}.", tag));
        if found != expected {
            return Err(Error::ContrastCountMismatch {
                kind: tag,
                expected,
                found,
            });
        }

        // 1-based in the file
        for con_no in 1..=expected {
            let name_key = format!("conname_{}.{}", tag, con_no);
            let name = self
                .design
                .field(&name_key)
                .ok_or(Error::MissingDerivedKey(name_key))?;
            let weights = self.numbered_numbers(&format!("con_{}{}.", tag, con_no))?;
            if contrasts.insert(name.to_string(), weights).is_some() {
                return Err(Error::DuplicateName {
                    view: "contrasts",
                    name: name.to_string(),
                });
            }
        }
        Ok(contrasts)
    }

    /// Explanatory variable groups, one row per group
    ///
    /// Groups are read from `evg1.*`, `evg2.*`, ... up to the first
    /// group with no values.
    pub fn explanatory_variable_groups(&self) -> Result<Matrix> {
        let mut rows = Vec::new();
        for evg_no in 1.. {
            let vals = self.numbered_numbers(&format!("evg{}.", evg_no))?;
            if vals.is_empty() {
                break;
            }
            rows.push(vals);
        }
        Matrix::from_rows(rows)
    }

    /// Per-event settings keyed by event title; titles must be unique
    pub fn events(&self) -> Result<IndexMap<String, Event>> {
        let titles = self.numbered_entries("evtitle")?;
        let mut events = IndexMap::new();
        for (pos, (index, _, title)) in titles.into_iter().enumerate() {
            let ev_no = pos as u64 + 1;
            if index != ev_no {
                return Err(Error::MissingDerivedKey(format!("evtitle{}", ev_no)));
            }
            if events.insert(title.to_string(), self.event(ev_no)?).is_some() {
                return Err(Error::DuplicateName {
                    view: "events",
                    name: title.to_string(),
                });
            }
        }
        Ok(events)
    }

    fn event(&self, ev_no: u64) -> Result<Event> {
        Ok(Event {
            shape: self.event_field(ev_no, "shape", "integer", |raw| {
                raw.trim().parse().ok()
            })?,
            convolve: self.event_field(ev_no, "convolve", "integer", |raw| {
                raw.trim().parse().ok()
            })?,
            convolve_phase: self.event_field(ev_no, "convolve_phase", "float", |raw| {
                raw.trim().parse().ok()
            })?,
            tempfilt: self.event_field(ev_no, "tempfilt_yn", "boolean", parse_flag)?,
            deriv: self.event_field(ev_no, "deriv_yn", "boolean", parse_flag)?,
            custom: self.event_field(ev_no, "custom", "string", |raw| Some(raw.to_string()))?,
        })
    }

    fn event_field<T>(
        &self,
        ev_no: u64,
        name: &str,
        expected: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        let key = format!("{}{}", name, ev_no);
        let Some(value) = self.design.field(&key) else {
            return Ok(None);
        };
        let raw = value.to_string();
        parse(&raw).map(Some).ok_or(Error::CoercionFailure {
            field: key,
            raw,
            expected,
        })
    }

    /// Group membership per input, from `groupmem.*`; empty if absent
    pub fn group_membership(&self) -> Result<Vec<f64>> {
        self.numbered_numbers("groupmem.")
    }
}

/// Integer formed by the run of ASCII digits at the end of `key`
fn trailing_index(key: &str) -> Option<u64> {
    let digits = key.len() - key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    key[key.len() - digits..].parse().ok()
}
