//! FSF parser — line grammar, value coercion and design builder
//!
//! Folds `.fsf` text into a [`FlatDesign`], one line at a time.
//!
//! # Rules
//! - Lines that are not `set` statements are skipped
//! - All-digit field tokens are 1-based positions in a sequence container
//! - Other field tokens are named fields, typed by [`coerce::converter_for`]

pub mod coerce;
pub mod grammar;

use tracing::{debug, trace};

use crate::design::{ContainerKind, ContainerValue, FlatDesign, TypedValue};
use crate::{Error, Result};

use self::grammar::Statement;

/// Parse `.fsf` text into a flat design
///
/// # Errors
/// Fails on the first out-of-order sequence entry, unknown container,
/// container kind mismatch or failed coercion. Errors carry the 1-based
/// line number.
pub fn parse_design(text: &str) -> Result<FlatDesign> {
    let mut builder = DesignBuilder::new();
    for (idx, line) in text.lines().enumerate() {
        builder.push_line(idx + 1, line)?;
    }
    let design = builder.finish();
    debug!(
        containers = design.containers.len(),
        fields = design.fmri().map_or(0, |f| f.len()),
        "parsed design"
    );
    Ok(design)
}

/// Accumulates statements into a [`FlatDesign`]
#[derive(Debug, Default)]
pub struct DesignBuilder {
    design: FlatDesign,
}

impl DesignBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one source line; non-statements are ignored
    pub fn push_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        match grammar::match_line(line) {
            Some(statement) => self.push(line_no, statement),
            None => {
                trace!(line = line_no, "skipping non-statement line");
                Ok(())
            }
        }
    }

    /// Apply one parsed statement
    pub fn push(&mut self, line_no: usize, statement: Statement<'_>) -> Result<()> {
        let Statement {
            container: name,
            field,
            value,
        } = statement;

        if !self.design.containers.contains_key(name) {
            let kind = ContainerKind::lookup(name).ok_or_else(|| Error::UnknownContainer {
                line: line_no,
                container: name.to_string(),
            })?;
            debug!(container = name, kind = kind.name(), "new container");
            self.design
                .containers
                .insert(name.to_string(), ContainerValue::new(kind));
        }
        let container = self
            .design
            .containers
            .get_mut(name)
            .ok_or_else(|| Error::UnknownContainer {
                line: line_no,
                container: name.to_string(),
            })?;

        let mismatch = |kind: ContainerKind| Error::ContainerKindMismatch {
            line: line_no,
            container: name.to_string(),
            field: field.to_string(),
            kind: kind.name(),
        };

        if is_position(field) {
            let ContainerValue::Sequence(items) = container else {
                return Err(mismatch(ContainerKind::Object));
            };
            // overflow and 0 both land here
            match field.parse::<usize>() {
                Ok(position) if position == items.len() + 1 => {}
                _ => {
                    return Err(Error::SequenceOrderViolation {
                        line: line_no,
                        container: name.to_string(),
                        token: field.to_string(),
                        expected: items.len(),
                    });
                }
            }
            items.push(TypedValue::String(value.to_string()));
        } else {
            let ContainerValue::Object(fields) = container else {
                return Err(mismatch(ContainerKind::Sequence));
            };
            let typed = coerce::coerce(field, value)?;
            fields.insert(field.to_string(), typed);
        }
        Ok(())
    }

    pub fn finish(self) -> FlatDesign {
        self.design
    }
}

/// A field token made only of ASCII digits, whatever its magnitude
fn is_position(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}
