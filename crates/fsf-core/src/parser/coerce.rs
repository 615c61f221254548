//! Value coercion — picks a value type from the field name alone

use crate::design::TypedValue;
use crate::{Error, Result};

/// Conversion applied to a raw field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Text,
    Boolean,
    Integer,
    Float,
}

/// Fields whose type cannot be guessed from the name
const OVERRIDES: &[(&str, Converter)] = &[
    ("version", Converter::Text),
    ("inmelodic", Converter::Boolean),
    ("level", Converter::Integer),
    ("npts", Converter::Integer),
    ("ndelete", Converter::Integer),
    ("analysis", Converter::Integer),
    ("st", Converter::Integer),
    ("smooth", Converter::Float),
    ("tr", Converter::Float),
    ("ncon_orig", Converter::Integer),
    ("ncon_real", Converter::Integer),
    ("nftests_orig", Converter::Integer),
    ("nftests_real", Converter::Integer),
    ("ncopeinputs", Converter::Integer),
    ("paradigm_hp", Converter::Integer),
    ("totalVoxels", Converter::Integer),
    ("regstandard_nonlinear_warpres", Converter::Integer),
    ("multiple", Converter::Integer),
];

/// Choose the converter for `field`: override table, then `_yn` suffix,
/// then text.
pub fn converter_for(field: &str) -> Converter {
    if let Some((_, conv)) = OVERRIDES.iter().find(|(name, _)| *name == field) {
        return *conv;
    }
    if field.ends_with("_yn") {
        return Converter::Boolean;
    }
    Converter::Text
}

impl Converter {
    pub fn name(self) -> &'static str {
        match self {
            Converter::Text => "string",
            Converter::Boolean => "boolean",
            Converter::Integer => "integer",
            Converter::Float => "float",
        }
    }

    /// Convert `raw`, naming `field` in any error
    pub fn convert(self, field: &str, raw: &str) -> Result<TypedValue> {
        let fail = || Error::CoercionFailure {
            field: field.to_string(),
            raw: raw.to_string(),
            expected: self.name(),
        };
        match self {
            Converter::Text => Ok(TypedValue::String(raw.to_string())),
            Converter::Boolean => parse_flag(raw).map(TypedValue::Boolean).ok_or_else(fail),
            Converter::Integer => raw
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|_| fail()),
            Converter::Float => raw
                .trim()
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|_| fail()),
        }
    }
}

/// Integer text interpreted as a flag: nonzero is true
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    raw.trim().parse::<i64>().ok().map(|v| v != 0)
}

/// Convert `raw` by the type implied by `field`
pub fn coerce(field: &str, raw: &str) -> Result<TypedValue> {
    converter_for(field).convert(field, raw)
}
