use crate::core::models::level::Level;
use crate::core::translation::TableError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// The attribute holds no information at this level.
    #[error("No {level}-level data for attribute '{attr}': {reason}")]
    NoData {
        attr: &'static str,
        level: Level,
        reason: String,
    },

    /// The attribute cannot be assigned through this level.
    #[error("Attribute '{attr}' cannot be set at {level} level")]
    NotSupported { attr: &'static str, level: Level },

    #[error("Attribute '{attr}' is not attached to a topology")]
    Detached { attr: &'static str },

    #[error("Attribute '{attr}' expected {expected} values, found {found}")]
    LengthMismatch {
        attr: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Attribute '{attr}' holds {expected} values, got {found} values")]
    ValueKind {
        attr: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Tuple {index} of '{attr}' has {len} atoms, at least two are required")]
    InvalidTuple {
        attr: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl AttrError {
    pub(crate) fn no_data(attr: &'static str, level: Level) -> Self {
        AttrError::NoData {
            attr,
            level,
            reason: format!("not defined for {level}s"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_and_not_supported_render_distinct_messages() {
        let no_data = AttrError::no_data("bonds", Level::Residue);
        let not_supported = AttrError::NotSupported {
            attr: "masses",
            level: Level::Residue,
        };
        assert_eq!(
            no_data.to_string(),
            "No residue-level data for attribute 'bonds': not defined for residues"
        );
        assert_eq!(
            not_supported.to_string(),
            "Attribute 'masses' cannot be set at residue level"
        );
    }

    #[test]
    fn table_errors_convert_transparently() {
        let source = TableError::IndexOutOfRange {
            level: Level::Atom,
            index: 9,
            len: 4,
        };
        let err: AttrError = source.clone().into();
        assert_eq!(err.to_string(), source.to_string());
        assert_eq!(err, AttrError::Table(source));
    }
}
