use mongodb::error::{Error as DriverError, ErrorKind};
use thiserror::Error;

/// Server code for `NamespaceNotFound`, returned when the collection is missing.
const NAMESPACE_NOT_FOUND: i32 = 26;
/// Server code for `IndexNotFound`.
const INDEX_NOT_FOUND: i32 = 27;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error ({uri}): {source}")]
    Connect {
        uri: String,
        #[source]
        source: DriverError,
    },

    #[error("Write error ({op}): {source}")]
    Write {
        op: &'static str,
        #[source]
        source: DriverError,
    },

    #[error("Read error ({op}): {source}")]
    Read {
        op: &'static str,
        #[source]
        source: DriverError,
    },

    #[error("Index error ({name}): {source}")]
    Index {
        name: String,
        #[source]
        source: DriverError,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
}

impl StoreError {
    pub(crate) fn write(op: &'static str) -> impl FnOnce(DriverError) -> Self {
        move |source| Self::Write { op, source }
    }

    pub(crate) fn read(op: &'static str) -> impl FnOnce(DriverError) -> Self {
        move |source| Self::Read { op, source }
    }

    pub(crate) fn index(name: &str) -> impl FnOnce(DriverError) -> Self {
        let name = name.to_string();
        move |source| Self::Index { name, source }
    }
}

pub(crate) fn is_missing_index_error(err: &DriverError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => {
            matches!(cmd.code, INDEX_NOT_FOUND | NAMESPACE_NOT_FOUND)
                || cmd.code_name == "IndexNotFound"
        }
        _ => false,
    }
}
