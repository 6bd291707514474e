//! Canonicalization tables.
//!
//! A [`CanonTable`] is an ordered list of `(internal, host)` name pairs plus a
//! marker substring that every internal name contains. The marker drives the
//! cheap pre-check in [`Canonicalizer`](crate::Canonicalizer): a message that
//! does not contain it cannot contain any internal name.
//!
//! # Invariants
//!
//! Checked by [`CanonTable::new`]:
//! - internal names are non-empty and unique
//! - an internal name never contains an earlier internal name, so specific
//!   entries (`Variable[CPUFloatType]`, `SparseCPUFloatType`) precede the
//!   shorter names they embed
//! - no host name contains an internal name, and no internal name contains a
//!   host name or overlaps one at either end, so a replacement can never form
//!   an internal name together with the text around it; this makes rewriting
//!   idempotent
//! - every internal name contains the marker

use std::borrow::Cow;

/// Marker shared by every internal tensor type name.
pub const TENSOR_TYPE_MARKER: &str = "Type";

/// Namespace used by the default host vocabulary.
pub const DEFAULT_NAMESPACE: &str = "torch";

const SCALARS: [&str; 8] = [
    "Byte", "Char", "Double", "Float", "Int", "Long", "Short", "Half",
];

/// Backend prefixes paired with the host module path they map to.
///
/// Sparse backends come first: `SparseCUDA` embeds `CUDA`.
const BACKENDS: [(&str, &str); 4] = [
    ("SparseCUDA", "cuda.sparse"),
    ("SparseCPU", "sparse"),
    ("CUDA", "cuda"),
    ("CPU", ""),
];

/// Errors reported while validating a table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("canonicalization marker is empty")]
    EmptyMarker,
    #[error("entry {index} has an empty internal name")]
    EmptyName { index: usize },
    #[error("internal name `{name}` appears more than once")]
    Duplicate { name: String },
    #[error("internal name `{longer}` must be listed before `{shorter}`, which it contains")]
    Shadowed { shorter: String, longer: String },
    #[error("host name `{host}` contains internal name `{internal}`")]
    NotIdempotent { host: String, internal: String },
    #[error("host name `{host}` can combine with surrounding text into internal name `{internal}`")]
    Overlapping { host: String, internal: String },
    #[error("internal name `{name}` does not contain the marker `{marker}`")]
    MissingMarker { name: String, marker: String },
}

/// One `(internal, host)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonEntry {
    internal: Cow<'static, str>,
    host: Cow<'static, str>,
}

impl CanonEntry {
    /// Pair an internal name with its host name. Checked once part of a table.
    pub fn new(internal: impl Into<Cow<'static, str>>, host: impl Into<Cow<'static, str>>) -> Self {
        CanonEntry {
            internal: internal.into(),
            host: host.into(),
        }
    }

    /// Name as it appears in native messages.
    pub fn internal(&self) -> &str {
        &self.internal
    }

    /// Name the host-facing API exposes for the same concept.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Ordered, validated list of canonicalization entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonTable {
    marker: Cow<'static, str>,
    entries: Vec<CanonEntry>,
}

impl CanonTable {
    /// Build a table, checking every invariant listed in the module docs.
    pub fn new(
        marker: impl Into<Cow<'static, str>>,
        entries: Vec<CanonEntry>,
    ) -> Result<Self, TableError> {
        let table = CanonTable {
            marker: marker.into(),
            entries,
        };
        table.validate()?;
        Ok(table)
    }

    /// Tensor type vocabulary mapped into `namespace`.
    ///
    /// Produces 64 entries: the `Variable[...]` wrapped forms first, then the
    /// bare forms, each ordered sparse backends before dense ones.
    pub fn tensor_types(namespace: &str) -> Result<Self, TableError> {
        Self::new(TENSOR_TYPE_MARKER, tensor_entries(namespace))
    }

    /// Table for [`DEFAULT_NAMESPACE`], which is known to be valid.
    pub(crate) fn default_tensor_types() -> Self {
        let table = CanonTable {
            marker: Cow::Borrowed(TENSOR_TYPE_MARKER),
            entries: tensor_entries(DEFAULT_NAMESPACE),
        };
        debug_assert_eq!(table.validate(), Ok(()));
        table
    }

    /// Substring every internal name contains.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Entries in replacement order.
    pub fn entries(&self) -> &[CanonEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the host name for an exact internal name.
    pub fn host_name(&self, internal: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.internal() == internal)
            .map(CanonEntry::host)
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.marker.is_empty() {
            return Err(TableError::EmptyMarker);
        }

        for (index, entry) in self.entries.iter().enumerate() {
            let name = entry.internal();
            if name.is_empty() {
                return Err(TableError::EmptyName { index });
            }
            if !name.contains(self.marker()) {
                return Err(TableError::MissingMarker {
                    name: name.to_string(),
                    marker: self.marker.to_string(),
                });
            }

            for earlier in &self.entries[..index] {
                if earlier.internal() == name {
                    return Err(TableError::Duplicate {
                        name: name.to_string(),
                    });
                }
                if name.contains(earlier.internal()) {
                    return Err(TableError::Shadowed {
                        shorter: earlier.internal().to_string(),
                        longer: name.to_string(),
                    });
                }
            }
        }

        for entry in &self.entries {
            if let Some(key) = self
                .entries
                .iter()
                .find(|key| entry.host().contains(key.internal()))
            {
                return Err(TableError::NotIdempotent {
                    host: entry.host().to_string(),
                    internal: key.internal().to_string(),
                });
            }
        }

        for entry in &self.entries {
            let host = entry.host();
            if let Some(key) = self.entries.iter().find(|key| {
                key.internal().contains(host) || overlaps_at_edge(host, key.internal())
            }) {
                return Err(TableError::Overlapping {
                    host: host.to_string(),
                    internal: key.internal().to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Does a suffix of `host` start `internal`, or a prefix of `host` end it?
fn overlaps_at_edge(host: &str, internal: &str) -> bool {
    internal
        .char_indices()
        .skip(1)
        .any(|(split, _)| host.ends_with(&internal[..split]) || host.starts_with(&internal[split..]))
}

fn tensor_entries(namespace: &str) -> Vec<CanonEntry> {
    let mut bare = Vec::with_capacity(BACKENDS.len() * SCALARS.len());
    for (backend, module) in BACKENDS {
        for scalar in SCALARS {
            let internal = format!("{backend}{scalar}{TENSOR_TYPE_MARKER}");
            let host = if module.is_empty() {
                format!("{namespace}.{scalar}Tensor")
            } else {
                format!("{namespace}.{module}.{scalar}Tensor")
            };
            bare.push((internal, host));
        }
    }

    let wrapped = bare
        .iter()
        .map(|(internal, host)| CanonEntry::new(format!("Variable[{internal}]"), host.clone()));
    let plain = bare
        .iter()
        .map(|(internal, host)| CanonEntry::new(internal.clone(), host.clone()));
    wrapped.chain(plain).collect()
}
