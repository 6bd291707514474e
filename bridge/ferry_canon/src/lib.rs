//! Message canonicalization for the native/host boundary.
//!
//! Native error and warning messages name internal types (`CPUFloatType`,
//! `Variable[SparseCUDAHalfType]`, ...). Before a message reaches the host it
//! is rewritten so it speaks the host's vocabulary (`torch.FloatTensor`,
//! `torch.cuda.sparse.HalfTensor`, ...).
//!
//! # Guarantees
//!
//! - Messages without any internal name come back unchanged.
//! - Rewriting is idempotent (a table invariant, see [`CanonTable`]).
//! - Names are replaced as whole tokens; `CPUFloatType` is not rewritten
//!   inside `MyCPUFloatTypeX`.
//! - A message that does not contain the table marker is returned after a
//!   single substring scan.
//!
//! ```text
//! let mut msg = String::from("expected CPUFloatType but got CUDALongType");
//! ferry_canon::canonicalize_in_place(&mut msg);
//! assert_eq!(msg, "expected torch.FloatTensor but got torch.cuda.LongTensor");
//! ```

mod table;

use std::sync::{Arc, LazyLock};

pub use table::{CanonEntry, CanonTable, TableError, DEFAULT_NAMESPACE, TENSOR_TYPE_MARKER};

static SHARED: LazyLock<Arc<Canonicalizer>> = LazyLock::new(|| Arc::new(Canonicalizer::default()));

/// Process-wide canonicalizer over the default tensor type table.
pub fn shared() -> Arc<Canonicalizer> {
    Arc::clone(&SHARED)
}

/// Rewrite `message` in place with the process-wide table.
pub fn canonicalize_in_place(message: &mut String) -> bool {
    SHARED.canonicalize_in_place(message)
}

/// Rewritten copy of `message` using the process-wide table.
pub fn canonicalize(message: impl Into<String>) -> String {
    SHARED.canonicalize(message)
}

/// Stateless rewriter over one [`CanonTable`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Canonicalizer {
    table: CanonTable,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Canonicalizer {
            table: CanonTable::default_tensor_types(),
        }
    }
}

impl Canonicalizer {
    /// Create a canonicalizer over `table`.
    pub fn new(table: CanonTable) -> Self {
        Canonicalizer { table }
    }

    /// Table this canonicalizer rewrites with.
    pub fn table(&self) -> &CanonTable {
        &self.table
    }

    /// Cheap pre-check: can `message` contain any internal name at all?
    #[inline]
    pub fn may_need_rewrite(&self, message: &str) -> bool {
        message.contains(self.table.marker())
    }

    /// Replace every internal name in `message` with its host name.
    ///
    /// Returns `true` if anything was replaced.
    pub fn canonicalize_in_place(&self, message: &mut String) -> bool {
        if !self.may_need_rewrite(message) {
            return false;
        }

        let mut changed = false;
        for entry in self.table.entries() {
            changed |= replace_tokens(message, entry.internal(), entry.host());
        }
        changed
    }

    /// Rewritten copy of `message`.
    pub fn canonicalize(&self, message: impl Into<String>) -> String {
        let mut message = message.into();
        self.canonicalize_in_place(&mut message);
        message
    }
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Is the match `haystack[start..end]` of `needle` a whole token?
///
/// An edge of the needle that is an identifier character must not touch
/// another identifier character in the haystack. Edges like `[` or `]` are
/// always boundaries.
fn is_whole_token(haystack: &str, start: usize, end: usize, needle: &str) -> bool {
    let open_ok = !needle.starts_with(is_ident_char) || !haystack[..start].ends_with(is_ident_char);
    let close_ok = !needle.ends_with(is_ident_char) || !haystack[end..].starts_with(is_ident_char);
    open_ok && close_ok
}

fn replace_tokens(message: &mut String, from: &str, to: &str) -> bool {
    if !message.contains(from) {
        return false;
    }

    let mut out = String::with_capacity(message.len() + to.len());
    let mut cursor = 0;
    for (start, _) in message.match_indices(from) {
        let end = start + from.len();
        if !is_whole_token(message, start, end, from) {
            continue;
        }
        out.push_str(&message[cursor..start]);
        out.push_str(to);
        cursor = end;
    }

    if cursor == 0 {
        return false;
    }
    out.push_str(&message[cursor..]);
    *message = out;
    true
}
