//! Value kinds distinguished by the language.

use strum::{Display, EnumIter, IntoStaticStr};

/// The kinds of value an expression can observe.
///
/// The six JSON kinds plus `Date`, an extension kind for bindings whose
/// document model has a native date/time type. The declaration order is the
/// total order used when kinds themselves are sorted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Array,
    Object,
    Null,
    Date,
}

impl ValueKind {
    /// Lowercase name, as used in diagnostics.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
