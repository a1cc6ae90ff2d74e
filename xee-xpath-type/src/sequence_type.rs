use crate::item_type::ItemType;
use crate::occurrence::Occurrence;

/// A sequence type: either the distinguished `empty-sequence()`, or an item
/// type paired with an occurrence indicator.
///
/// `empty-sequence()` is deliberately its own variant rather than
/// `(ItemType, Occurrence)` with some "empty" item type, because it is
/// incompatible with every occurrence indicator — encoding it as a
/// separate variant makes that incompatible state unrepresentable instead
/// of needing a runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SequenceType {
    /// `empty-sequence()`.
    Empty,
    /// An item type with an occurrence indicator.
    Item {
        /// The item type.
        item_type: ItemType,
        /// The occurrence indicator.
        occurrence: Occurrence,
    },
}

impl SequenceType {
    /// `item()` with no occurrence indicator, i.e. exactly one item of any
    /// kind.
    pub fn item() -> Self {
        SequenceType::Item {
            item_type: ItemType::Item,
            occurrence: Occurrence::One,
        }
    }

    /// Build a sequence type from an item type and occurrence.
    pub fn new(item_type: ItemType, occurrence: Occurrence) -> Self {
        SequenceType::Item {
            item_type,
            occurrence,
        }
    }

    /// The minimum cardinality a value must have to match.
    pub fn min_cardinality(&self) -> usize {
        match self {
            SequenceType::Empty => 0,
            SequenceType::Item { occurrence, .. } => occurrence.min_cardinality(),
        }
    }

    /// The maximum cardinality a value may have to match, or `None` for
    /// unbounded.
    pub fn max_cardinality(&self) -> Option<usize> {
        match self {
            SequenceType::Empty => Some(0),
            SequenceType::Item { occurrence, .. } => occurrence.max_cardinality(),
        }
    }
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::Empty => write!(f, "empty-sequence()"),
            SequenceType::Item {
                item_type,
                occurrence,
            } => write!(f, "{item_type}{occurrence}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_only_accepts_length_zero() {
        let empty = SequenceType::Empty;
        assert_eq!(empty.min_cardinality(), 0);
        assert_eq!(empty.max_cardinality(), Some(0));
    }

    #[test]
    fn star_is_unbounded() {
        let ty = SequenceType::new(ItemType::Item, Occurrence::Many);
        assert_eq!(ty.min_cardinality(), 0);
        assert_eq!(ty.max_cardinality(), None);
    }
}
