//! Shape of nested arrays and sequences.
//!
//! A dynamically typed array or sequence is described on the wire by its shape (how many levels of
//! nesting, the length of each level, whether the nesting is ragged) followed by the descriptor of
//! its leaf element. Array lengths are part of the type and always exact. Sequence lengths are
//! sampled from the first element at each level and are only hints; they are omitted entirely when
//! sibling sequences along the sampled path have different lengths.
//!
//! Sampling follows a single path, so raggedness below the first element of each level goes
//! undetected.

use crate::{kind::Type, value::Value};

/// One level of nesting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Fixed-length array.
    Array(usize),
    /// Sequence with a representative length (`None` when unknown or unreliable).
    Sequence(Option<usize>),
}

/// Nesting levels of an array or sequence type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    levels: Vec<Level>,
    jagged: bool,
}

impl Shape {
    pub(crate) fn new(levels: Vec<Level>, jagged: bool) -> Self {
        Self { levels, jagged }
    }

    /// Walks the array and sequence levels of `ty`, sampling lengths from `value` when provided.
    ///
    /// Returns the shape and the leaf element type.
    pub fn resolve<'a>(ty: &'a Type, value: Option<&Value>) -> (Self, &'a Type) {
        let mut levels = Vec::new();
        let mut jagged = false;
        let mut ty = ty;
        let mut sample = value.and_then(Value::as_items);
        loop {
            let elem = match ty {
                Type::Array(len, elem) => {
                    levels.push(Level::Array(*len));
                    elem
                }
                Type::Sequence(elem) => {
                    levels.push(Level::Sequence(Some(sample.map_or(0, <[Value]>::len))));
                    elem
                }
                _ => break,
            };

            // Siblings of a nested sequence must agree on their length.
            if let (Type::Sequence(_), Some(items)) = (elem.as_ref(), sample) {
                let mut lengths = items
                    .iter()
                    .map(|item| item.as_items().map_or(0, <[Value]>::len));
                if let Some(first) = lengths.next() {
                    jagged |= lengths.any(|len| len != first);
                }
            }

            sample = sample
                .and_then(|items| items.first())
                .and_then(Value::as_items);
            ty = elem;
        }

        if jagged {
            for level in &mut levels {
                if let Level::Sequence(len) = level {
                    *len = None;
                }
            }
        }
        (Self { levels, jagged }, ty)
    }

    /// Number of nesting levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_jagged(&self) -> bool {
        self.jagged
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Rebuilds the full type around a leaf element type.
    pub fn wrap(&self, leaf: Type) -> Type {
        self.levels.iter().rev().fold(leaf, |inner, level| match level {
            Level::Array(len) => Type::Array(*len, Box::new(inner)),
            Level::Sequence(_) => Type::Sequence(Box::new(inner)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(elem: Type) -> Type {
        Type::Sequence(Box::new(elem))
    }

    fn ints(values: &[i64]) -> Value {
        Value::Sequence(Type::Int, values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn test_flat_array() {
        let ty = Type::Array(3, Box::new(Type::U64));
        let (shape, leaf) = Shape::resolve(&ty, None);
        assert_eq!(shape.depth(), 1);
        assert!(!shape.is_jagged());
        assert_eq!(shape.levels(), &[Level::Array(3)]);
        assert_eq!(leaf, &Type::U64);
        assert_eq!(shape.wrap(leaf.clone()), ty);
    }

    #[test]
    fn test_uniform_nested_sequence() {
        let ty = seq(seq(Type::Int));
        let value = Value::Sequence(seq(Type::Int), vec![ints(&[1, 2]), ints(&[3, 4])]);
        let (shape, leaf) = Shape::resolve(&ty, Some(&value));
        assert_eq!(
            shape.levels(),
            &[Level::Sequence(Some(2)), Level::Sequence(Some(2))]
        );
        assert!(!shape.is_jagged());
        assert_eq!(leaf, &Type::Int);
    }

    #[test]
    fn test_jagged_sequence() {
        let ty = seq(seq(Type::Int));
        let value = Value::Sequence(seq(Type::Int), vec![ints(&[1, 2, 3]), ints(&[4])]);
        let (shape, _) = Shape::resolve(&ty, Some(&value));
        assert!(shape.is_jagged());
        assert_eq!(shape.levels(), &[Level::Sequence(None), Level::Sequence(None)]);
    }

    #[test]
    fn test_mixed_levels() {
        let ty = Type::Array(2, Box::new(seq(Type::String)));
        let (shape, leaf) = Shape::resolve(&ty, None);
        assert_eq!(shape.levels(), &[Level::Array(2), Level::Sequence(Some(0))]);
        assert_eq!(leaf, &Type::String);
        assert_eq!(shape.wrap(Type::String), ty);
    }

    #[test]
    fn test_scalar_has_no_levels() {
        let (shape, leaf) = Shape::resolve(&Type::Bool, None);
        assert_eq!(shape.depth(), 0);
        assert_eq!(leaf, &Type::Bool);
    }
}
