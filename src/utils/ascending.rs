//! `AscendingPositions` struct, a list of sequence positions that is
//! guaranteed strictly ascending at creation

use crate::Error;
use serde::Serialize;
use std::fmt::Debug;

/// Checks that the keys of a sequence of items are strictly ascending.
/// `what` names the data in the error message.
///
/// ```
/// use r2rmod_core::check_strictly_ascending;
/// assert!(check_strictly_ascending([1, 4, 9], "positions").is_ok());
/// assert!(check_strictly_ascending([1, 4, 4], "positions").is_err());
/// assert!(check_strictly_ascending(Vec::<u8>::new(), "positions").is_ok());
/// ```
///
/// # Errors
/// `InvalidCoordinateOrdering` at the first pair of items out of order.
pub fn check_strictly_ascending<I, T>(items: I, what: &str) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: PartialOrd + Debug,
{
    let mut prev: Option<T> = None;
    for (idx, item) in items.into_iter().enumerate() {
        if let Some(p) = prev.as_ref()
            && *p >= item
        {
            return Err(Error::InvalidCoordinateOrdering(format!(
                "{what}: {p:?} followed by {item:?} at index {idx}"
            )));
        }
        prev = Some(item);
    }
    Ok(())
}

/// Positions along a sequence, strictly ascending.
/// The only way to build one is through [`AscendingPositions::new`],
/// so holders never need to re-check ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AscendingPositions(Vec<usize>);

impl AscendingPositions {
    /// Constructor, fails if the positions are not strictly ascending.
    ///
    /// ```
    /// use r2rmod_core::AscendingPositions;
    /// let x = AscendingPositions::new(vec![2, 5, 11])?;
    /// assert_eq!(x.get(), &[2, 5, 11]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    /// ```should_panic
    /// use r2rmod_core::AscendingPositions;
    /// let x = AscendingPositions::new(vec![5, 2]).unwrap();
    /// ```
    ///
    /// # Errors
    /// `InvalidCoordinateOrdering` if positions repeat or go backwards.
    pub fn new(positions: Vec<usize>) -> Result<Self, Error> {
        check_strictly_ascending(&positions, "positions")?;
        Ok(AscendingPositions(positions))
    }
    /// Returns the positions
    #[must_use]
    pub fn get(&self) -> &[usize] {
        &self.0
    }
    /// Number of positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Whether there are no positions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<usize>> for AscendingPositions {
    type Error = Error;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        AscendingPositions::new(value)
    }
}

impl From<AscendingPositions> for Vec<usize> {
    fn from(value: AscendingPositions) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_empty_are_ascending() {
        assert!(AscendingPositions::new(vec![]).expect("no error").is_empty());
        assert_eq!(AscendingPositions::new(vec![7]).expect("no error").len(), 1);
    }

    #[test]
    #[should_panic(expected = "InvalidCoordinateOrdering")]
    fn duplicates_panic() {
        let _ = AscendingPositions::new(vec![1, 3, 3, 4]).unwrap();
    }

    #[test]
    fn error_names_offending_items() {
        let err = check_strictly_ascending([(0, 10), (2, 9), (1, 11)], "pairs").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pairs"));
        assert!(msg.contains("(2, 9)"));
        assert!(msg.contains("(1, 11)"));
        assert!(msg.contains("index 2"));
    }
}
