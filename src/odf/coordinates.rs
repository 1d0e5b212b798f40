//! Cell coordinates in A1 notation.
//!
//! Logical row and column indices computed by the tree are zero-based; the
//! A1 form used in formulas is one-based for rows and lettered for columns.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to numeric (0-indexed)
///
/// # Examples
///
/// ```
/// use odstree::odf::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("Z").unwrap(), 25);
/// assert_eq!(alpha_to_digit("AA").unwrap(), 26);
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::InvalidFormat(format!(
            "Column '{}' must contain only letters",
            alpha
        )));
    }

    let column = alpha
        .bytes()
        .try_fold(0usize, |acc, b| {
            acc.checked_mul(26)?
                .checked_add((b.to_ascii_uppercase() - b'A' + 1) as usize)
        })
        .ok_or_else(|| Error::InvalidFormat(format!("Column '{}' is out of range", alpha)))?;
    Ok(column - 1)
}

/// Convert numeric column (0-indexed) to alphabetic notation
///
/// # Examples
///
/// ```
/// use odstree::odf::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(26), "AA");
/// ```
pub fn digit_to_alpha(digit: usize) -> String {
    let mut letters = Vec::new();
    let mut n = digit + 1;
    while n > 0 {
        letters.push(b'A' + ((n - 1) % 26) as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Logical cell coordinates (column, row), both 0-indexed
///
/// # Examples
///
/// ```
/// use odstree::odf::coordinates::CellCoord;
///
/// let coord = CellCoord::new(1, 2);
/// assert_eq!(coord.to_string(), "B3");
///
/// let coord: CellCoord = "AA10".parse().unwrap();
/// assert_eq!(coord.column(), 26);
/// assert_eq!(coord.row(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    column: usize,
    row: usize,
}

impl CellCoord {
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Column index (0-indexed)
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Row index (0-indexed)
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Format as a sheet-relative formula reference, e.g. `.B3`
    pub fn to_relative_ref(&self) -> String {
        format!(".{}", self)
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (alpha, numeric) = s.split_at(split);
        if alpha.is_empty() || numeric.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "'{}' is not an A1 cell reference",
                s
            )));
        }

        let column = alpha_to_digit(alpha)?;
        let row: usize = numeric
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("Invalid row number '{}'", numeric)))?;
        if row == 0 {
            return Err(Error::InvalidFormat("Row number must be >= 1".to_string()));
        }

        Ok(Self::new(column, row - 1))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", digit_to_alpha(self.column), self.row + 1)
    }
}
