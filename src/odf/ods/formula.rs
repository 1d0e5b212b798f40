//! Relative row references in OpenFormula expressions.
//!
//! ODF cells store formulas like `of:=SUM([.A1:.A9])+[.B2]`, where `.A1`
//! names a cell on the current sheet. When rows are inserted or deleted the
//! row numbers of these references must move with the rows they point at.
//! Sheet-qualified (`Sheet2.A1`, `'My Sheet'.A1`) and absolute (`.$A$1`)
//! references are left alone.
//!
//! # References
//!
//! - OpenFormula 1.2 Specification, §5.8 (References)

use crate::odf::coordinates::CellCoord;
use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// A `.` + column letters + row digits, not preceded by a name character
/// (which would make it sheet-qualified) or a quote.
static RELATIVE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_$'])\.([A-Z]+)([0-9]+)").expect("Failed to build reference matcher")
});

/// Move row references that lie below `from_row`.
///
/// A reference with one-based row number `n` is shifted by `delta` iff
/// `n - 1 > from_row`; column letters never change. Input is returned
/// borrowed when nothing was rewritten.
///
/// # Examples
///
/// ```
/// use odstree::odf::ods::formula::shift_row_references;
///
/// assert_eq!(shift_row_references(".A5+.B2", 3, 1), ".A6+.B2");
/// assert_eq!(shift_row_references("of:=SUM([.A2:.A9])", 4, -1), "of:=SUM([.A2:.A8])");
/// assert_eq!(shift_row_references("of:=[Sheet2.A9]", 0, 1), "of:=[Sheet2.A9]");
/// ```
pub fn shift_row_references(formula: &str, from_row: i64, delta: i64) -> Cow<'_, str> {
    let mut changed = false;
    let rewritten = RELATIVE_REF.replace_all(formula, |caps: &Captures<'_>| {
        let whole = &caps[0];
        let Ok(row) = caps[3].parse::<i64>() else {
            return whole.to_string();
        };
        match row.checked_add(delta) {
            Some(shifted) if row - 1 > from_row && shifted >= 1 => {
                changed = true;
                format!("{}.{}{}", &caps[1], &caps[2], shifted)
            },
            _ => whole.to_string(),
        }
    });

    if changed {
        trace!("shifted formula '{}' -> '{}'", formula, rewritten);
        Cow::Owned(rewritten.into_owned())
    } else {
        Cow::Borrowed(formula)
    }
}

/// Relative references in a formula, in order of appearance.
///
/// # Examples
///
/// ```
/// use odstree::odf::coordinates::CellCoord;
/// use odstree::odf::ods::formula::relative_references;
///
/// let refs = relative_references("of:=[.B3]*[.AA10]");
/// assert_eq!(refs, [CellCoord::new(1, 2), CellCoord::new(26, 9)]);
/// ```
pub fn relative_references(formula: &str) -> Vec<CellCoord> {
    RELATIVE_REF
        .captures_iter(formula)
        .filter_map(|caps| format!("{}{}", &caps[2], &caps[3]).parse().ok())
        .collect()
}
