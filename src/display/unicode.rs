//! Unicode formatting utilities

/// Multiplication dot used between factors
pub const MIDDLE_DOT: char = '·';

/// Greek small letter pi
pub const PI: char = 'π';

/// Square root sign
pub const SQRT: char = '√';

/// Convert a string into a superscript string, ignoring invalid characters
///
/// ```
/// # use plotfit::display::unicode::superscript;
/// assert_eq!(superscript("-12"), "⁻¹²");
/// ```
#[must_use]
pub fn superscript(s: &str) -> String {
    s.chars().filter_map(to_superscript).collect()
}

fn to_superscript(c: char) -> Option<char> {
    match c {
        '0' => Some('⁰'),
        '1' => Some('¹'),
        '2' => Some('²'),
        '3' => Some('³'),
        '4' => Some('⁴'),
        '5' => Some('⁵'),
        '6' => Some('⁶'),
        '7' => Some('⁷'),
        '8' => Some('⁸'),
        '9' => Some('⁹'),
        '+' => Some('⁺'),
        '-' => Some('⁻'),
        '(' => Some('⁽'),
        ')' => Some('⁾'),
        'x' => Some('ˣ'),
        _ => None,
    }
}
