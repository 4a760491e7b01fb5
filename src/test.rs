//! Assertion macros and generators used by the test-suite.
//!
//! # Macros
//!
//! ### [`crate::function!`]
//!
//! DSL for generating polynomials. Great for generating synthetic data sets!
//! ```rust
//! plotfit::function!(const f(x) = 5 x^4 - 4 x^3 + 2.5);
//! let data = f.solve_linspace(0.0..=10.0, 11);
//! assert_eq!(data[1], (1.0, 3.5));
//! ```
//!
//! ### [`crate::assert_close`]
//! Asserts that two floats are equal within a tolerance.
//! - Uses `f64::EPSILON` unless `tolerance = ...` is given.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of the same length.

/// Generates a polynomial from a human-readable expression.
///
/// Terms are `coefficient`, `coefficient x` or `coefficient x^degree`, in any order.
/// Repeated degrees are summed.
///
/// ```rust
/// # use plotfit::function;
/// function!(f(x) = 1.0 - 3.0 x^2 + 2.0 x);
/// assert_eq!(f.coefficients(), &[1.0, 2.0, -3.0]);
///
/// // Also usable as a constant
/// function!(const G(x) = 4 x^3);
/// assert_eq!(G.degree(), 3);
/// ```
#[macro_export]
macro_rules! function {
    ($( $(+)? $c0:literal $(x $( ^ $d0:literal )?)? )+) => { {
        const LEN: usize = {
            let mut degree = 0; $(
                let d2 = 1 $(+ 1 $(* $d0 as usize)?)?;
                if d2 > degree { degree = d2; }
            )+
            degree
        };

        const COEFS: [f64; LEN] = {
            let mut coefs = [0.0; LEN];
            // coef alone is degree 0, 1 if just x, or the power if specified
            $( coefs[ 0 $(+ 1 $(* $d0 as usize)?)? ] += $c0 as f64; )+
            coefs
        };

        $crate::Polynomial::borrowed(&COEFS)
    }};

    ($name:ident (x) = $($rest:tt)+ ) => {
        let $name: $crate::Polynomial = $crate::function!($($rest)+);
    };

    (const $name:ident (x) = $($rest:tt)+ ) => {
        const $name: $crate::Polynomial<'static> = $crate::function!($($rest)+);
    };
}

/// Asserts that two floating-point values are approximately equal.
///
/// The tolerance is absolute, and defaults to `f64::EPSILON`.
///
/// # Parameters
/// - `$a`, `$b`: Values to compare.
/// - `tolerance = $tol`: *(optional)* Largest accepted difference.
/// - `$msg`: *(optional)* Custom failure message. Supports formatting arguments like `format!`.
///
/// # Examples
/// ```
/// # use plotfit::assert_close;
/// assert_close!(0.1 + 0.2, 0.3);
/// assert_close!(1.0 / 3.0, 0.3333, tolerance = 1e-4);
/// assert_close!(1.0, 1.0, "values for {} must match", "x");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tolerance = $tol:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($msg $(, $($args),*)?); )?

        let (a, b, tolerance): (f64, f64, f64) = ($a, $b, $tol);
        assert!(
            a == b || (a - b).abs() <= tolerance,
            "{msg}: {a} != {b} (tolerance {tolerance})"
        );
    }};

    ($a:expr, $b:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {
        $crate::assert_close!($a, $b, tolerance = f64::EPSILON $(, $msg $(, $($args),*)?)?)
    };
}

/// Asserts that two slices of floating-point values are approximately equal element-wise.
///
/// # Parameters
/// - `$src`: Source slice (implements `iter()`).
/// - `$dst`: Destination slice (same length as `$src`).
/// - `tolerance = $tol`: *(optional)* Largest accepted difference per element.
/// - `$msg`: *(optional)* Custom failure message. Defaults to `"{len} elements"`.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements differ by more than the tolerance.
///
/// # Examples
/// ```
/// # use plotfit::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0 + 1e-16, 2.0, 3.0];
///
/// assert_all_close!(a, b);
/// assert_all_close!(a, [1.01, 2.0, 2.99], tolerance = 0.02, "Vectors must match");
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tolerance = $tol:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {{
        let (src, dst) = (&$src, &$dst);

        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", src.len());
        $( msg = format!($msg $(, $($args),*)?); )?

        assert_eq!(src.len(), dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tolerance = $tol, "{msg} - src[{i}]");
        }
    }};

    ($src:expr, $dst:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {
        $crate::assert_all_close!($src, $dst, tolerance = f64::EPSILON $(, $msg $(, $($args),*)?)?)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_function_macro() {
        function!(f(x) = 2.0 x^3 - 1.0 x + 4.0);
        assert_eq!(f.coefficients(), &[4.0, -1.0, 0.0, 2.0]);
        assert_close!(f.y(2.0), 18.0);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_fails() {
        assert_close!(1.0, 1.1, tolerance = 0.01);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_assert_all_close_length() {
        assert_all_close!(vec![1.0, 2.0], vec![1.0]);
    }
}
