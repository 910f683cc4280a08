#![forbid(unsafe_code)]

//! The lenient `%s` substitution engine.
//!
//! A template is scanned once, left to right, for two mutually exclusive
//! tokens: the escaped marker `%%s` (which always wins at a shared position)
//! and the placeholder `%s`. Escaped markers come out as the literal text
//! `%s` and never touch the argument list. Placeholders consume arguments in
//! order; once the arguments run out, remaining placeholders stay in the
//! output verbatim. Arguments left over after the scan are appended as a
//! single ` [a, b, c]` suffix.
//!
//! The function is total: there is no argument-count mismatch it treats as
//! an error, and it holds no state between calls.

use std::fmt::{self, Write as _};

/// Substitute `%s` placeholders in `template` with `args`, leniently.
///
/// Arguments are rendered with their `Display` impl. Missing arguments leave
/// the placeholder as literal `%s`; extra arguments are appended in square
/// brackets. `%%s` escapes a placeholder and yields literal `%s` without
/// consuming an argument. A `%` that starts neither token is copied through
/// unchanged.
///
/// Most callers want the variadic [`lenient_format!`] macro instead of
/// building the `&dyn Display` slice by hand.
///
/// # Examples
///
/// ```
/// use evtap_format::lenient_format;
/// use std::fmt::Display;
///
/// let args: [&dyn Display; 2] = [&1, &2];
/// assert_eq!(lenient_format("foo%%s bar%s", args), "foo%s bar1 [2]");
/// ```
pub fn lenient_format<'a, I>(template: &str, args: I) -> String
where
    I: IntoIterator<Item = &'a dyn fmt::Display>,
{
    let mut args = args.into_iter();
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(off) = bytes[pos..].iter().position(|&b| b == b'%') else {
            out.push_str(&template[pos..]);
            break;
        };
        let at = pos + off;
        // '%' and 's' are ASCII, so byte positions are always char boundaries.
        out.push_str(&template[pos..at]);
        if bytes[at..].starts_with(b"%%s") {
            // Escaped marker wins over a placeholder at the same position.
            out.push_str("%s");
            pos = at + 3;
        } else if bytes[at..].starts_with(b"%s") {
            match args.next() {
                // Writing to a String cannot fail.
                Some(arg) => {
                    let _ = write!(out, "{arg}");
                }
                None => out.push_str("%s"),
            }
            pos = at + 2;
        } else {
            out.push('%');
            pos = at + 1;
        }
    }

    if let Some(first) = args.next() {
        out.push_str(" [");
        let _ = write!(out, "{first}");
        for arg in args {
            let _ = write!(out, ", {arg}");
        }
        out.push(']');
    }

    out
}

/// Variadic front-end for [`lenient_format`].
///
/// Accepts a template followed by any number of `Display` arguments of
/// mixed types:
///
/// ```
/// use evtap_format::lenient_format;
///
/// assert_eq!(lenient_format!("%s=%s", "cursor", 3), "cursor=3");
/// assert_eq!(lenient_format!("no args"), "no args");
/// ```
#[macro_export]
macro_rules! lenient_format {
    ($template:expr $(,)?) => {
        $crate::template::lenient_format(
            $template,
            ::std::iter::empty::<&dyn ::std::fmt::Display>(),
        )
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::template::lenient_format(
            $template,
            [$(&$arg as &dyn ::std::fmt::Display),+],
        )
    };
}
