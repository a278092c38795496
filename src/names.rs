//! Name canonicalization.
//!
//! Three small transforms are applied to record names:
//!
//! - [`trim_symbols`] strips punctuation around a name (`"--barsik!"` → `"barsik"`)
//! - [`normalize`] fixes capitalization per segment (`"jean-paul"` → `"Jean-Paul"`)
//! - [`canonical_key`] produces the case-insensitive key used for uniqueness
//!   and prefix lookups
//!
//! None of them allocate more than one output string and none of them panic,
//! whatever the input.

/// Returns true for the characters that split a name into segments.
#[inline]
fn is_delimiter(c: char) -> bool {
    c == '-' || c.is_whitespace()
}

/// Canonicalizes the capitalization of a name.
///
/// The first hyphen or whitespace character found scanning left to right
/// becomes the delimiter for the whole string; the name is split on that
/// exact character only. Every segment gets an upper-case first character
/// and a lower-case remainder, and the segments are rejoined with the same
/// delimiter. Surrounding whitespace is kept as is.
///
/// Empty segments (consecutive delimiters) stay empty.
///
/// # Example
/// ```
/// use catalogdb::names::normalize;
///
/// assert_eq!(normalize("jean-paul"), "Jean-Paul");
/// assert_eq!(normalize("mary ann"), "Mary Ann");
/// assert_eq!(normalize("bob"), "Bob");
/// // Only the first delimiter kind splits.
/// assert_eq!(normalize("van-der thing"), "Van-Der thing");
/// ```
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    match name.chars().find(|c| is_delimiter(*c)) {
        Some(delimiter) => {
            for (i, segment) in name.split(delimiter).enumerate() {
                if i > 0 {
                    out.push(delimiter);
                }
                capitalize_into(segment, &mut out);
            }
        }
        None => capitalize_into(name, &mut out),
    }

    out
}

/// Appends `segment` with its first character upper-cased and the rest
/// lower-cased.
fn capitalize_into(segment: &str, out: &mut String) {
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        for c in chars {
            out.extend(c.to_lowercase());
        }
    }
}

/// Upper-cases only the first character, leaving the rest untouched.
///
/// Used for computing group titles; unlike [`normalize`] it never changes
/// the case of later characters.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips symbols around a name.
///
/// Everything before the first letter and everything after the last letter
/// or digit is removed. Letters of any script count. A name without a single
/// letter trims to the empty string.
///
/// # Example
/// ```
/// use catalogdb::names::trim_symbols;
///
/// assert_eq!(trim_symbols("  --Барсик!!"), "Барсик");
/// assert_eq!(trim_symbols("(tom 2)"), "tom 2");
/// assert_eq!(trim_symbols("123"), "");
/// ```
pub fn trim_symbols(name: &str) -> &str {
    let Some(start) = name.find(char::is_alphabetic) else {
        return "";
    };
    let rest = &name[start..];
    // The first letter guarantees a match
    let end = rest
        .char_indices()
        .filter(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Returns the case-insensitive key of a name.
///
/// Two names collide in the store if and only if their keys are equal.
/// Lexicographic order of keys is the case-insensitive order of names.
#[inline]
pub fn canonical_key(name: &str) -> String {
    name.to_lowercase()
}

/// Returns the group title of a name: its first character, upper-cased.
///
/// `None` for the empty name.
pub fn title_of(name: &str) -> Option<char> {
    name.chars().next().and_then(|c| c.to_uppercase().next())
}
