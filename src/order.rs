//! Ordering of half-frames by the frame number at the end of their file names.

use std::cmp::Ordering;

/// Image extensions stripped before looking for a trailing frame number.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// How the pipeline orders its inputs before cropping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputOrder {
    /// Keep the order the images were supplied in.
    #[default]
    AsGiven,
    /// Ascending by the number ending each file name; unnumbered names go last.
    ///
    /// A trailing `.jpg`, `.jpeg` or `.png` extension is ignored, so `photo3.jpg` sorts as 3.
    TrailingNumber,
}

/// Sort key derived from a name's trailing digit run.
///
/// Numbers compare by value with no upper bound; [`SuffixKey::Missing`] sorts after every number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuffixKey {
    /// Digits with leading zeros removed (`"0"` becomes the empty string).
    Number(String),
    /// The name does not end in a digit.
    Missing,
}

impl Ord for SuffixKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Number(_), Self::Missing) => Ordering::Less,
            (Self::Missing, Self::Number(_)) => Ordering::Greater,
            (Self::Missing, Self::Missing) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SuffixKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl SuffixKey {
    /// Numeric value, when it fits in a `u64`.
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Number(digits) if digits.is_empty() => Some(0),
            Self::Number(digits) => digits.parse().ok(),
            Self::Missing => None,
        }
    }
}

/// Extract the run of ASCII digits ending `name`, ignoring a trailing image extension.
pub fn trailing_number(name: &str) -> SuffixKey {
    let stem = strip_image_extension(name);
    let run = stem.bytes().rev().take_while(u8::is_ascii_digit).count();
    let digits = &stem[stem.len() - run..];
    if digits.is_empty() {
        return SuffixKey::Missing;
    }
    SuffixKey::Number(digits.trim_start_matches('0').to_string())
}

fn strip_image_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Stable ascending sort by trailing number; ties keep their relative order.
pub fn sort_by_trailing_number<T>(items: &mut [T], name_of: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| trailing_number(name_of(item)));
}
