use std::collections::BTreeSet;

/// Split text on ASCII spaces, dropping the empty pieces between runs of spaces.
///
/// Only `' '` separates words; tabs and other control characters stay inside the
/// token so that [`is_valid_word`] can reject it.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it holds no C0 control character (anything below `' '`).
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Collect the distinct non-empty strings of a container, sorted.
pub fn make_unique_non_empty_strings<I, S>(strings: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .filter(|s| !s.as_ref().is_empty())
        .map(|s| s.as_ref().to_string())
        .collect()
}
