/// Lazy iterator over the normalized word tokens of a single line.
///
/// A character belongs to a token iff it is a Unicode letter
/// (`char::is_alphabetic`); digits, whitespace, hyphens and all other
/// punctuation terminate the current token. Letters are lowercased as they
/// are accumulated, so tokens compare case-insensitively. Zero-length
/// tokens are never emitted.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    chars: std::str::Chars<'a>,
}

/// Tokenize one line. The iterator borrows the line and can be restarted
/// by calling `tokens` again on the same input.
pub fn tokens(line: &str) -> Tokens<'_> {
    Tokens {
        chars: line.chars(),
    }
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut word = String::new();
        for ch in self.chars.by_ref() {
            if ch.is_alphabetic() {
                // Unicode lowercasing may expand a single char (e.g. 'İ')
                word.extend(ch.to_lowercase());
            } else if !word.is_empty() {
                return Some(word);
            }
        }
        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(line: &str) -> Vec<String> {
        tokens(line).collect()
    }

    #[test]
    fn test_splits_on_non_letters() {
        assert_eq!(collect("The cat sat."), ["the", "cat", "sat"]);
    }

    #[test]
    fn test_case_folded() {
        assert_eq!(collect("THE Cat"), ["the", "cat"]);
    }

    #[test]
    fn test_digits_excluded() {
        assert_eq!(collect("abc123def"), ["abc", "def"]);
    }

    #[test]
    fn test_hyphen_splits() {
        assert_eq!(collect("well-known"), ["well", "known"]);
    }

    #[test]
    fn test_punctuation_only_yields_nothing() {
        assert!(collect("... --- !!!").is_empty());
    }

    #[test]
    fn test_empty_line() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(collect("hyvää päivää"), ["hyvää", "päivää"]);
    }

    #[test]
    fn test_restartable() {
        let line = "one two";
        assert_eq!(collect(line), collect(line));
    }

    #[test]
    fn test_trailing_token_emitted() {
        assert_eq!(collect("end"), ["end"]);
    }
}
