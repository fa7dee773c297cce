/// Splits raw input lines into command tokens.
///
/// Separator bytes end the pending token; a joiner byte opens a quoted
/// stretch in which separators lose their meaning until the same joiner byte
/// appears again. Joiner bytes never appear in the emitted tokens.
pub struct Tokenizer {
    separators: Vec<u8>,
    joiners: Vec<u8>,
}

impl Tokenizer {
    /// Tokenizer over the given separator and joiner bytes.
    ///
    /// Only ASCII bytes can cut a UTF-8 line safely, so non-ASCII delimiter
    /// bytes are dropped.
    pub fn new(separators: &[u8], joiners: &[u8]) -> Self {
        Self {
            separators: separators.iter().copied().filter(|b| b.is_ascii()).collect(),
            joiners: joiners.iter().copied().filter(|b| b.is_ascii()).collect(),
        }
    }

    /// Splits `line` into tokens, in encounter order.
    ///
    /// Consecutive separators emit nothing, so an empty or all-separator
    /// line yields no tokens; the one way to produce an empty token is an
    /// immediately closed joiner pair (`""`). A null byte truncates the
    /// line at its position. A joiner left open at the end of the line is
    /// not an error: the token collected since it opened is emitted as is.
    ///
    /// # Example
    /// ```
    /// # use relish::tokenizer::Tokenizer;
    /// let tokens = Tokenizer::default().tokenize("key1 \"has space\" key3");
    /// assert_eq!(tokens, vec!["key1", "has space", "key3"]);
    /// ```
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        let bytes = line.as_bytes();
        let mut tokens = Vec::new();
        let mut start = 0;
        let mut active_joiner: Option<u8> = None;
        let mut limit = bytes.len();
        let mut index = 0;

        while index < limit {
            let byte = bytes[index];
            if byte == 0 {
                limit = index;
                break;
            }
            match active_joiner {
                Some(joiner) if byte == joiner => {
                    // the joined stretch may be empty; "" is a valid token
                    tokens.push(line[start..index].to_string());
                    active_joiner = None;
                    start = index + 1;
                }
                Some(_) => {}
                None if self.joiners.contains(&byte) => {
                    if start != index {
                        tokens.push(line[start..index].to_string());
                    }
                    active_joiner = Some(byte);
                    start = index + 1;
                }
                None if self.separators.contains(&byte) => {
                    if start != index {
                        tokens.push(line[start..index].to_string());
                    }
                    start = index + 1;
                }
                None => {}
            }
            index += 1;
        }

        if start < limit {
            tokens.push(line[start..limit].to_string());
        }
        tokens
    }
}

impl Default for Tokenizer {
    /// Space and tab as separators, `"` as the joiner.
    fn default() -> Self {
        Self::new(b" \t", b"\"")
    }
}
