//! Per-line style spans for JSON tokens. A lexical approximation in the
//! single-line scope: JSON has no multi-line tokens, so every line can be
//! scanned independently and statelessly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    Key,
    String,
    Number,
    Boolean,
    Null,
}

/// One styled region of a line, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpan {
    pub start: usize,
    pub length: usize,
    pub class: StyleClass,
}

impl StyleSpan {
    fn new(start: usize, length: usize, class: StyleClass) -> Self {
        Self {
            start,
            length,
            class,
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Scans one line of raw text and emits style spans for JSON tokens.
///
/// Classification follows the token's context: a quoted string followed by
/// optional whitespace and a colon is a key, one preceded by a colon is a
/// string value, and a bare quoted string (an array element) gets no span.
/// Numbers and the `true`/`false`/`null` words match only at word
/// boundaries. Escaped quotes inside strings are followed, the same way the
/// tokenizer consumes them.
pub fn annotate_line(line: &str) -> Vec<StyleSpan> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut pos = 0;
    // Last significant char before the current token; ':' marks value position.
    let mut prev = None;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        match ch {
            '"' => {
                let start = pos;
                pos += 1;
                while pos < chars.len() && chars[pos] != '"' {
                    if chars[pos] == '\\' {
                        pos += 1;
                    }
                    pos += 1;
                }
                if pos < chars.len() {
                    pos += 1; // closing quote
                }

                let mut look = pos;
                while look < chars.len() && chars[look].is_whitespace() {
                    look += 1;
                }
                if look < chars.len() && chars[look] == ':' {
                    spans.push(StyleSpan::new(start, pos - start, StyleClass::Key));
                } else if prev == Some(':') {
                    spans.push(StyleSpan::new(start, pos - start, StyleClass::String));
                }
                prev = Some('"');
            }
            '-' | '0'..='9' if pos == 0 || !is_word_char(chars[pos - 1]) => {
                let start = pos;
                if chars[pos] == '-' {
                    pos += 1;
                }
                let mut has_digits = false;
                while pos < chars.len()
                    && (chars[pos].is_ascii_digit()
                        || chars[pos] == '.'
                        || chars[pos] == 'e'
                        || chars[pos] == 'E'
                        || chars[pos] == '+'
                        || chars[pos] == '-')
                {
                    has_digits |= chars[pos].is_ascii_digit();
                    pos += 1;
                }
                let bounded = pos >= chars.len() || !is_word_char(chars[pos]);
                if has_digits && bounded {
                    spans.push(StyleSpan::new(start, pos - start, StyleClass::Number));
                }
                prev = Some('0');
            }
            't' | 'f' | 'n' if pos == 0 || !is_word_char(chars[pos - 1]) => {
                let start = pos;
                while pos < chars.len() && is_word_char(chars[pos]) {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                let class = match word.as_str() {
                    "true" | "false" => Some(StyleClass::Boolean),
                    "null" => Some(StyleClass::Null),
                    _ => None,
                };
                if let Some(class) = class {
                    spans.push(StyleSpan::new(start, pos - start, class));
                }
                prev = Some('w');
            }
            _ => {
                prev = Some(ch);
                pos += 1;
            }
        }
    }

    spans
}
