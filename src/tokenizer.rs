//! Turning raw input into argv-style tokens.

/// Copy an already-split argument vector into owned tokens.
///
/// No further splitting or unescaping happens on this path.
pub fn from_argv<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().map(|s| s.as_ref().to_string()).collect()
}

/// Split a free-form command string into tokens.
///
/// Whitespace separates tokens except inside a double-quoted span. A
/// backslash makes the next character literal, inside or outside quotes.
/// Quoted text joins whatever it touches, so `-d"a b"` is the single token
/// `-da b`, and `""` on its own is an empty token. A quote left open runs to
/// the end of the input.
pub fn split(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_token = false;
    let mut in_quote = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // a lone trailing backslash stays literal
                cur.push(chars.next().unwrap_or('\\'));
                in_token = true;
            }
            '"' => {
                in_quote = !in_quote;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quote => {
                if in_token {
                    out.push(std::mem::take(&mut cur));
                    in_token = false;
                }
            }
            c => {
                cur.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        out.push(cur);
    }
    out
}
