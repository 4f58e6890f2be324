//! Finding a call expression inside a free-text reply.

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Return the first balanced `function(...)` substring of `reply`.
///
/// Occurrences that are part of a longer identifier or an attribute access
/// (`x.function(...)`) are skipped. Parentheses inside quoted strings do not
/// count toward the balance. `None` when no complete call is present.
pub fn locate_call<'a>(reply: &'a str, function: &str) -> Option<&'a str> {
    let mut search_from = 0;

    while let Some(offset) = reply[search_from..].find(function) {
        let start = search_from + offset;
        let after_name = start + function.len();
        search_from = after_name;

        let preceded_ok = reply[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c) && c != '.');
        if !preceded_ok {
            continue;
        }

        let rest = &reply[after_name..];
        let trimmed = rest.trim_start();
        if !trimmed.starts_with('(') {
            continue;
        }
        let open = after_name + (rest.len() - trimmed.len());

        if let Some(close) = matching_paren(reply, open) {
            return Some(&reply[start..=close]);
        }
    }

    None
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }

    None
}
