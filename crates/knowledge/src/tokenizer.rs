//! Lexical tokenizer shared by indexing and search.

/// Shortest token that is kept.
const MIN_TOKEN_LEN: usize = 2;

/// Split text into lowercase ASCII alphanumeric tokens.
///
/// Tokens are the maximal runs of `[a-z0-9]` after lower-casing; runs of a
/// single character are dropped. The sequence is produced lazily.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut chars = text.chars().flat_map(char::to_lowercase).peekable();

    std::iter::from_fn(move || loop {
        while chars.next_if(|c| !c.is_ascii_alphanumeric()).is_some() {}
        chars.peek()?;

        let mut token = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_alphanumeric) {
            token.push(c);
        }

        if token.len() >= MIN_TOKEN_LEN {
            return Some(token);
        }
    })
}
