/// Characters that delimit components of a display name or scope.
///
/// `::` splits because `:` is a separator; underscores and camel-case humps do
/// not split (`map_type` and `LedgerMaster` are single components).
#[inline]
pub fn is_component_separator(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            ':' | '.' | ',' | '<' | '>' | '(' | ')' | '&' | '*' | '[' | ']' | '/' | '\\'
        )
}

/// Iterator over the non-empty components of a string.
#[derive(Debug, Clone)]
pub struct Components<'a> {
    rest: &'a str,
}

/// Splits `text` into components, e.g. `ripple::test::csf` into
/// `ripple`, `test`, `csf`.
pub fn components(text: &str) -> Components<'_> {
    Components { rest: text }
}

impl<'a> Iterator for Components<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.find(|ch: char| !is_component_separator(ch))?;
        let tail = &self.rest[start..];
        let len = tail.find(is_component_separator).unwrap_or(tail.len());
        let (component, rest) = tail.split_at(len);
        self.rest = rest;
        Some(component)
    }
}
