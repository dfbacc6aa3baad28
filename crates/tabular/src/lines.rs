//! Line splitting and field tokenization.

/// Single-pass iterator over the lines of decoded tool output.
///
/// Splits on `\n`, drops one trailing `\r`, and still yields a final line
/// that has no terminator.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a str>,
}

#[must_use]
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        rest: if text.is_empty() { None } else { Some(text) },
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let (line, tail) = match rest.find('\n') {
            Some(idx) => {
                let tail = &rest[idx + 1..];
                (&rest[..idx], if tail.is_empty() { None } else { Some(tail) })
            }
            None => (rest, None),
        };
        self.rest = tail;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}

/// How a data row is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Tabs become spaces, then the row is split on single spaces.
    Space,
    /// Split on tabs only; spaces stay inside fields (free-text columns).
    Tab,
}

/// Trimmed, non-empty tokens of `line` in their original order.
#[must_use]
pub fn fields(line: &str, separator: Separator) -> Vec<&str> {
    match separator {
        Separator::Space => line
            .split([' ', '\t'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect(),
        Separator::Tab => line
            .split('\t')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect(),
    }
}
