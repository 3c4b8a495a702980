//! Shell-style brace expansion for class name patterns.
//!
//! `rounded{,-t,-b}` expands to `rounded`, `rounded-t`, `rounded-b`. Groups
//! nest, alternatives may be empty, and an alternative of the form `a..b` or
//! `a..b..step` expands to an integer range. Commas outside braces are
//! literal.

use crate::error::BraceError;

/// Most values a single numeric range may produce.
pub const MAX_RANGE_VALUES: usize = 1024;

/// Most names a single pattern may expand to.
pub const MAX_EXPANSIONS: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Alternation(Vec<Vec<Part>>),
}

pub fn expand_braces(pattern: &str) -> Result<Vec<String>, BraceError> {
    let mut parser = Parser { pattern, pos: 0 };
    let parts = parser.sequence(0)?;
    expand_sequence(&parts)
}

struct Parser<'p> {
    pattern: &'p str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    /// Reads parts up to the end of input or, inside braces, the next `,`/`}`.
    fn sequence(&mut self, depth: usize) -> Result<Vec<Part>, BraceError> {
        let mut parts = Vec::new();
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '{' => {
                    let open = self.pos;
                    self.pos += 1;
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    parts.push(Part::Alternation(self.alternation(open, depth + 1)?));
                }
                '}' | ',' if depth > 0 => break,
                '}' => {
                    return Err(BraceError::Unbalanced {
                        brace: '}',
                        offset: self.pos,
                    });
                }
                _ => {
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        if !text.is_empty() {
            parts.push(Part::Text(text));
        }
        Ok(parts)
    }

    fn alternation(&mut self, open: usize, depth: usize) -> Result<Vec<Vec<Part>>, BraceError> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.sequence(depth)?);
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(alternatives);
                }
                _ => {
                    return Err(BraceError::Unbalanced {
                        brace: '{',
                        offset: open,
                    });
                }
            }
        }
    }
}

fn expand_sequence(parts: &[Part]) -> Result<Vec<String>, BraceError> {
    let mut heads = vec![String::new()];

    for part in parts {
        match part {
            Part::Text(text) => heads.iter_mut().for_each(|head| head.push_str(text)),
            Part::Alternation(alternatives) => {
                let tails = expand_alternation(alternatives)?;
                if heads.len().saturating_mul(tails.len()) > MAX_EXPANSIONS {
                    return Err(BraceError::TooManyExpansions {
                        limit: MAX_EXPANSIONS,
                    });
                }
                heads = heads
                    .iter()
                    .flat_map(|head| tails.iter().map(move |tail| format!("{head}{tail}")))
                    .collect();
            }
        }
    }

    Ok(heads)
}

fn expand_alternation(alternatives: &[Vec<Part>]) -> Result<Vec<String>, BraceError> {
    let mut out = Vec::new();
    for alternative in alternatives {
        if let [Part::Text(text)] = alternative.as_slice()
            && let Some(values) = numeric_range(text)?
        {
            out.extend(values);
        } else {
            out.extend(expand_sequence(alternative)?);
        }
        if out.len() > MAX_EXPANSIONS {
            return Err(BraceError::TooManyExpansions {
                limit: MAX_EXPANSIONS,
            });
        }
    }
    Ok(out)
}

/// `start..end` or `start..end..step`; anything else is not a range.
///
/// The step's sign is ignored: the range always walks from `start` toward
/// `end`.
fn numeric_range(text: &str) -> Result<Option<Vec<String>>, BraceError> {
    let mut fields = text.split("..");
    let (Some(start), Some(end)) = (fields.next(), fields.next()) else {
        return Ok(None);
    };
    let step = fields.next();
    if fields.next().is_some() {
        return Ok(None);
    }
    let (Ok(start), Ok(end)) = (start.parse::<i64>(), end.parse::<i64>()) else {
        return Ok(None);
    };
    let step = match step.map(str::parse::<i64>) {
        None => 1,
        Some(Ok(step)) if step != 0 => step.unsigned_abs(),
        Some(_) => return Ok(None),
    };

    let count = start.abs_diff(end) / step + 1;
    if count > MAX_RANGE_VALUES as u64 {
        return Err(BraceError::RangeTooLarge {
            range: text.to_string(),
            limit: MAX_RANGE_VALUES,
        });
    }

    let direction: i128 = if end < start { -1 } else { 1 };
    let values = (0..count)
        .map(|idx| {
            let value = i128::from(start) + direction * i128::from(idx) * i128::from(step);
            value.to_string()
        })
        .collect();
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::{MAX_RANGE_VALUES, expand_braces};
    use crate::error::BraceError;

    fn expand(pattern: &str) -> Vec<String> {
        expand_braces(pattern).expect("pattern should expand")
    }

    #[test]
    fn expands_alternatives_with_empty_option() {
        assert_eq!(
            expand("{,inline-}{block,flex}"),
            vec!["block", "flex", "inline-block", "inline-flex"]
        );
    }

    #[test]
    fn expands_nested_groups() {
        assert_eq!(
            expand("text-{lg,{,{2..3}}xl}"),
            vec!["text-lg", "text-xl", "text-2xl", "text-3xl"]
        );
    }

    #[test]
    fn expands_stepped_and_descending_ranges() {
        assert_eq!(
            expand("red-{50,{100..300..100}}"),
            vec!["red-50", "red-100", "red-200", "red-300"]
        );
        assert_eq!(expand("x-{3..1}"), vec!["x-3", "x-2", "x-1"]);
        assert_eq!(expand("x-{0..10..-4}"), vec!["x-0", "x-4", "x-8"]);
        assert_eq!(expand("m-{-2..0}"), vec!["m--2", "m--1", "m-0"]);
    }

    #[test]
    fn ranges_near_integer_limits_stay_in_bounds() {
        assert_eq!(
            expand("z-{2147483600..2147483647..100}"),
            vec!["z-2147483600"]
        );
        assert_eq!(
            expand("z-{9223372036854775806..9223372036854775807}"),
            vec!["z-9223372036854775806", "z-9223372036854775807"]
        );
    }

    #[test]
    fn rejects_oversized_range() {
        assert_eq!(
            expand_braces("z-{0..2147483647}"),
            Err(BraceError::RangeTooLarge {
                range: "0..2147483647".to_string(),
                limit: MAX_RANGE_VALUES,
            })
        );
    }

    #[test]
    fn rejects_runaway_product() {
        assert!(matches!(
            expand_braces("{1..1000}{1..1000}"),
            Err(BraceError::TooManyExpansions { .. })
        ));
    }

    #[test]
    fn non_numeric_dots_stay_literal() {
        assert_eq!(expand("{a..b,1..2..0}"), vec!["a..b", "1..2..0"]);
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(expand("container"), vec!["container"]);
        assert_eq!(expand("w-1/2"), vec!["w-1/2"]);
        assert_eq!(expand("a,b"), vec!["a,b"]);
    }

    #[test]
    fn reports_unmatched_braces() {
        assert_eq!(
            expand_braces("p-{1,2"),
            Err(BraceError::Unbalanced {
                brace: '{',
                offset: 2,
            })
        );
        assert_eq!(
            expand_braces("p-1}"),
            Err(BraceError::Unbalanced {
                brace: '}',
                offset: 3,
            })
        );
    }
}
