use crate::engine::error::ValidationError;

/// Fields recovered from a nucleus label such as `@13C_mine` or `Gh(6@13.003)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NucleusLabel {
    pub mass_number: Option<i64>,
    pub atomic_number: Option<i64>,
    /// Element symbol exactly as written.
    pub symbol: Option<String>,
    pub mass: Option<f64>,
    pub real: bool,
    pub user: Option<String>,
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_ignore_case(&mut self, prefix: &str) -> bool {
        let rest = self.rest();
        if rest.len() >= prefix.len()
            && rest.is_char_boundary(prefix.len())
            && rest[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// `_` followed by at least one word character.
    fn take_tag(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat('_') {
            return None;
        }
        let word = self.take_while(|c| c.is_alphanumeric() || c == '_');
        if word.is_empty() {
            self.pos = start;
            return None;
        }
        Some(&self.text[start..self.pos])
    }
}

fn parse_int(digits: &str, label: &str) -> Result<i64, ValidationError> {
    digits.parse().map_err(|_| ValidationError::LabelSyntax {
        label: label.to_string(),
    })
}

/// Splits a nucleus label into its optional parts.
///
/// Accepted forms are an optional ghost marker (`@` prefix or `Gh(...)` wrapper),
/// then either `[A]E[user]` with a one to three letter symbol or `Z[_user]` with a
/// one to three digit atomic number, then an optional `@mass` decimal.
pub fn parse_nucleus_label(label: &str) -> Result<NucleusLabel, ValidationError> {
    let syntax_error = || ValidationError::LabelSyntax {
        label: label.to_string(),
    };
    let mut cur = Cursor::new(label.trim());
    let mut parsed = NucleusLabel {
        real: true,
        ..Default::default()
    };

    let wrapped = if cur.eat('@') {
        parsed.real = false;
        false
    } else if cur.eat_ignore_case("gh(") {
        parsed.real = false;
        true
    } else {
        false
    };

    let digits = cur.take_while(|c| c.is_ascii_digit());
    let letters = cur.take_while(|c| c.is_ascii_alphabetic());

    if !letters.is_empty() {
        if letters.len() > 3 {
            return Err(syntax_error());
        }
        if !digits.is_empty() {
            parsed.mass_number = Some(parse_int(digits, label)?);
        }
        parsed.symbol = Some(letters.to_string());
        parsed.user = match cur.take_tag() {
            Some(tag) => Some(tag.to_string()),
            None => {
                let number = cur.take_while(|c| c.is_ascii_digit());
                (!number.is_empty()).then(|| number.to_string())
            }
        };
    } else {
        if digits.is_empty() || digits.len() > 3 {
            return Err(syntax_error());
        }
        parsed.atomic_number = Some(parse_int(digits, label)?);
        parsed.user = cur.take_tag().map(str::to_string);
    }

    if cur.eat('@') {
        let whole = cur.take_while(|c| c.is_ascii_digit());
        if whole.is_empty() || !cur.eat('.') {
            return Err(syntax_error());
        }
        let frac = cur.take_while(|c| c.is_ascii_digit());
        if frac.is_empty() {
            return Err(syntax_error());
        }
        let mass = format!("{whole}.{frac}")
            .parse()
            .map_err(|_| syntax_error())?;
        parsed.mass = Some(mass);
    }

    if wrapped && !cur.eat(')') {
        return Err(syntax_error());
    }
    if !cur.at_end() {
        return Err(syntax_error());
    }
    Ok(parsed)
}
