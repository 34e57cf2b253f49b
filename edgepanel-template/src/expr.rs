use std::fmt::{self, Display};

/// The syntax a placeholder was written in
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlaceholderSyntax {
    /// `$name`
    Dollar,
    /// `${name}` or `${name:format}`
    Braced,
    /// `[[name]]` or `[[name:format]]`, kept for older dashboards
    Bracketed,
}

/// A reference to a variable found in query text
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Placeholder {
    pub name: String,
    /// Format requested after the `:`, informational only
    pub format: Option<String>,
    pub syntax: PlaceholderSyntax,
}

impl Placeholder {
    pub fn new(name: impl Into<String>, format: Option<String>, syntax: PlaceholderSyntax) -> Self {
        Self {
            name: name.into(),
            format,
            syntax,
        }
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt = self
            .format
            .as_ref()
            .map(|fmt| format!(":{}", fmt))
            .unwrap_or_default();

        match self.syntax {
            PlaceholderSyntax::Dollar => write!(f, "${}", self.name),
            PlaceholderSyntax::Braced => write!(f, "${{{}{}}}", self.name, fmt),
            PlaceholderSyntax::Bracketed => write!(f, "[[{}{}]]", self.name, fmt),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TemplatePart {
    Text(String),
    Placeholder(Placeholder),
}

/// Query text split into literal text and placeholders
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Splits the supplied text into literal text and placeholders.
    ///
    /// Anything which does not form a complete placeholder, such as a lone `$`
    /// or an unterminated `${`, is kept as literal text.
    pub fn parse(text: &str) -> Self {
        let chars = text.chars().collect::<Vec<char>>();
        let mut parts = vec![];
        let mut constant = String::new();
        let mut i = 0;

        while i < chars.len() {
            let found = match (chars[i], chars.get(i + 1)) {
                ('$', Some('{')) => parse_delimited(&chars[i + 2..], PlaceholderSyntax::Braced)
                    .map(|(p, len)| (p, len + 2)),
                ('$', Some(c)) if is_name_char(*c) => {
                    let name = take_name(&chars[i + 1..]);
                    let len = name.len() + 1;
                    Some((Placeholder::new(name, None, PlaceholderSyntax::Dollar), len))
                }
                ('[', Some('[')) => parse_delimited(&chars[i + 2..], PlaceholderSyntax::Bracketed)
                    .map(|(p, len)| (p, len + 2)),
                _ => None,
            };

            match found {
                Some((placeholder, len)) => {
                    if !constant.is_empty() {
                        parts.push(TemplatePart::Text(std::mem::take(&mut constant)));
                    }
                    parts.push(TemplatePart::Placeholder(placeholder));
                    i += len;
                }
                None => {
                    constant.push(chars[i]);
                    i += 1;
                }
            }
        }

        if !constant.is_empty() {
            parts.push(TemplatePart::Text(constant));
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.parts.iter().filter_map(|p| match p {
            TemplatePart::Placeholder(p) => Some(p),
            _ => None,
        })
    }

    /// Joins the template back together, substituting each placeholder
    /// the lookup returns a value for. Other placeholders keep their
    /// original text.
    pub fn render(&self, lookup: impl Fn(&Placeholder) -> Option<String>) -> String {
        let mut out = String::new();

        for part in self.parts.iter() {
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Placeholder(p) => match lookup(p) {
                    Some(val) => out.push_str(&val),
                    None => out.push_str(&p.to_string()),
                },
            }
        }

        out
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn take_name(chars: &[char]) -> String {
    chars.iter().take_while(|c| is_name_char(**c)).collect()
}

/// Parses the remainder of a `${..}` or `[[..]]` placeholder following its
/// opening delimiter, returning the number of chars consumed
fn parse_delimited(chars: &[char], syntax: PlaceholderSyntax) -> Option<(Placeholder, usize)> {
    let close = match syntax {
        PlaceholderSyntax::Bracketed => ']',
        _ => '}',
    };

    let name = take_name(chars);
    if name.is_empty() {
        return None;
    }

    let mut pos = name.len();
    let mut format = None;

    if chars.get(pos) == Some(&':') {
        let fmt = chars[pos + 1..]
            .iter()
            .take_while(|c| **c != close)
            .collect::<String>();
        if fmt.is_empty() {
            return None;
        }

        pos += 1 + fmt.chars().count();
        format = Some(fmt);
    }

    let len = match (syntax, chars.get(pos), chars.get(pos + 1)) {
        (PlaceholderSyntax::Bracketed, Some(']'), Some(']')) => pos + 2,
        (PlaceholderSyntax::Braced, Some('}'), _) => pos + 1,
        _ => return None,
    };

    Some((Placeholder::new(name, format, syntax), len))
}
