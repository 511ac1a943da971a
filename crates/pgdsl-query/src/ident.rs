//! SQL identifiers for tables and columns.
//!
//! An [`Ident`] is a dotted path of segments (`schema.table`, `table.column`).
//! Bare segments must match `[A-Za-z_][A-Za-z0-9_$]*`; anything else has to be
//! written in double quotes, with `"` escaped as `""`.
//!
//! ```ignore
//! use pgdsl_query::Ident;
//!
//! let users = Ident::parse("public.users")?;
//! let odd = Ident::parse(r#"public."Order Lines""#)?;
//! # Ok::<(), pgdsl_query::DslError>(())
//! ```

use crate::error::{DslError, DslResult};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// One segment of a dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentPart {
    /// Rendered as-is.
    Bare(String),
    /// Rendered inside double quotes.
    Quoted(String),
}

impl IdentPart {
    /// The segment text without quotes.
    pub fn as_str(&self) -> &str {
        match self {
            IdentPart::Bare(s) | IdentPart::Quoted(s) => s,
        }
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            IdentPart::Bare(s) => out.push_str(s),
            IdentPart::Quoted(s) => {
                out.push('"');
                out.push_str(&s.replace('"', "\"\""));
                out.push('"');
            }
        }
    }
}

/// A possibly qualified SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse `a`, `a.b`, `"A b".c` and so on.
    pub fn parse(input: &str) -> DslResult<Self> {
        if input.is_empty() {
            return Err(DslError::invalid_ident("identifier cannot be empty"));
        }
        if input.contains('\0') {
            return Err(DslError::invalid_ident(format!(
                "identifier cannot contain NUL: {input:?}"
            )));
        }

        let mut parts = Vec::new();
        let mut chars = input.chars().peekable();
        loop {
            let part = match chars.peek() {
                Some('"') => read_quoted(&mut chars, input)?,
                Some(_) => read_bare(&mut chars, input)?,
                None => {
                    return Err(DslError::invalid_ident(format!(
                        "trailing '.' in {input:?}"
                    )));
                }
            };
            parts.push(part);

            match chars.next() {
                None => break,
                Some('.') => continue,
                Some(c) => {
                    return Err(DslError::invalid_ident(format!(
                        "unexpected '{c}' after segment in {input:?}"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// A single quoted segment, accepting any text except NUL.
    pub fn quoted(name: &str) -> DslResult<Self> {
        if name.is_empty() || name.contains('\0') {
            return Err(DslError::invalid_ident(format!(
                "invalid quoted identifier {name:?}"
            )));
        }
        Ok(Self {
            parts: vec![IdentPart::Quoted(name.to_string())],
        })
    }

    /// A bare identifier the caller knows to be valid.
    pub(crate) fn bare(name: &str) -> Self {
        Self {
            parts: vec![IdentPart::Bare(name.to_string())],
        }
    }

    /// Segments in order.
    pub fn parts(&self) -> &[IdentPart] {
        &self.parts
    }

    /// The last segment (the column of `table.column`).
    pub fn name(&self) -> &IdentPart {
        // `parse`/`quoted` never produce an empty path.
        &self.parts[self.parts.len() - 1]
    }

    /// Only the last segment, as its own identifier.
    pub fn unqualified(&self) -> Ident {
        Ident {
            parts: vec![self.name().clone()],
        }
    }

    /// Everything before the last segment (`public.users` of `public.users.id`).
    pub fn qualifier(&self) -> Option<Ident> {
        (self.parts.len() > 1).then(|| Ident {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    /// Render as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            part.write_sql(out);
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, input: &str) -> DslResult<IdentPart> {
    chars.next();
    let mut name = String::new();
    loop {
        match chars.next() {
            Some('"') if chars.peek() == Some(&'"') => {
                chars.next();
                name.push('"');
            }
            Some('"') => break,
            Some(c) => name.push(c),
            None => {
                return Err(DslError::invalid_ident(format!(
                    "unclosed quote in {input:?}"
                )));
            }
        }
    }
    if name.is_empty() {
        return Err(DslError::invalid_ident(format!(
            "empty quoted segment in {input:?}"
        )));
    }
    Ok(IdentPart::Quoted(name))
}

fn read_bare(chars: &mut Peekable<Chars<'_>>, input: &str) -> DslResult<IdentPart> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c == '.' {
            break;
        }
        let ok = if name.is_empty() {
            c == '_' || c.is_ascii_alphabetic()
        } else {
            c == '_' || c == '$' || c.is_ascii_alphanumeric()
        };
        if !ok {
            return Err(DslError::invalid_ident(format!(
                "invalid character '{c}' in {input:?}"
            )));
        }
        name.push(c);
        chars.next();
    }
    if name.is_empty() {
        return Err(DslError::invalid_ident(format!(
            "empty segment in {input:?}"
        )));
    }
    Ok(IdentPart::Bare(name))
}

/// Conversion into an [`Ident`], used by builder entry points.
pub trait IntoIdent {
    fn into_ident(self) -> DslResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> DslResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> DslResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> DslResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> DslResult<Ident> {
        Ident::parse(&self)
    }
}
