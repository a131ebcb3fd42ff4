//! Schema-qualified table names.

use std::fmt;

use crate::error::{Error, Result};

/// A table name with an optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Schema, `None` when the name was unqualified.
    pub schema: Option<String>,
    /// Table identifier, unquoted.
    pub identifier: String,
}

impl QualifiedName {
    /// Create a qualified name from parts.
    pub fn new(schema: Option<String>, identifier: impl Into<String>) -> Self {
        Self {
            schema,
            identifier: identifier.into(),
        }
    }

    /// Parse `table`, `schema.table`, or their double-quoted forms.
    ///
    /// Inside quotes, `.` is literal and `""` stands for one `"`.
    /// Unquoted parts keep their case; folding is left to the server.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidTableName {
            name: name.to_string(),
            message: message.to_string(),
        };

        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = name.trim().chars().peekable();
        let mut in_quotes = false;

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                '.' if !in_quotes => parts.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        if in_quotes {
            return Err(invalid("unterminated quoted identifier"));
        }
        parts.push(current);

        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty identifier"));
        }

        match parts.len() {
            1 => Ok(Self::new(None, parts.remove(0))),
            2 => {
                let identifier = parts.remove(1);
                Ok(Self::new(Some(parts.remove(0)), identifier))
            }
            _ => Err(invalid("expected [schema.]table")),
        }
    }

    /// Schema to use, falling back to `default_schema`.
    pub fn schema_or<'a>(&'a self, default_schema: &'a str) -> &'a str {
        self.schema.as_deref().unwrap_or(default_schema)
    }

    /// Return a copy with the schema filled in when missing.
    pub fn with_default_schema(&self, default_schema: &str) -> Self {
        Self::new(
            Some(self.schema_or(default_schema).to_string()),
            self.identifier.clone(),
        )
    }
}

fn quote_ident(f: &mut fmt::Formatter<'_>, ident: &str) -> fmt::Result {
    write!(f, "\"{}\"", ident.replace('"', "\"\""))
}

impl fmt::Display for QualifiedName {
    /// Quoted form, safe to splice into SQL.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            quote_ident(f, schema)?;
            write!(f, ".")?;
        }
        quote_ident(f, &self.identifier)
    }
}
