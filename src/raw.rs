use smol_str::SmolStr;

use crate::{
    bind::Bind,
    writer::{FormatContext, FormatWriter},
};

/// SQL text emitted verbatim, except for `?` markers which become named
/// placeholders for the values passed alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw(pub(crate) SmolStr);

pub trait IntoRaw {
    fn into_raw(self) -> Raw;
}

impl IntoRaw for Raw {
    fn into_raw(self) -> Raw {
        self
    }
}

impl IntoRaw for &str {
    fn into_raw(self) -> Raw {
        Raw::new(self)
    }
}

impl IntoRaw for String {
    fn into_raw(self) -> Raw {
        Raw::new(self)
    }
}

impl IntoRaw for SmolStr {
    fn into_raw(self) -> Raw {
        Raw::new(self)
    }
}

impl Raw {
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self(value.into())
    }

    pub fn new_static(value: &'static str) -> Self {
        Self(SmolStr::new_static(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Write the text, swapping each `?` outside of literals and quoted
    /// identifiers for the next value. `??` is written as is and markers left
    /// over once the values run out stay untouched.
    pub(crate) fn format_with_binds<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
        binds: &[Bind],
    ) -> std::fmt::Result {
        let sql = self.0.as_str();
        let mut binds = binds.iter();

        #[derive(Clone, Copy)]
        enum State {
            Normal,
            Quoted(char),
        }

        let mut state = State::Normal;
        let mut span_start = 0;
        let mut chars = sql.char_indices().peekable();
        while let Some((index, char)) = chars.next() {
            match state {
                State::Normal => match char {
                    '\'' | '"' => state = State::Quoted(char),
                    '?' => {
                        if let Some(&(_, '?')) = chars.peek() {
                            chars.next();
                            continue;
                        }
                        if let Some(bind) = binds.next() {
                            context.writer.write_str(&sql[span_start..index])?;
                            context.write_placeholder(bind.clone())?;
                            span_start = index + char.len_utf8();
                        }
                    }
                    _ => {}
                },
                State::Quoted(quote) => {
                    if char == quote {
                        // doubled quote escapes itself
                        if let Some(&(_, next)) = chars.peek() {
                            if next == quote {
                                chars.next();
                                continue;
                            }
                        }
                        state = State::Normal;
                    }
                }
            }
        }

        if span_start < sql.len() {
            context.writer.write_str(&sql[span_start..])?;
        }

        Ok(())
    }
}

impl FormatWriter for Raw {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.writer.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{bind::Params, writer::FormatContext};

    use super::*;

    fn format_binds(raw: &str, binds: &[Bind]) -> (String, Params) {
        let mut sql = String::new();
        let mut context = FormatContext::new(&mut sql, Params::new());
        Raw::new(raw)
            .format_with_binds(&mut context, binds)
            .unwrap();
        let params = context.into_params();
        (sql, params)
    }

    #[test]
    fn test_raw_str() {
        let (sql, params) = format_binds("'te?st'", &[Bind::I32(1)]);
        assert_eq!("'te?st'", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_raw_double_quote() {
        let (sql, _) = format_binds("'te''? st'", &[Bind::I32(1)]);
        assert_eq!("'te''? st'", sql);
    }

    #[test]
    fn test_raw_bind() {
        let (sql, params) = format_binds("'test' = ?", &[Bind::I32(1)]);
        assert_eq!("'test' = :qp0", sql);
        assert_eq!(Some(&Bind::I32(1)), params.get(":qp0"));
    }

    #[test]
    fn test_raw_ident() {
        let (sql, params) = format_binds("\"te? ? \"\"st\" = ?", &[Bind::I32(1)]);
        assert_eq!("\"te? ? \"\"st\" = :qp0", sql);
        assert_eq!(1, params.len());
    }

    #[test]
    fn test_placeholder_double() {
        let (sql, params) = format_binds("test ??", &[Bind::I32(1)]);
        assert_eq!("test ??", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_placeholder_order() {
        let (sql, params) = format_binds("? + ? * ?", &[Bind::I32(1), Bind::I32(2)]);
        assert_eq!(":qp0 + :qp1 * ?", sql);
        let values = params.into_values();
        assert_eq!(vec![Bind::I32(1), Bind::I32(2)], values);
    }
}
