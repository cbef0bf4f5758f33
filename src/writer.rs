use std::{fmt::Write, ops::Deref};

use crate::{
    bind::{Bind, Params},
    ident::split_segments,
};

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result;
}

/// Output sink plus the binding list threaded through one build.
pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) params: Params,
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub fn new(writer: &'a mut W, params: Params) -> Self {
        Self { writer, params }
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    /// Dotted names are quoted per segment. Names holding a parenthesis are
    /// expressions and go out verbatim.
    pub(crate) fn write_table(&mut self, ident: &str) -> std::fmt::Result {
        if ident.contains('(') {
            return self.writer.write_str(ident);
        }
        for (i, part) in split_segments(ident).into_iter().enumerate() {
            if i > 0 {
                self.writer.write_char('.')?;
            }
            self.write_ident(part)?;
        }
        Ok(())
    }

    pub(crate) fn write_ident(&mut self, part: &str) -> std::fmt::Result {
        if part == "*" || is_quoted(part) {
            return self.writer.write_str(part);
        }

        self.writer.write_char('"')?;
        // duplicate the quote if present
        let mut last = 0;
        for (index, char) in part.char_indices() {
            if char == '"' {
                if index != last {
                    self.writer.write_str(&part[last..index])?;
                }
                self.writer.write_str("\"\"")?;
                last = index + char.len_utf8();
            }
        }

        // write trailing slice
        if last < part.len() {
            self.writer.write_str(&part[last..])?;
        }

        self.writer.write_char('"')
    }

    /// Single quoted string literal with embedded quotes doubled.
    pub(crate) fn write_literal(&mut self, value: &str) -> std::fmt::Result {
        self.writer.write_char('\'')?;
        for (i, part) in value.split('\'').enumerate() {
            if i > 0 {
                self.writer.write_str("''")?;
            }
            self.writer.write_str(part)?;
        }
        self.writer.write_char('\'')
    }

    /// Register the value and write its generated placeholder name.
    pub(crate) fn write_placeholder(&mut self, value: Bind) -> std::fmt::Result {
        let name = self.params.push(value);
        self.writer.write_str(name.as_str())
    }

    /// Comma separated list of writers.
    pub(crate) fn write_list<'i, T, I>(&mut self, items: I) -> std::fmt::Result
    where
        T: FormatWriter + 'i,
        I: IntoIterator<Item = &'i T>,
    {
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                self.writer.write_str(", ")?;
            }
            item.format_writer(self)?;
        }
        Ok(())
    }
}

impl<D> FormatWriter for D
where
    D: Deref,
    D::Target: FormatWriter,
{
    fn format_writer<W: std::fmt::Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        self.deref().format_writer(ctx)
    }
}

/// A segment already in double quotes, with every inner quote doubled.
fn is_quoted(part: &str) -> bool {
    let Some(inner) = part
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(char) = chars.next() {
        if char == '"' && chars.next() != Some('"') {
            return false;
        }
    }
    true
}

/// Render a writer into a fresh string, continuing the given binding list.
pub(crate) fn render<F: FormatWriter + ?Sized>(value: &F, params: Params) -> (String, Params) {
    let mut sql = String::with_capacity(64);
    let mut context = FormatContext::new(&mut sql, params);
    value
        .format_writer(&mut context)
        .expect("should not fail on a string writer");
    let params = context.into_params();
    (sql, params)
}
