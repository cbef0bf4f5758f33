use std::{borrow::Cow, sync::Arc};

use smol_str::SmolStr;

use crate::writer::{self, FormatWriter};

/// A table or column name, possibly dotted (`schema.table.column`).
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ident(pub(crate) SmolStr);

pub trait IntoIdent {
    fn into_ident(self) -> Ident;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> Ident {
        self
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> Ident {
        self.clone()
    }
}

impl IntoIdent for &str {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for &String {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for String {
    #[inline(always)]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for Box<str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for Arc<str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl<'a> IntoIdent for Cow<'a, str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for SmolStr {
    #[inline(always)]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl Ident {
    #[inline]
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self(value.into())
    }

    #[inline]
    pub fn new_static(value: &'static str) -> Self {
        Self(SmolStr::new_static(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True when the name carries a qualifier such as `t.id`.
    pub fn is_qualified(&self) -> bool {
        split_segments(&self.0).len() > 1
    }

    /// The final dotted segment, `id` for `schema.t.id`.
    pub fn last_segment(&self) -> &str {
        split_segments(&self.0).pop().unwrap_or_default()
    }

    /// Prefix this name with another one, `t` + `id` gives `t.id`.
    pub fn qualify(&self, qualifier: &Ident) -> Ident {
        Ident::new(smol_str::format_smolstr!("{}.{}", qualifier.0, self.0))
    }
}

/// Split a dotted name on the dots outside double quotes, `"a.b".c` has two
/// segments.
pub(crate) fn split_segments(name: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (index, char) in name.char_indices() {
        match char {
            '"' => quoted = !quoted,
            '.' if !quoted => {
                segments.push(&name[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&name[start..]);
    segments
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FormatWriter for Ident {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.write_table(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::tests::format_writer;

    use super::*;

    #[test]
    fn test_format_ident_simple() {
        let ident = Ident::new_static("users");
        assert_eq!("\"users\"", format_writer(ident));
    }

    #[test]
    fn test_format_writer_spaces() {
        let ident = Ident::new_static("an sql table");
        assert_eq!("\"an sql table\"", format_writer(ident));
    }

    #[test]
    fn test_format_writer_quote() {
        let ident = Ident::new_static("us\"ers");
        assert_eq!("\"us\"\"ers\"", format_writer(ident));
    }

    #[test]
    fn test_format_writer_dot() {
        let ident = Ident::new_static("x.y");
        assert_eq!("\"x\".\"y\"", format_writer(ident));
        let ident = Ident::new_static("some space.x.y");
        assert_eq!("\"some space\".\"x\".\"y\"", format_writer(ident));
    }

    #[test]
    fn test_format_writer_prequoted() {
        let ident = Ident::new_static("\"item\".\"id\"");
        assert_eq!("\"item\".\"id\"", format_writer(ident));
        let ident = Ident::new_static("SYSIBM.\"SYSDUMMY1\"");
        assert_eq!("\"SYSIBM\".\"SYSDUMMY1\"", format_writer(ident));
    }

    #[test]
    fn test_format_writer_expression() {
        let ident = Ident::new_static("LOWER(t.name)");
        assert_eq!("LOWER(t.name)", format_writer(ident));
    }

    #[test]
    fn test_segments() {
        let ident = Ident::new_static("schema.t.id");
        assert!(ident.is_qualified());
        assert_eq!("id", ident.last_segment());
        let ident = Ident::new_static("id");
        assert!(!ident.is_qualified());
        assert_eq!("id", ident.last_segment());
        assert_eq!("t.id", ident.qualify(&Ident::new_static("t")).as_str());
    }

    #[test]
    fn test_dots_inside_quotes() {
        let ident = Ident::new_static("\"a.b\"");
        assert!(!ident.is_qualified());
        assert_eq!("\"a.b\"", format_writer(ident));

        let ident = Ident::new_static("\"t\".\"a.b\"");
        assert!(ident.is_qualified());
        assert_eq!("\"a.b\"", ident.last_segment());
        assert_eq!("\"t\".\"a.b\"", format_writer(ident));
        assert_eq!(vec!["s", "\"x.y\"", "z"], split_segments("s.\"x.y\".z"));
    }

    #[test]
    fn test_quoted_segment_must_be_well_formed() {
        let ident = Ident::new_static("\"x\" = 1 OR \"y\"");
        assert_eq!("\"\"\"x\"\" = 1 OR \"\"y\"\"\"", format_writer(ident));
        let ident = Ident::new_static("\"it\"\"s\"");
        assert_eq!("\"it\"\"s\"", format_writer(ident));
        let ident = Ident::new_static("\"");
        assert_eq!("\"\"\"\"", format_writer(ident));
    }
}
