use indexmap::IndexMap;
use smol_str::SmolStr;

/// Abstract column type names to DB2 column definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: IndexMap<SmolStr, SmolStr>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::from_iter([
            (
                "pk",
                "integer NOT NULL GENERATED BY DEFAULT AS IDENTITY (START WITH 1, INCREMENT BY 1) PRIMARY KEY",
            ),
            (
                "bigpk",
                "bigint NOT NULL GENERATED BY DEFAULT AS IDENTITY (START WITH 1, INCREMENT BY 1) PRIMARY KEY",
            ),
            ("string", "varchar(255)"),
            ("text", "clob"),
            ("smallint", "smallint"),
            ("integer", "integer"),
            ("bigint", "bigint"),
            ("float", "float"),
            ("double", "double"),
            ("decimal", "decimal(10,0)"),
            ("datetime", "timestamp"),
            ("timestamp", "timestamp"),
            ("time", "time"),
            ("date", "date"),
            ("binary", "blob"),
            ("boolean", "smallint"),
            ("money", "decimal(19,4)"),
        ])
    }
}

impl<K, V> FromIterator<(K, V)> for TypeMap
where
    K: Into<SmolStr>,
    V: Into<SmolStr>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { entries }
    }
}

impl TypeMap {
    /// An empty map, every type passes through untouched.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Replace or add one mapping.
    pub fn with<K, V>(mut self, abstract_type: K, definition: V) -> Self
    where
        K: Into<SmolStr>,
        V: Into<SmolStr>,
    {
        self.entries.insert(abstract_type.into(), definition.into());
        self
    }

    pub fn get(&self, abstract_type: &str) -> Option<&str> {
        self.entries.get(abstract_type).map(SmolStr::as_str)
    }

    /// Resolve a column type.
    ///
    /// `string` maps directly, `string(64) NOT NULL` swaps the mapped length
    /// for 64 and keeps the suffix, `integer NOT NULL` maps the leading word.
    /// Unknown types are returned unchanged.
    pub fn column_type(&self, ty: &str) -> String {
        if let Some(mapped) = self.get(ty) {
            return mapped.to_owned();
        }

        let word_end = ty
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(ty.len());
        if word_end == 0 {
            return ty.to_owned();
        }
        let (word, rest) = ty.split_at(word_end);

        if let Some(args) = rest.strip_prefix('(') {
            if let Some(close) = args.find(')') {
                let (args, suffix) = (&args[..close], &args[close + 1..]);
                match self.get(word) {
                    Some(mapped) if !args.is_empty() => {
                        return format!("{}{suffix}", replace_args(mapped, args));
                    }
                    _ => {}
                }
            }
        } else if rest.starts_with(char::is_whitespace) {
            if let Some(mapped) = self.get(word) {
                return format!("{mapped}{rest}");
            }
        }

        ty.to_owned()
    }
}

/// Swap the first `( ... )` group of a definition, spanning to the last `)`.
fn replace_args(mapped: &str, args: &str) -> String {
    match (mapped.find('('), mapped.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}({args}){}", &mapped[..open], &mapped[close + 1..])
        }
        _ => mapped.to_owned(),
    }
}
