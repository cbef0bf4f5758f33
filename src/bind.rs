use indexmap::IndexMap;
use smol_str::{SmolStr, format_smolstr};

/// A value bound to a named placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    String(String),
    StaticString(&'static str),
    Bool(bool),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    #[cfg(feature = "chrono")]
    ChronoDate(chrono::NaiveDate),
    #[cfg(feature = "chrono")]
    ChronoDateTime(chrono::NaiveDateTime),
    #[cfg(feature = "chrono")]
    ChronoDateTimeUtc(chrono::DateTime<chrono::Utc>),
    #[cfg(feature = "time")]
    Date(time::Date),
    #[cfg(feature = "time")]
    PrimitiveDateTime(time::PrimitiveDateTime),
    #[cfg(feature = "time")]
    OffsetDateTime(time::OffsetDateTime),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
    #[cfg(feature = "json")]
    Json(serde_json::Value),
}

impl Bind {
    pub fn is_null(&self) -> bool {
        matches!(self, Bind::Null)
    }

    /// Integer view of a scalar, as returned by aggregate queries.
    ///
    /// Strings are parsed since some drivers hand back `DECIMAL` results as text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Bind::I8(v) => Some(i64::from(*v)),
            Bind::I16(v) => Some(i64::from(*v)),
            Bind::I32(v) => Some(i64::from(*v)),
            Bind::I64(v) => Some(*v),
            Bind::U8(v) => Some(i64::from(*v)),
            Bind::U16(v) => Some(i64::from(*v)),
            Bind::U32(v) => Some(i64::from(*v)),
            Bind::U64(v) => i64::try_from(*v).ok(),
            Bind::F32(v) => Some(*v as i64),
            Bind::F64(v) => Some(*v as i64),
            Bind::String(v) => parse_integer(v),
            Bind::StaticString(v) => parse_integer(v),
            _ => None,
        }
    }
}

fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v as i64))
}

pub type Binds = Vec<Bind>;

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

pub trait IntoBinds {
    fn into_binds(self) -> Binds;
}

impl IntoBinds for () {
    fn into_binds(self) -> Binds {
        Binds::new()
    }
}

impl<T> IntoBinds for T
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        vec![self.into_bind()]
    }
}

impl<T> IntoBinds for Vec<T>
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl<T, const N: usize> IntoBinds for [T; N]
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        if let Some(value) = self {
            value.into_bind()
        } else {
            Bind::Null
        }
    }
}

macro_rules! impl_into_bind {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::$variant(self)
                }
            }
        )+
    };
}

impl_into_bind! {
    bool => Bool,
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    String => String,
    &'static str => StaticString,
}

impl IntoBind for &String {
    fn into_bind(self) -> Bind {
        Bind::String(self.clone())
    }
}

impl IntoBind for SmolStr {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_string())
    }
}

#[cfg(feature = "chrono")]
impl_into_bind! {
    chrono::NaiveDate => ChronoDate,
    chrono::NaiveDateTime => ChronoDateTime,
    chrono::DateTime<chrono::Utc> => ChronoDateTimeUtc,
}

#[cfg(feature = "time")]
impl_into_bind! {
    time::Date => Date,
    time::PrimitiveDateTime => PrimitiveDateTime,
    time::OffsetDateTime => OffsetDateTime,
}

#[cfg(feature = "uuid")]
impl_into_bind! {
    uuid::Uuid => Uuid,
}

#[cfg(feature = "json")]
impl_into_bind! {
    serde_json::Value => Json,
}

/// Ordered placeholder name to value mapping.
///
/// Generated names follow the `:qp<n>` scheme, so a list started by another
/// builder keeps producing unique names when it is handed over.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params(IndexMap<SmolStr, Bind>);

impl Params {
    pub const PREFIX: &'static str = ":qp";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a value under the next free generated name and return that name.
    pub fn push(&mut self, value: Bind) -> SmolStr {
        let mut index = self.0.len();
        let mut name = format_smolstr!("{}{}", Self::PREFIX, index);
        while self.0.contains_key(&name) {
            index += 1;
            name = format_smolstr!("{}{}", Self::PREFIX, index);
        }
        self.0.insert(name.clone(), value);
        name
    }

    /// Bind a value under an explicit name, the leading colon is optional.
    pub fn bind<N, V>(&mut self, name: N, value: V) -> &mut Self
    where
        N: AsRef<str>,
        V: IntoBind,
    {
        let name = name.as_ref();
        let name = if name.starts_with(':') {
            SmolStr::new(name)
        } else {
            format_smolstr!(":{}", name)
        };
        self.0.insert(name, value.into_bind());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Bind> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Bind)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.0.keys()
    }

    /// Values in placeholder order, for positional drivers.
    pub fn into_values(self) -> Vec<Bind> {
        self.0.into_values().collect()
    }
}

impl IntoIterator for Params {
    type Item = (SmolStr, Bind);
    type IntoIter = indexmap::map::IntoIter<SmolStr, Bind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<N> FromIterator<(N, Bind)> for Params
where
    N: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (N, Bind)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.bind(name, value);
        }
        params
    }
}
