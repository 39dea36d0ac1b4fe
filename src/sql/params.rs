//! Positional parameters that sqlx can bind to PostgreSQL.

use chrono::NaiveDate;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A bound value. Form submissions arrive as `Text` (or `Null` when empty) and are cast
/// server-side to the column type by the generated SQL.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Null,
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl SqlParam {
    /// Form coercion: an empty or whitespace-only submission becomes NULL. Anything else is kept verbatim.
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => SqlParam::Text(s.to_string()),
            _ => SqlParam::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlParam::Null)
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(n: i64) -> Self {
        SqlParam::Int(n)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(d: NaiveDate) -> Self {
        SqlParam::Date(d)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlParam::Null => Ok(IsNull::Yes),
            SqlParam::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
            SqlParam::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlParam::Date(d) => <NaiveDate as Encode<Postgres>>::encode_by_ref(d, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlParam::Null | SqlParam::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlParam::Int(_) => <i64 as Type<Postgres>>::type_info(),
            SqlParam::Date(_) => <NaiveDate as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
            || <i64 as Type<Postgres>>::compatible(ty)
            || <NaiveDate as Type<Postgres>>::compatible(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_values_become_null() {
        assert_eq!(SqlParam::from_form(None), SqlParam::Null);
        assert_eq!(SqlParam::from_form(Some("")), SqlParam::Null);
        assert_eq!(SqlParam::from_form(Some("   ")), SqlParam::Null);
        assert_eq!(SqlParam::from_form(Some("Lab A")), SqlParam::Text("Lab A".into()));
    }

    #[test]
    fn whitespace_only_is_null_but_other_values_are_kept_verbatim() {
        assert_eq!(SqlParam::from_form(Some("\t \n")), SqlParam::Null);
        assert_eq!(SqlParam::from_form(Some(" Lab A ")), SqlParam::Text(" Lab A ".into()));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some(7i64)), SqlParam::Int(7));
        assert!(SqlParam::from(None::<String>).is_null());
    }
}
