use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, DatabaseBackend, QueryFilter, Value,
    sea_query::{Expr, SimpleExpr},
};

use crate::errors::{CatalogError, Result};

/// Comparison operators of the filter expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Case-sensitive pattern match
    Like,
    /// Case-insensitive pattern match
    ILike,
    /// Membership in a comma separated list
    In,
}

impl FilterOperator {
    /// Parse the operator token that precedes the first colon.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "like" => Some(Self::Like),
            "ilike" => Some(Self::ILike),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::In => "in",
        }
    }

    const fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Split a raw filter value into its operator and literal value.
///
/// Only the first colon separates the operator, so `lt:2023-01-01T00:00:00`
/// yields `(Lt, "2023-01-01T00:00:00")`. A value without a colon is an
/// equality test on the whole string. The value is never coerced here.
///
/// # Errors
///
/// Returns a validation error naming the operator when it is not one of
/// `eq, ne, lt, lte, gt, gte, like, ilike, in`.
pub fn parse_filter(raw: &str) -> Result<(FilterOperator, &str)> {
    let Some((token, value)) = raw.split_once(':') else {
        return Ok((FilterOperator::Eq, raw));
    };

    FilterOperator::from_token(token)
        .map(|operator| (operator, value))
        .ok_or_else(|| CatalogError::validation(format!("Unsupported filter operator: '{token}'")))
}

/// How a raw filter value is bound for a given column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Integer,
    Timestamp,
    Text,
}

impl ValueKind {
    fn of<C: ColumnTrait>(column: C) -> Self {
        match column.def().get_column_type() {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger => Self::Integer,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                Self::Timestamp
            }
            _ => Self::Text,
        }
    }
}

fn invalid_value(field: &str, value: &str) -> CatalogError {
    CatalogError::validation(format!("Invalid value '{value}' for filter '{field}'"))
}

/// Accepts RFC 3339 or a naive ISO-8601 datetime/date, read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn bind_value(kind: ValueKind, field: &str, raw: &str) -> Result<Value> {
    match kind {
        ValueKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid_value(field, raw)),
        ValueKind::Timestamp => parse_timestamp(raw.trim())
            .map(Value::from)
            .ok_or_else(|| invalid_value(field, raw)),
        ValueKind::Text => Ok(Value::from(raw.to_owned())),
    }
}

/// Translate a SQL `LIKE` pattern into the equivalent `GLOB` pattern.
///
/// SQLite's `LIKE` ignores ASCII case while `GLOB` does not, so `like` is
/// rendered as `GLOB` there. GLOB metacharacters in the input are wrapped in
/// brackets to match literally.
#[must_use]
pub fn like_to_glob(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        match ch {
            '%' => glob.push('*'),
            '_' => glob.push('?'),
            '*' | '?' | '[' => {
                glob.push('[');
                glob.push(ch);
                glob.push(']');
            }
            _ => glob.push(ch),
        }
    }
    glob
}

fn qualified<C: ColumnTrait>(column: C) -> SimpleExpr {
    Expr::col((column.entity_name(), column)).into()
}

fn pattern_predicate<C: ColumnTrait>(
    column: C,
    operator: FilterOperator,
    pattern: &str,
    backend: DatabaseBackend,
) -> SimpleExpr {
    match (operator, backend) {
        (FilterOperator::ILike, _) => Expr::cust_with_exprs(
            "UPPER($1) LIKE UPPER($2)",
            [qualified(column), Expr::val(pattern).into()],
        ),
        (_, DatabaseBackend::Sqlite) => Expr::cust_with_exprs(
            "$1 GLOB $2",
            [qualified(column), Expr::val(like_to_glob(pattern)).into()],
        ),
        _ => column.like(pattern),
    }
}

/// Build the predicate for one filter against an allow-listed column.
///
/// # Errors
///
/// Fails with a validation error when the operator is unknown, when the
/// value cannot be bound to the column type, or when a pattern operator is
/// used on a non-text column.
pub fn build_predicate<C: ColumnTrait>(
    field: &str,
    raw: &str,
    column: C,
    backend: DatabaseBackend,
) -> Result<SimpleExpr> {
    let (operator, value) = parse_filter(raw)?;
    let kind = ValueKind::of(column);

    if operator.is_pattern() {
        if kind != ValueKind::Text {
            return Err(CatalogError::validation(format!(
                "Operator '{operator}' is not supported for filter '{field}'"
            )));
        }
        return Ok(pattern_predicate(column, operator, value, backend));
    }

    if operator == FilterOperator::In {
        let values = value
            .split(',')
            .map(|item| bind_value(kind, field, item))
            .collect::<Result<Vec<_>>>()?;
        return Ok(column.is_in(values));
    }

    let bound = bind_value(kind, field, value)?;
    Ok(match operator {
        FilterOperator::Ne => column.ne(bound),
        FilterOperator::Lt => column.lt(bound),
        FilterOperator::Lte => column.lte(bound),
        FilterOperator::Gt => column.gt(bound),
        FilterOperator::Gte => column.gte(bound),
        _ => column.eq(bound),
    })
}

/// AND together one predicate per filter.
///
/// Every field name is checked against `allowed` before any predicate is
/// built, so a rejected field never leaves the others half applied.
///
/// # Errors
///
/// `Filtering by '<field>' is not allowed.` for the first field outside the
/// allow-list, otherwise whatever [`build_predicate`] reports.
pub fn build_condition<C: ColumnTrait>(
    filters: &[(String, String)],
    allowed: &[(&'static str, C)],
    backend: DatabaseBackend,
) -> Result<Condition> {
    let resolved = filters
        .iter()
        .map(|(field, raw)| {
            allowed
                .iter()
                .find(|(name, _)| *name == field.as_str())
                .map(|&(_, column)| (field.as_str(), raw.as_str(), column))
                .ok_or_else(|| {
                    tracing::debug!(field = %field, "rejected filter outside allow-list");
                    CatalogError::validation(format!("Filtering by '{field}' is not allowed."))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    resolved
        .into_iter()
        .try_fold(Condition::all(), |condition, (field, raw, column)| {
            Ok(condition.add(build_predicate(field, raw, column, backend)?))
        })
}

/// Apply `filters` to a query. An empty filter list leaves it untouched.
///
/// # Errors
///
/// See [`build_condition`].
pub fn apply_filters<Q, C>(
    query: Q,
    filters: &[(String, String)],
    allowed: &[(&'static str, C)],
    backend: DatabaseBackend,
) -> Result<Q>
where
    Q: QueryFilter,
    C: ColumnTrait,
{
    if filters.is_empty() {
        return Ok(query);
    }
    Ok(query.filter(build_condition(filters, allowed, backend)?))
}
