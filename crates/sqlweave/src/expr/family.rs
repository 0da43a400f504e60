//! Scalar family markers.
//!
//! A family tag parameterizes [`Expr`](super::Expr) so operand mismatches are
//! compile errors. The tags carry no data; [`FamilyKind`] is their runtime
//! mirror, used by table descriptions.

/// Runtime name of a scalar family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    Bool,
    Integer,
    Float,
    Text,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,
    Bytes,
    Uuid,
    Json,
}

impl FamilyKind {
    /// Postgres type name; the default of [`Dialect::cast_type`](crate::Dialect::cast_type).
    pub fn sql_type(self) -> &'static str {
        match self {
            FamilyKind::Bool => "boolean",
            FamilyKind::Integer => "bigint",
            FamilyKind::Float => "double precision",
            FamilyKind::Text => "text",
            FamilyKind::Date => "date",
            FamilyKind::Time => "time without time zone",
            FamilyKind::TimeTz => "time with time zone",
            FamilyKind::Timestamp => "timestamp without time zone",
            FamilyKind::TimestampTz => "timestamp with time zone",
            FamilyKind::Interval => "interval",
            FamilyKind::Bytes => "bytea",
            FamilyKind::Uuid => "uuid",
            FamilyKind::Json => "jsonb",
        }
    }
}

/// A scalar family tag.
pub trait Family: Send + Sync + 'static {
    const KIND: FamilyKind;
}

/// Families supporting `<`, `>`, `BETWEEN`, `MIN`/`MAX`.
pub trait Ordered: Family {}

/// Families supporting arithmetic.
pub trait Numeric: Ordered {}

/// Date/time families supporting interval arithmetic.
pub trait Temporal: Ordered {}

macro_rules! families {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name;

            impl Family for $name {
                const KIND: FamilyKind = FamilyKind::$kind;
            }
        )*
    };
}

families! {
    /// `boolean`
    Bool => Bool,
    /// Any integer width.
    Integer => Integer,
    /// Floating point and numeric.
    Float => Float,
    /// Character strings.
    Text => Text,
    Date => Date,
    /// Time of day.
    Time => Time,
    /// Time of day with zone.
    TimeTz => TimeTz,
    Timestamp => Timestamp,
    /// Timestamp with zone.
    TimestampTz => TimestampTz,
    Interval => Interval,
    Bytes => Bytes,
    Uuid => Uuid,
    Json => Json,
}

impl Ordered for Integer {}
impl Ordered for Float {}
impl Ordered for Text {}
impl Ordered for Date {}
impl Ordered for Time {}
impl Ordered for TimeTz {}
impl Ordered for Timestamp {}
impl Ordered for TimestampTz {}
impl Ordered for Interval {}
impl Ordered for Uuid {}
impl Ordered for Bool {}

impl Numeric for Integer {}
impl Numeric for Float {}

impl Temporal for Date {}
impl Temporal for Time {}
impl Temporal for TimeTz {}
impl Temporal for Timestamp {}
impl Temporal for TimestampTz {}
