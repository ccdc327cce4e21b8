use num_enum::{TryFromPrimitive, TryFromPrimitiveError};

/// A code that is either resolved to a table entry or kept as the raw number
/// when the table does not define it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code<Enum, N> {
    Name(Enum),
    Num(N),
}

pub use Code::{Name, Num};

impl<Enum, N> From<Result<Enum, TryFromPrimitiveError<Enum>>> for Code<Enum, N>
where
    Enum: TryFromPrimitive<Primitive = N>,
{
    fn from(result: Result<Enum, TryFromPrimitiveError<Enum>>) -> Self {
        match result {
            Ok(e) => Self::Name(e),
            Err(TryFromPrimitiveError { number: n }) => Self::Num(n),
        }
    }
}
