
pub(crate) use factories::*;
