//! PostgreSQL wire protocol pieces needed for column metadata.

pub mod buffer;
pub mod constants;
pub mod row_description;

pub use buffer::ReadBuffer;
pub use row_description::{parse_row_description, FieldDescription};
