// Service exports
pub mod reader;
pub mod writer;

pub use reader::{parse_line, InputReader, ParseError, Record};
pub use writer::{OccupantOrder, OutputFormat, OutputWriter, WriteError};
