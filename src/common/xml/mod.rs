//! XML text helpers shared by the parser and the serializer.

mod escape;

pub use escape::escape_xml;
