mod filter;
mod graph;
mod parse;
mod reference;
mod source;

pub use filter::{Criterion, FilterCriteria, filter};
pub use graph::{Attribute, Details, GeoPoint, Graph, Link, LocationDirectory, NO_CONSTRAINT, Node};
pub use reference::{ReferenceValues, UnknownValue};
pub use source::{DataDir, DataSource};
#[cfg(test)]
pub use source::MemorySource;
