//! Normalization of scholarly metadata from heterogeneous sources.
//!
//! The crate sniffs the format of an input (a DOI, a URL, or a raw document
//! string), parses it with the matching reader, and produces one
//! [`NormalizedRecord`] per work: canonical identifiers, classified
//! contributors, ISO dates, SPDX-resolved licenses, filtered relations.
//!
//! The usual entry point is [`metadata::build`]; the identifier and mapper
//! modules are public for callers that only need one normalization step.

pub mod contributor;
pub mod date;
pub mod fetch;
pub mod identifier;
pub mod license;
pub mod metadata;
pub mod reader;
pub mod record;
pub mod relation;
pub mod sniffer;

pub use contributor::Contributor;
pub use license::License;
pub use metadata::{MetadataOptions, build};
pub use record::{NormalizedRecord, State, WorkType};
pub use sniffer::Format;
