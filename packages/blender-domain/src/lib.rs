//! Pure blending primitives: where each source's records land on a blended page, and how two
//! facet vocabularies fold into one.

mod error;

pub mod adaptive;
pub mod facets;
pub mod interleave;
pub mod placement;
pub mod records;

pub use error::{Error, Result};
pub use facets::{FacetCounts, FacetFieldMapping, FacetFields, merge_facets};
pub use interleave::interleave;
pub use placement::{BlendConfig, Placement, is_primary_at_offset, placement_at};
pub use records::{RecordSequence, SourceKind, Tagged};
