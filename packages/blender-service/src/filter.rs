use blender_config::Sources;
use blender_domain::SourceKind;

/// Pseudo-facet field used to restrict a blend to some of its sources.
pub const SOURCE_FILTER_FIELD: &str = "blender_backend";

const INCLUDE_PREFIX: &str = "blender_backend:";
const EXCLUDE_PREFIX: &str = "-blender_backend:";
const OR_PREFIX: &str = "{!tag=blender_backend_filter}blender_backend:(";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActiveSources {
	pub primary: bool,
	pub secondary: bool,
}
impl ActiveSources {
	pub const ALL: Self = Self { primary: true, secondary: true };

	pub fn is_empty(&self) -> bool {
		!self.primary && !self.secondary
	}

	fn set(&mut self, source: SourceKind, active: bool) {
		match source {
			SourceKind::Primary => self.primary = active,
			SourceKind::Secondary => self.secondary = active,
		}
	}
}

/// Resolves `blender_backend` filters against the configured sources.
///
/// Inclusion filters (plain or the tagged OR form) narrow the active set to the sources they
/// name; exclusion filters are applied afterwards. Filters naming an unknown source are ignored.
/// Unrelated filters pass through untouched.
pub fn active_sources(sources: &Sources, filters: &[String]) -> ActiveSources {
	let mut included = ActiveSources { primary: false, secondary: false };

	for filter in filters {
		let or_terms = filter.strip_prefix(OR_PREFIX).and_then(|inner| inner.strip_suffix(')'));
		let terms: Vec<&str> = match or_terms {
			Some(inner) => inner.split(" OR ").collect(),
			None => vec![filter.as_str()],
		};

		for term in terms {
			let Some(id) = term.trim().strip_prefix(INCLUDE_PREFIX) else { continue };

			match resolve(sources, id) {
				Some(source) => included.set(source, true),
				None => tracing::warn!(
					filter = %filter,
					source_id = unquote(id),
					"Invalid blender_backend filter: source not enabled."
				),
			}
		}
	}

	let mut active = if included.is_empty() { ActiveSources::ALL } else { included };

	for filter in filters {
		let Some(id) = filter.trim().strip_prefix(EXCLUDE_PREFIX) else { continue };

		if let Some(source) = resolve(sources, id) {
			active.set(source, false);
		}
	}

	active
}

fn resolve(sources: &Sources, id: &str) -> Option<SourceKind> {
	let id = unquote(id);

	if id == sources.primary.id {
		Some(SourceKind::Primary)
	} else if id == sources.secondary.id {
		Some(SourceKind::Secondary)
	} else {
		None
	}
}

fn unquote(id: &str) -> &str {
	id.trim().trim_matches('"')
}
