use crate::{Error, Result, SourceKind};

/// Parameters for one blend: alternating block size plus the optional boost window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlendConfig {
	block_size: usize,
	boost_position: Option<usize>,
	boost_count: usize,
}
impl BlendConfig {
	/// `boost_position` is the number of records shown before the boost window opens. When
	/// unset it defaults to `block_size`, which pushes the window out of the first block and
	/// leaves plain alternation in place.
	pub fn new(
		block_size: usize,
		boost_position: Option<usize>,
		boost_count: usize,
	) -> Result<Self> {
		if block_size == 0 {
			return Err(Error::InvalidBlockSize);
		}

		Ok(Self { block_size, boost_position, boost_count })
	}

	pub fn from_blending(cfg: &blender_config::Blending) -> Result<Self> {
		Self::new(
			cfg.block_size as usize,
			cfg.boost_position.map(|position| position as usize),
			cfg.boost_count as usize,
		)
	}

	pub fn with_block_size(self, block_size: usize) -> Result<Self> {
		Self::new(block_size, self.boost_position, self.boost_count)
	}

	pub fn block_size(&self) -> usize {
		self.block_size
	}

	pub fn boost_position(&self) -> usize {
		self.boost_position.unwrap_or(self.block_size)
	}

	pub fn boost_count(&self) -> usize {
		self.boost_count
	}
}

/// Which rule decided the source preference at an output position.
///
/// Rules are checked in declaration order; the first match wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
	/// Outside the boost-affected range: even blocks are primary, odd blocks secondary.
	Alternating(SourceKind),
	/// Inside the boost window. Secondary records are pulled up into the first primary block.
	BoostWindow,
	/// After the window, the first primary block runs `boost_count` slots longer to make up for
	/// the records the window displaced.
	ExtendedPrimaryBlock,
	/// Inside the affected range but past the extended primary block. Unreachable while the
	/// window fits inside the first block, which is the only case boosting applies to.
	Remainder,
}
impl Placement {
	pub fn source(self) -> SourceKind {
		match self {
			Self::Alternating(source) => source,
			Self::BoostWindow => SourceKind::Secondary,
			Self::ExtendedPrimaryBlock => SourceKind::Primary,
			Self::Remainder => SourceKind::Secondary,
		}
	}
}

/// Source preference for the 0-based output `position`, independent of queue contents.
pub fn placement_at(position: usize, cfg: &BlendConfig) -> Placement {
	let block_size = cfg.block_size;
	let boost_pos = cfg.boost_position();
	let boost_count = cfg.boost_count;

	if boost_count == 0 || position < boost_pos {
		return Placement::Alternating(alternating_source(position, block_size));
	}

	let max_boosted_pos = boost_pos + boost_count;
	let max_affected_pos = max_boosted_pos.div_ceil(block_size) * block_size + boost_count - 1;

	if position > max_affected_pos || max_boosted_pos > block_size {
		return Placement::Alternating(alternating_source(position, block_size));
	}
	if position < max_boosted_pos {
		return Placement::BoostWindow;
	}
	if position < block_size + boost_count {
		return Placement::ExtendedPrimaryBlock;
	}

	Placement::Remainder
}

pub fn is_primary_at_offset(position: usize, cfg: &BlendConfig) -> bool {
	placement_at(position, cfg).source() == SourceKind::Primary
}

fn alternating_source(position: usize, block_size: usize) -> SourceKind {
	if (position / block_size) % 2 == 0 { SourceKind::Primary } else { SourceKind::Secondary }
}
