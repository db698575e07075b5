use blender_config::AdaptiveBlockSize;

/// Block size for a blend whose sources report `total` results combined.
///
/// The first rule whose inclusive range contains `total` wins; `default` applies otherwise.
pub fn select_block_size(total: u64, default: usize, rules: &[AdaptiveBlockSize]) -> usize {
	rules.iter().find(|rule| rule.contains(total)).map(|rule| rule.size as usize).unwrap_or(default)
}
