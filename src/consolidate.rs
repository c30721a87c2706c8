use crate::ir::{CategoryEntry, CategoryMapping};
use crate::summarize::sort_descending;

/// Keep the `top_n` largest observed entries and merge everything else into
/// one remainder entry appended last.
///
/// Observed entries are ranked by descending measure (stable). When no more
/// than `top_n` of them exist the mapping is returned unchanged, so a mapping
/// that already carries a remainder is a fixed point. A pre-existing remainder
/// is folded into the new one. If a kept entry already uses `other_label`, the
/// remainder is named `"<other_label> (2)"`, `"(3)"`, ... instead.
pub fn consolidate_top_n(mapping: CategoryMapping, top_n: usize, other_label: &str) -> CategoryMapping {
    let top_n = top_n.max(1);

    let observed = mapping.iter().filter(|e| !e.is_remainder()).count();
    if observed <= top_n {
        return mapping;
    }

    let (mut ranked, previous): (Vec<CategoryEntry>, Vec<CategoryEntry>) =
        mapping.entries.into_iter().partition(|e| !e.is_remainder());
    sort_descending(&mut ranked);

    let excluded = ranked.split_off(top_n);
    let rest: f64 = excluded.iter().chain(previous.iter()).map(|e| e.measure).sum();

    let label = remainder_label(&ranked, other_label);
    ranked.push(CategoryEntry::remainder(label, rest));

    CategoryMapping::new(ranked)
}

/// First variant of `other_label` not already used by a kept entry
fn remainder_label(kept: &[CategoryEntry], other_label: &str) -> String {
    let taken = |candidate: &str| kept.iter().any(|e| e.label == candidate);
    if !taken(other_label) {
        return other_label.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", other_label, n))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| other_label.to_string())
}
