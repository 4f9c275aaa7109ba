//! Fragment graph resolution
//!
//! Runs once after every package is parsed:
//!
//! 1. Drop output edges whose target was never parsed, then derive each
//!    fragment's `inputs` from the surviving outputs.
//! 2. Give every fragment without a declared speaker the declared speaker of
//!    its first direct predecessor that has one.
//!
//! Inference looks back a single hop. A chain of two speaker-less connector
//! nodes leaves the second one without a speaker.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::Fragment;

/// Counts reported by a resolver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Output edges removed because their target does not exist
    pub dangling_edges: usize,
    /// Edges kept after pruning
    pub edges: usize,
    /// Fragments that received an inferred speaker
    pub inferred_speakers: usize,
    /// Fragments still without a speaker
    pub unresolved_speakers: usize,
}

/// Normalize edges and infer speakers for the whole fragment mapping.
pub(crate) fn resolve_fragments(fragments: &mut IndexMap<String, Fragment>) -> ResolveStats {
    let mut stats = ResolveStats::default();
    link_edges(fragments, &mut stats);
    infer_speakers(fragments, &mut stats);

    tracing::debug!(
        "Resolved fragment graph: {} edges ({} dangling dropped), {} speakers inferred, {} unresolved",
        stats.edges,
        stats.dangling_edges,
        stats.inferred_speakers,
        stats.unresolved_speakers
    );
    stats
}

fn link_edges(fragments: &mut IndexMap<String, Fragment>, stats: &mut ResolveStats) {
    let known: HashSet<String> = fragments.keys().cloned().collect();

    for fragment in fragments.values_mut() {
        let before = fragment.outputs.len();
        fragment.outputs.retain(|target| known.contains(target));
        stats.dangling_edges += before - fragment.outputs.len();
        // Inputs are derived, so a second run must not append to the first run's.
        fragment.inputs.clear();
    }

    let edges: Vec<(String, String)> = fragments
        .iter()
        .flat_map(|(source, fragment)| {
            fragment
                .outputs
                .iter()
                .map(move |target| (source.clone(), target.clone()))
        })
        .collect();

    stats.edges = edges.len();
    for (source, target) in edges {
        if let Some(fragment) = fragments.get_mut(&target) {
            fragment.inputs.push(source);
        }
    }
}

fn infer_speakers(fragments: &mut IndexMap<String, Fragment>, stats: &mut ResolveStats) {
    // Decide every inference before applying any, so one fragment's inferred
    // speaker never feeds another's.
    let inferred: Vec<(usize, Option<String>)> = fragments
        .values()
        .enumerate()
        .filter(|(_, fragment)| fragment.declared_speaker().is_none())
        .map(|(index, fragment)| {
            let speaker = fragment.inputs.iter().find_map(|source| {
                fragments
                    .get(source)
                    .and_then(Fragment::declared_speaker)
                    .map(str::to_string)
            });
            (index, speaker)
        })
        .collect();

    for (index, speaker) in inferred {
        let Some((_, fragment)) = fragments.get_index_mut(index) else {
            continue;
        };
        if speaker.is_some() {
            stats.inferred_speakers += 1;
        } else {
            stats.unresolved_speakers += 1;
        }
        fragment.speaker_inferred = speaker.is_some();
        fragment.speaker = speaker;
    }
}
