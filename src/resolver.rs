//! Connection resolver.
//!
//! [`resolve`] derives every edge of the block graph from block positions
//! alone. Each pass is a full rebuild:
//!
//! 1. **Reset** all links.
//! 2. **Match** every ordered pair of blocks in insertion order against the
//!    sequential, argument and nest-body slots. A block within
//!    [`ResolverConfig::distance_range`] of a free slot is snapped onto it
//!    together with everything already linked below it. The first match in
//!    iteration order wins, not the closest one.
//! 3. **Reflow** nest blocks, deepest first: each bar is resized to fit its
//!    body and whatever follows the nest block is moved by the same amount as
//!    its end point.
//!
//! Snapping and reflow move blocks, which can bring a moved block's slots
//! within range of a still free block. Match and reflow therefore repeat,
//! keeping the links made so far, until a round adds no link. A slot bound
//! in an earlier round stays bound, so insertion order still decides ties.
//!
//! A pass over an already resolved layout changes nothing.

use crate::block::{BlockId, BAR_BASE_EXTENT, NEST_INCREMENT};
use crate::graph::{check_slot, BlockGraph, Slot, SlotCheck};
use tracing::{debug, trace};

/// Default connection snap threshold, in canvas units.
pub const DISTANCE_RANGE: f32 = 20.0;

/// Resolver tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// A block attaches to a slot when its start point is strictly closer
    /// than this.
    pub distance_range: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            distance_range: DISTANCE_RANGE,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance_range(mut self, distance_range: f32) -> Self {
        self.distance_range = distance_range;
        self
    }
}

/// Summary of one resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    /// Edges created by the pass.
    pub links: usize,
    /// Blocks left without a predecessor.
    pub heads: usize,
    /// Nest blocks whose bar was recomputed.
    pub reflowed: usize,
}

impl ResolveReport {
    /// Whether the graph has exactly one entry block.
    pub fn is_executable(&self) -> bool {
        self.heads == 1
    }
}

/// Rebuild all links of `graph` from block positions.
#[tracing::instrument(level = "debug", skip_all, fields(blocks = graph.len()))]
pub fn resolve(graph: &mut BlockGraph, config: &ResolverConfig) -> ResolveReport {
    graph.reset_links();
    let mut links = match_slots(graph, config.distance_range);
    let mut reflowed = reflow(graph);

    // Every round that continues adds at least one link, and each block has
    // at most one predecessor.
    let mut rounds = 1;
    while links > 0 && rounds <= graph.len() {
        let added = match_slots(graph, config.distance_range);
        if added == 0 {
            break;
        }
        links += added;
        reflowed = reflow(graph);
        rounds += 1;
    }

    let report = ResolveReport {
        links,
        heads: graph.heads().len(),
        reflowed,
    };
    debug!(links, heads = report.heads, reflowed, rounds, "resolved block connections");
    report
}

fn match_slots(graph: &mut BlockGraph, range: f32) -> usize {
    let ids: Vec<BlockId> = graph.ids().collect();
    let mut links = 0;

    for &source in &ids {
        for &target in &ids {
            if source == target {
                continue;
            }
            for slot in Slot::ALL {
                match check_slot(graph, source, target, slot, range) {
                    SlotCheck::Accept => {
                        let Some(point) = slot.point(&graph[source]) else {
                            continue;
                        };
                        graph.snap(target, point);
                        graph.link(source, target, slot);
                        links += 1;
                        trace!(
                            source = source.index(),
                            target = target.index(),
                            ?slot,
                            "attached block"
                        );
                    }
                    SlotCheck::Reject(reason) if reason.is_contention() => {
                        trace!(
                            source = source.index(),
                            target = target.index(),
                            ?slot,
                            %reason,
                            "slot contention resolved by insertion order"
                        );
                    }
                    SlotCheck::Reject(_) => {}
                }
            }
        }
    }
    links
}

/// Resize every nest block to its body, innermost first.
fn reflow(graph: &mut BlockGraph) -> usize {
    let mut nests: Vec<(usize, BlockId)> = graph
        .iter()
        .filter(|(_, block)| block.kind().is_nest())
        .map(|(id, _)| (graph.nesting_depth(id), id))
        .collect();
    // Stable sort keeps insertion order among blocks of equal depth.
    nests.sort_by(|a, b| b.0.cmp(&a.0));

    for &(_, nest) in &nests {
        reflow_nest(graph, nest);
    }
    nests.len()
}

fn reflow_nest(graph: &mut BlockGraph, nest: BlockId) {
    let body: f32 = graph
        .body_chain(nest)
        .map(|id| {
            let block = &graph[id];
            if block.kind().is_nest() {
                block.extent()
            } else {
                NEST_INCREMENT
            }
        })
        .sum();

    let delta = graph[nest].set_bar_extent(BAR_BASE_EXTENT + body);
    if let Some(next) = graph[nest].next_block() {
        let end = graph[nest].end_point();
        graph.snap(next, end);
    }
    trace!(nest = nest.index(), body, dy = delta.y, "reflowed nest block");
}
