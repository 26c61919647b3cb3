use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tech_tree_router::config::{GridConfig, RoutingConfig};
use tech_tree_router::ir::{LayoutOrientation, LayoutState, Node};
use tech_tree_router::layout::recompute;
use tech_tree_router::measure::GridRectProvider;

/// `tiers` rows of `width` nodes. Every node links to the node above it and,
/// every `cross_every` columns, to the neighbour above and to the right.
fn tiered_tree(tiers: usize, width: usize, cross_every: usize) -> LayoutState {
    let mut nodes = Vec::with_capacity(tiers * width);
    for tier in 0..tiers {
        for col in 0..width {
            let mut node = Node::new(format!("n{tier}_{col}"), format!("tier-{tier}"), col as u32)
                .with_group(format!("g{}", col % 4));
            if tier > 0 {
                node = node.with_parent(format!("n{}_{col}", tier - 1));
                if cross_every > 0 && col % cross_every == 0 && col + 1 < width {
                    node = node.with_parent(format!("n{}_{}", tier - 1, col + 1));
                }
            }
            nodes.push(node);
        }
    }
    LayoutState::new(nodes)
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");
    let grid = GridConfig::default();
    let config = RoutingConfig::default();
    for (tiers, width) in [(4usize, 6usize), (8, 10), (12, 16)] {
        let state = tiered_tree(tiers, width, 3);
        let rects = GridRectProvider::new(&state, &grid);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tiers}x{width}")),
            &state,
            |b, state| {
                b.iter(|| {
                    let result = recompute(black_box(state), &rects, &config);
                    black_box(result.routed_paths.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_recompute_horizontal(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_horizontal");
    let grid = GridConfig::default();
    let config = RoutingConfig::default();
    for (tiers, width) in [(6usize, 6usize), (10, 12)] {
        let mut state = tiered_tree(tiers, width, 2);
        state.orientation = LayoutOrientation::Horizontal;
        let rects = GridRectProvider::new(&state, &grid);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tiers}x{width}")),
            &state,
            |b, state| {
                b.iter(|| {
                    let result = recompute(black_box(state), &rects, &config);
                    black_box(result.crossed_edge_ids.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_recompute, bench_recompute_horizontal);
criterion_main!(benches);
