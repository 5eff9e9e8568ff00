use std::collections::{HashMap, VecDeque};

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::svg::fmt_num;

use super::{GroupLayout, LayoutEngine, LayoutOptions, LinkLayout, NodeLayout, PositionedGraph};

const NODE_WIDTH: f64 = 10.0;
const NODE_PADDING: f64 = 8.0;
const GROUP_PADDING: f64 = 10.0;

/// Default layout engine: ranks nodes left to right, stacks them within a
/// rank, and routes links as horizontal Bézier bands whose thickness is
/// proportional to the link value.
#[derive(Debug, Default)]
pub struct SankeyEngine;

impl LayoutEngine for SankeyEngine {
    fn layout(&self, graph: &Graph, options: &LayoutOptions) -> Result<PositionedGraph> {
        compute(graph, options)
    }
}

struct LinkData {
    index: usize,
    from: usize,
    to: usize,
    value: f64,
}

fn compute(graph: &Graph, options: &LayoutOptions) -> Result<PositionedGraph> {
    let (width, height) = options.size;
    let node_count = graph.nodes.len();

    let mut id_to_idx: HashMap<&str, usize> = HashMap::with_capacity(node_count);
    for (idx, node) in graph.nodes.iter().enumerate() {
        id_to_idx.insert(node.id.as_str(), idx);
    }

    let mut links = Vec::with_capacity(graph.links.len());
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut in_total = vec![0.0f64; node_count];
    let mut out_total = vec![0.0f64; node_count];
    for (index, link) in graph.links.iter().enumerate() {
        let from = resolve_endpoint(&id_to_idx, &link.source)?;
        let to = resolve_endpoint(&id_to_idx, &link.target)?;
        // Decoding already rejected negative values.
        let value = link.value;
        outgoing[from].push(links.len());
        incoming[to].push(links.len());
        out_total[from] += value;
        in_total[to] += value;
        links.push(LinkData {
            index,
            from,
            to,
            value,
        });
    }

    let totals: Vec<f64> = (0..node_count)
        .map(|idx| in_total[idx].max(out_total[idx]))
        .collect();

    let manual = options.position.is_some();
    let ranks = if manual {
        vec![0usize; node_count]
    } else {
        assign_ranks(graph, options, &id_to_idx, &links, node_count)?
    };

    let value_scale;
    let mut node_x = vec![0.0f64; node_count];
    let mut node_y = vec![0.0f64; node_count];

    if let Some((x_attr, y_attr)) = &options.position {
        let unit = options.scale.unwrap_or(1.0);
        value_scale = unit;
        for (idx, node) in graph.nodes.iter().enumerate() {
            node_x[idx] = position_attr(node, x_attr)? * unit;
            node_y[idx] = position_attr(node, y_attr)? * unit;
        }
    } else {
        let num_ranks = ranks.iter().copied().max().map_or(1, |max| max + 1);
        let gap_x = if num_ranks > 1 {
            ((width - NODE_WIDTH * num_ranks as f64) / (num_ranks - 1) as f64).max(0.0)
        } else {
            0.0
        };

        let mut rank_nodes: Vec<Vec<usize>> = vec![Vec::new(); num_ranks];
        for idx in 0..node_count {
            rank_nodes[ranks[idx]].push(idx);
        }
        // Within a rank, explicit ordering dictates the stacking; otherwise
        // input order does.
        if let Some(ordering) = &options.ordering {
            let position_in_layer: HashMap<&str, usize> = ordering
                .iter()
                .flatten()
                .enumerate()
                .map(|(pos, id)| (id.as_str(), pos))
                .collect();
            for nodes_in_rank in &mut rank_nodes {
                nodes_in_rank.sort_by_key(|&idx| {
                    position_in_layer
                        .get(graph.nodes[idx].id.as_str())
                        .copied()
                        .unwrap_or(usize::MAX)
                });
            }
        }

        value_scale = fit_scale(&rank_nodes, &totals, height);
        for nodes_in_rank in &rank_nodes {
            let used: f64 = nodes_in_rank
                .iter()
                .map(|&idx| totals[idx] * value_scale)
                .sum::<f64>()
                + NODE_PADDING * nodes_in_rank.len().saturating_sub(1) as f64;
            let mut cursor = ((height - used) / 2.0).max(0.0);
            for &idx in nodes_in_rank {
                node_x[idx] = ranks[idx] as f64 * (NODE_WIDTH + gap_x);
                node_y[idx] = cursor;
                cursor += totals[idx] * value_scale + NODE_PADDING;
            }
        }
    }

    let node_h: Vec<f64> = totals.iter().map(|total| total * value_scale).collect();

    // Stack link bands down each node face: outgoing ordered by target
    // height, incoming by source height, offsets accumulated per node.
    let thickness: Vec<f64> = links.iter().map(|link| link.value * value_scale).collect();
    let mut out_offset = vec![0.0f64; links.len()];
    let mut in_offset = vec![0.0f64; links.len()];
    for idx in 0..node_count {
        let mut ordered = outgoing[idx].clone();
        ordered.sort_by(|&a, &b| {
            node_y[links[a].to]
                .total_cmp(&node_y[links[b].to])
                .then(links[a].index.cmp(&links[b].index))
        });
        let mut acc = 0.0;
        for link_idx in ordered {
            out_offset[link_idx] = acc;
            acc += thickness[link_idx];
        }
        let mut ordered = incoming[idx].clone();
        ordered.sort_by(|&a, &b| {
            node_y[links[a].from]
                .total_cmp(&node_y[links[b].from])
                .then(links[a].index.cmp(&links[b].index))
        });
        let mut acc = 0.0;
        for link_idx in ordered {
            in_offset[link_idx] = acc;
            acc += thickness[link_idx];
        }
    }

    let mut link_layouts = Vec::with_capacity(links.len());
    for (link_idx, link) in links.iter().enumerate() {
        let band = thickness[link_idx];
        if band <= 0.0 {
            continue;
        }
        let x0 = node_x[link.from] + NODE_WIDTH;
        let x1 = node_x[link.to];
        let y0 = node_y[link.from] + out_offset[link_idx] + band / 2.0;
        let y1 = node_y[link.to] + in_offset[link_idx] + band / 2.0;
        link_layouts.push(LinkLayout {
            index: link.index,
            source: graph.nodes[link.from].id.clone(),
            target: graph.nodes[link.to].id.clone(),
            path: band_path(x0, y0, x1, y1, band),
            width: band,
        });
    }

    let node_layouts: Vec<NodeLayout> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| NodeLayout {
            id: node.id.clone(),
            rank: ranks[idx],
            x: node_x[idx],
            y: node_y[idx],
            width: NODE_WIDTH,
            height: node_h[idx],
            value: totals[idx],
        })
        .collect();

    let groups = layout_groups(graph, &id_to_idx, &node_layouts)?;

    Ok(PositionedGraph {
        nodes: node_layouts,
        links: link_layouts,
        groups,
        width,
        height,
    })
}

fn resolve_endpoint(id_to_idx: &HashMap<&str, usize>, id: &str) -> Result<usize> {
    id_to_idx
        .get(id)
        .copied()
        .ok_or_else(|| Error::Layout(format!("link references unknown node {id:?}")))
}

fn position_attr(node: &crate::graph::Node, attr: &str) -> Result<f64> {
    node.extra
        .get(attr)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| {
            Error::Layout(format!(
                "node {:?} has no numeric {attr:?} attribute for manual placement",
                node.id
            ))
        })
}

/// Rank assignment: explicit ordering, else longest-path ranks over a
/// topological order, with rank sets pinning their members afterwards.
fn assign_ranks(
    graph: &Graph,
    options: &LayoutOptions,
    id_to_idx: &HashMap<&str, usize>,
    links: &[LinkData],
    node_count: usize,
) -> Result<Vec<usize>> {
    if let Some(ordering) = &options.ordering {
        let mut ranks = vec![usize::MAX; node_count];
        for (rank, layer) in ordering.iter().enumerate() {
            for id in layer {
                let idx = id_to_idx.get(id.as_str()).copied().ok_or_else(|| {
                    Error::Layout(format!("ordering references unknown node {id:?}"))
                })?;
                ranks[idx] = rank;
            }
        }
        if let Some(idx) = ranks.iter().position(|&rank| rank == usize::MAX) {
            return Err(Error::Layout(format!(
                "node {:?} is missing from the ordering",
                graph.nodes[idx].id
            )));
        }
        return Ok(ranks);
    }

    let mut indegree = vec![0usize; node_count];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (link_idx, link) in links.iter().enumerate() {
        indegree[link.to] += 1;
        outgoing[link.from].push(link_idx);
    }
    let mut queue: VecDeque<usize> = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, &deg)| (deg == 0).then_some(idx))
        .collect();
    let mut topo = Vec::with_capacity(node_count);
    while let Some(idx) = queue.pop_front() {
        topo.push(idx);
        for &link_idx in &outgoing[idx] {
            let to = links[link_idx].to;
            indegree[to] -= 1;
            if indegree[to] == 0 {
                queue.push_back(to);
            }
        }
    }
    if topo.len() != node_count {
        let stuck: Vec<&str> = indegree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg > 0)
            .map(|(idx, _)| graph.nodes[idx].id.as_str())
            .collect();
        return Err(Error::Layout(format!(
            "cannot rank cyclic flow through {}",
            stuck.join(", ")
        )));
    }

    let mut ranks = vec![0usize; node_count];
    for &idx in &topo {
        for &link_idx in &outgoing[idx] {
            let to = links[link_idx].to;
            ranks[to] = ranks[to].max(ranks[idx] + 1);
        }
    }

    for set in &graph.rank_sets {
        let mut pinned = 0usize;
        for id in &set.nodes {
            let idx = id_to_idx.get(id.as_str()).copied().ok_or_else(|| {
                Error::Layout(format!("rank set references unknown node {id:?}"))
            })?;
            pinned = pinned.max(ranks[idx]);
        }
        for id in &set.nodes {
            ranks[id_to_idx[id.as_str()]] = pinned;
        }
    }

    Ok(ranks)
}

/// Value-to-pixel scale that lets the tallest rank fill the height.
fn fit_scale(rank_nodes: &[Vec<usize>], totals: &[f64], height: f64) -> f64 {
    let mut scale = f64::INFINITY;
    for nodes_in_rank in rank_nodes {
        let sum: f64 = nodes_in_rank.iter().map(|&idx| totals[idx]).sum();
        if sum <= 0.0 {
            continue;
        }
        let usable =
            (height - NODE_PADDING * nodes_in_rank.len().saturating_sub(1) as f64).max(1.0);
        scale = scale.min(usable / sum);
    }
    if scale.is_finite() { scale } else { 1.0 }
}

/// Closed outline of a link band: the top edge curves from source to
/// target, the bottom edge curves back offset by the band width, so the
/// filled area is the flow.
fn band_path(x0: f64, y0: f64, x1: f64, y1: f64, width: f64) -> String {
    let mid = (x0 + x1) / 2.0;
    let half = width / 2.0;
    format!(
        "M{},{}C{},{} {},{} {},{}L{},{}C{},{} {},{} {},{}Z",
        fmt_num(x0),
        fmt_num(y0 - half),
        fmt_num(mid),
        fmt_num(y0 - half),
        fmt_num(mid),
        fmt_num(y1 - half),
        fmt_num(x1),
        fmt_num(y1 - half),
        fmt_num(x1),
        fmt_num(y1 + half),
        fmt_num(mid),
        fmt_num(y1 + half),
        fmt_num(mid),
        fmt_num(y0 + half),
        fmt_num(x0),
        fmt_num(y0 + half)
    )
}

fn layout_groups(
    graph: &Graph,
    id_to_idx: &HashMap<&str, usize>,
    nodes: &[NodeLayout],
) -> Result<Vec<GroupLayout>> {
    let mut groups = Vec::with_capacity(graph.groups.len());
    for group in &graph.groups {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for id in &group.nodes {
            let idx = id_to_idx.get(id.as_str()).copied().ok_or_else(|| {
                Error::Layout(format!(
                    "group {:?} references unknown node {id:?}",
                    group.id
                ))
            })?;
            let node = &nodes[idx];
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + node.width);
            max_y = max_y.max(node.y + node.height);
        }
        if !min_x.is_finite() {
            // A group with no members has no box to draw.
            continue;
        }
        groups.push(GroupLayout {
            id: group.id.clone(),
            title: group.title.clone(),
            x: min_x - GROUP_PADDING,
            y: min_y - GROUP_PADDING,
            width: (max_x - min_x) + 2.0 * GROUP_PADDING,
            height: (max_y - min_y) + 2.0 * GROUP_PADDING,
        });
    }
    Ok(groups)
}
