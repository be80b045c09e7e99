//! Essential ordering
//!
//! Computes the order slices must be materialized in so that every slice comes
//! after the slices it declares as essential.
//!
//! ## Process
//!
//! 1.  **Lookup**: Every requested key must name an existing package and slice.
//!
//! 2.  **Closure Walk**: Starting from the requested keys, follow `essential`
//!     edges, visiting each slice once, and record the edges in a graph.
//!
//! 3.  **Strongly Connected Components**: Tarjan's algorithm groups the graph
//!     into components, emitting a component only after every component it
//!     depends on. A component with more than one member, or a slice listing
//!     itself, is an essential loop.
//!
//! The same routine validates the whole release (every slice requested) and
//! builds the order of a concrete selection.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use log::debug;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::key::SliceKey;
use super::model::{Package, Slice};
use crate::error::{Error, Result};

/// Orders `keys` and everything they transitively require, essentials first.
pub fn order(packages: &BTreeMap<String, Package>, keys: &[SliceKey]) -> Result<Vec<SliceKey>> {
    // Check the requested keys upfront so the error names what was asked for.
    for key in keys {
        lookup(packages, key)?;
    }

    let mut graph: DiGraph<SliceKey, ()> = DiGraph::new();
    let mut nodes: HashMap<SliceKey, NodeIndex> = HashMap::new();
    let mut node_for = |graph: &mut DiGraph<SliceKey, ()>, key: &SliceKey| -> NodeIndex {
        *nodes
            .entry(key.clone())
            .or_insert_with(|| graph.add_node(key.clone()))
    };

    let mut pending: VecDeque<SliceKey> = keys.iter().cloned().collect();
    let mut seen: HashSet<SliceKey> = HashSet::new();
    while let Some(key) = pending.pop_front() {
        if !seen.insert(key.clone()) {
            continue;
        }
        let slice = lookup(packages, &key)?;
        let node = node_for(&mut graph, &key);
        for req in &slice.essential {
            if lookup(packages, req).is_err() {
                return Err(Error::MissingEssential {
                    slice: key.to_string(),
                    essential: req.to_string(),
                });
            }
            let req_node = node_for(&mut graph, req);
            graph.add_edge(node, req_node, ());
            pending.push_back(req.clone());
        }
    }

    let mut sorted = Vec::with_capacity(graph.node_count());
    for component in tarjan_scc(&graph) {
        let is_loop = match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        };
        if is_loop {
            return Err(Error::EssentialLoop {
                members: component.iter().map(|n| graph[*n].to_string()).collect(),
            });
        }
        sorted.push(graph[component[0]].clone());
    }

    debug!(
        "Ordered {} slices from {} requested",
        sorted.len(),
        keys.len()
    );
    Ok(sorted)
}

fn lookup<'a>(packages: &'a BTreeMap<String, Package>, key: &SliceKey) -> Result<&'a Slice> {
    let package = packages
        .get(&key.package)
        .ok_or_else(|| Error::PackageNotFound {
            package: key.package.clone(),
        })?;
    package
        .slices
        .get(&key.slice)
        .ok_or_else(|| Error::SliceNotFound {
            key: key.to_string(),
        })
}
