//! Ordering graph checks over a finalized catalog.
//!
//! Synthesis never resolves cycles; this is the consumer-side check the CLI
//! runs after finalization.

use crate::catalog::{EdgeSet, ResourceRef};
use std::collections::BTreeMap;

/// Adjacency built from an edge set: source -> targets.
pub fn adjacency(edges: &EdgeSet) -> BTreeMap<&ResourceRef, Vec<&ResourceRef>> {
    let mut children = BTreeMap::<&ResourceRef, Vec<&ResourceRef>>::new();
    for e in edges {
        children.entry(&e.source).or_default().push(&e.target);
        children.entry(&e.target).or_default();
    }
    children
}

/// Return the first cycle found, closed (first element repeated at the end).
pub fn find_cycle(edges: &EdgeSet) -> Option<Vec<ResourceRef>> {
    // DFS coloring.
    #[derive(Copy, Clone, PartialEq, Eq)]
    enum Mark {
        Temp,
        Perm,
    }

    fn dfs<'a>(
        v: &'a ResourceRef,
        children: &BTreeMap<&'a ResourceRef, Vec<&'a ResourceRef>>,
        marks: &mut BTreeMap<&'a ResourceRef, Mark>,
        stack: &mut Vec<&'a ResourceRef>,
    ) -> Option<Vec<ResourceRef>> {
        match marks.get(v) {
            Some(Mark::Perm) => return None,
            Some(Mark::Temp) => {
                // v is on the current path => cycle from its first occurrence.
                let start = stack.iter().position(|s| *s == v).unwrap_or(0);
                let mut cycle: Vec<ResourceRef> =
                    stack[start..].iter().map(|r| (*r).clone()).collect();
                cycle.push(v.clone());
                return Some(cycle);
            }
            None => {}
        }

        marks.insert(v, Mark::Temp);
        stack.push(v);

        if let Some(kids) = children.get(v) {
            for &k in kids {
                if let Some(cycle) = dfs(k, children, marks, stack) {
                    return Some(cycle);
                }
            }
        }

        stack.pop();
        marks.insert(v, Mark::Perm);
        None
    }

    let children = adjacency(edges);
    let mut marks = BTreeMap::<&ResourceRef, Mark>::new();
    let mut stack = Vec::<&ResourceRef>::new();
    for &v in children.keys() {
        stack.clear();
        if let Some(cycle) = dfs(v, &children, &mut marks, &mut stack) {
            return Some(cycle);
        }
    }
    None
}
