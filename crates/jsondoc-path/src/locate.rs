//! Location-aware evaluation for mutation.
//!
//! Instead of handing out long-lived references into a tree that is
//! about to change, evaluation records each selected node as an index
//! path: the sequence of object keys and array indices leading to it
//! from the root. Mutation re-resolves each path against the live tree,
//! so a location invalidated by an earlier edit is skipped rather than
//! dereferenced.

use std::cmp::Ordering;

use jsondoc::Value;

use crate::ast::{Segment, SegmentKind, UnionEntry};
use crate::error::EvalError;
use crate::eval::{normalize_index, slice_positions};
use crate::filter;

/// One step from a parent container to a child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Key(String),
    Index(usize),
}

/// A selected node paired with the steps that reach it. The root has no
/// steps.
pub(crate) struct Located<'a> {
    pub(crate) node: &'a Value,
    pub(crate) steps: Vec<Step>,
}

impl<'a> Located<'a> {
    fn child(&self, node: &'a Value, step: Step) -> Located<'a> {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(step);
        Located { node, steps }
    }
}

/// Whether `Slice` entries inside a `Union` segment select slots.
/// Deletion skips them; reads and updates honor them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnionSlices {
    Honor,
    Skip,
}

pub(crate) fn evaluate<'a>(
    root: &'a Value,
    segments: &[Segment],
    union_slices: UnionSlices,
) -> Result<Vec<Located<'a>>, EvalError> {
    let mut current = vec![Located {
        node: root,
        steps: Vec::new(),
    }];
    for segment in segments {
        let base = if segment.recursive {
            let mut expanded = Vec::new();
            for item in &current {
                collect_descendants(item, &mut expanded);
            }
            expanded
        } else {
            current
        };
        let mut next = Vec::new();
        for item in &base {
            match &segment.kind {
                SegmentKind::Name(name) => push_member(item, name, &mut next),
                SegmentKind::Wildcard => push_children(item, &mut next),
                SegmentKind::Indices(indices) => {
                    if let Value::Array(items) = item.node {
                        for &raw in indices {
                            if let Some(index) = normalize_index(raw, items.len()) {
                                next.push(item.child(&items[index], Step::Index(index)));
                            }
                        }
                    }
                }
                SegmentKind::Slice(slice) => {
                    if let Value::Array(items) = item.node {
                        for index in slice_positions(slice, items.len())? {
                            next.push(item.child(&items[index], Step::Index(index)));
                        }
                    }
                }
                SegmentKind::Union(entries) => {
                    for entry in entries {
                        match entry {
                            UnionEntry::Name(name) => push_member(item, name, &mut next),
                            UnionEntry::Index(raw) => {
                                if let Value::Array(items) = item.node {
                                    if let Some(index) = normalize_index(*raw, items.len()) {
                                        next.push(item.child(&items[index], Step::Index(index)));
                                    }
                                }
                            }
                            UnionEntry::Slice(slice) => {
                                if union_slices == UnionSlices::Honor {
                                    if let Value::Array(items) = item.node {
                                        for index in slice_positions(slice, items.len())? {
                                            next.push(
                                                item.child(&items[index], Step::Index(index)),
                                            );
                                        }
                                    }
                                }
                            }
                            UnionEntry::Wildcard => push_children(item, &mut next),
                        }
                    }
                }
                SegmentKind::Filter(predicate) => match item.node {
                    Value::Array(items) => {
                        for (index, child) in items.iter().enumerate() {
                            if filter::evaluate(predicate, root, child)? {
                                next.push(item.child(child, Step::Index(index)));
                            }
                        }
                    }
                    Value::Object(map) => {
                        for (key, child) in map {
                            if filter::evaluate(predicate, root, child)? {
                                next.push(item.child(child, Step::Key(key.clone())));
                            }
                        }
                    }
                    _ => {}
                },
            }
        }
        current = next;
    }
    Ok(current)
}

fn push_member<'a>(item: &Located<'a>, name: &str, out: &mut Vec<Located<'a>>) {
    if let Value::Object(map) = item.node {
        if let Some(member) = map.get(name) {
            out.push(item.child(member, Step::Key(name.to_owned())));
        }
    }
}

fn push_children<'a>(item: &Located<'a>, out: &mut Vec<Located<'a>>) {
    match item.node {
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                out.push(item.child(child, Step::Index(index)));
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                out.push(item.child(child, Step::Key(key.clone())));
            }
        }
        _ => {}
    }
}

/// Pre-order traversal carrying step paths, including the node itself.
fn collect_descendants<'a>(item: &Located<'a>, out: &mut Vec<Located<'a>>) {
    let mut stack = vec![Located {
        node: item.node,
        steps: item.steps.clone(),
    }];
    while let Some(current) = stack.pop() {
        match current.node {
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push(current.child(child, Step::Index(index)));
                }
            }
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    stack.push(current.child(child, Step::Key(key.clone())));
                }
            }
            _ => {}
        }
        out.push(current);
    }
}

/// Walks `steps` down from `root`, failing softly when the tree no
/// longer has the recorded shape.
pub(crate) fn resolve_mut<'a>(root: &'a mut Value, steps: &[Step]) -> Option<&'a mut Value> {
    let mut node = root;
    for step in steps {
        node = match (step, node) {
            (Step::Key(key), Value::Object(map)) => map.get_mut(key)?,
            (Step::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Removes the slot named by the last step. The root (no steps) is
/// never removed.
pub(crate) fn remove_at(root: &mut Value, steps: &[Step]) -> bool {
    let Some((last, parents)) = steps.split_last() else {
        return false;
    };
    let Some(parent) = resolve_mut(root, parents) else {
        return false;
    };
    match (last, parent) {
        (Step::Index(index), Value::Array(items)) => {
            if *index < items.len() {
                items.remove(*index);
                true
            } else {
                false
            }
        }
        (Step::Key(key), Value::Object(map)) => map.remove(key).is_some(),
        _ => false,
    }
}

/// Reverse document order: descending indices within a parent, and
/// descendants ahead of their ancestors, so removals never disturb
/// locations still pending.
pub(crate) fn deletion_order(a: &[Step], b: &[Step]) -> Ordering {
    document_order(b, a)
}

fn document_order(a: &[Step], b: &[Step]) -> Ordering {
    for (sa, sb) in a.iter().zip(b.iter()) {
        let step = match (sa, sb) {
            (Step::Index(x), Step::Index(y)) => x.cmp(y),
            (Step::Key(x), Step::Key(y)) => x.cmp(y),
            (Step::Index(_), Step::Key(_)) => Ordering::Less,
            (Step::Key(_), Step::Index(_)) => Ordering::Greater,
        };
        if step != Ordering::Equal {
            return step;
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::{deletion_order, remove_at, resolve_mut, Step};
    use jsondoc::{parse, Value};

    #[test]
    fn resolve_walks_keys_and_indices() {
        let (_, mut doc) = parse(r#"{"a":[10,{"b":true}]}"#);
        let steps = [Step::Key("a".into()), Step::Index(1), Step::Key("b".into())];
        assert_eq!(
            resolve_mut(&mut doc, &steps),
            Some(&mut Value::Bool(true))
        );
        let missing = [Step::Key("a".into()), Step::Index(9)];
        assert_eq!(resolve_mut(&mut doc, &missing), None);
    }

    #[test]
    fn remove_ignores_root_and_stale_paths() {
        let (_, mut doc) = parse(r#"{"a":[1,2,3]}"#);
        assert!(!remove_at(&mut doc, &[]));
        assert!(remove_at(&mut doc, &[Step::Key("a".into()), Step::Index(2)]));
        assert!(!remove_at(&mut doc, &[Step::Key("a".into()), Step::Index(2)]));
        assert_eq!(doc.to_string(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn deletion_order_is_reverse_document_order() {
        let mut locations = vec![
            vec![Step::Index(1)],
            vec![Step::Index(3)],
            vec![Step::Index(1), Step::Key("x".into())],
        ];
        locations.sort_by(|a, b| deletion_order(a, b));
        assert_eq!(
            locations,
            vec![
                vec![Step::Index(3)],
                vec![Step::Index(1), Step::Key("x".into())],
                vec![Step::Index(1)],
            ]
        );
    }
}
