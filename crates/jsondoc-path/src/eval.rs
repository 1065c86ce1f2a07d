//! Read-only evaluation of compiled paths.
//!
//! Each segment transforms a working set of node references; the result
//! order is determined entirely by the plan and the canonical iteration
//! order of containers (array order, sorted object keys).

use jsondoc::Value;

use crate::ast::{Segment, SegmentKind, Slice, UnionEntry};
use crate::error::EvalError;
use crate::filter;

pub(crate) fn evaluate<'a>(
    start: &'a Value,
    root: &'a Value,
    segments: &[Segment],
) -> Result<Vec<&'a Value>, EvalError> {
    let mut current = vec![start];
    let mut descendants: Vec<&Value> = Vec::new();
    for segment in segments {
        let base: &[&Value] = if segment.recursive {
            descendants.clear();
            for &node in &current {
                collect_descendants(node, &mut descendants);
            }
            &descendants
        } else {
            &current
        };
        let mut next = Vec::new();
        for &node in base {
            match &segment.kind {
                SegmentKind::Name(name) => {
                    if let Value::Object(map) = node {
                        if let Some(member) = map.get(name) {
                            next.push(member);
                        }
                    }
                }
                SegmentKind::Wildcard => push_children(node, &mut next),
                SegmentKind::Indices(indices) => {
                    if let Value::Array(items) = node {
                        next.reserve(indices.len());
                        for &raw in indices {
                            if let Some(index) = normalize_index(raw, items.len()) {
                                next.push(&items[index]);
                            }
                        }
                    }
                }
                SegmentKind::Slice(slice) => apply_slice(node, slice, &mut next)?,
                SegmentKind::Union(entries) => {
                    for entry in entries {
                        apply_union_entry(node, entry, &mut next)?;
                    }
                }
                SegmentKind::Filter(predicate) => {
                    for child in children(node) {
                        if filter::evaluate(predicate, root, child)? {
                            next.push(child);
                        }
                    }
                }
            }
        }
        current = next;
    }
    Ok(current)
}

/// Pre-order traversal including the node itself.
pub(crate) fn collect_descendants<'a>(node: &'a Value, out: &mut Vec<&'a Value>) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        out.push(current);
        match current {
            Value::Array(items) => {
                stack.reserve(items.len());
                for item in items.iter().rev() {
                    stack.push(item);
                }
            }
            Value::Object(map) => {
                stack.reserve(map.len());
                for member in map.values().rev() {
                    stack.push(member);
                }
            }
            _ => {}
        }
    }
}

fn children<'a>(node: &'a Value) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
    match node {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn push_children<'a>(node: &'a Value, out: &mut Vec<&'a Value>) {
    match node {
        Value::Array(items) => out.extend(items.iter()),
        Value::Object(map) => out.extend(map.values()),
        _ => {}
    }
}

/// Negative indices count from the end; out-of-range drops the entry.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let normalized = if index < 0 { index + len } else { index };
    if (0..len).contains(&normalized) {
        usize::try_from(normalized).ok()
    } else {
        None
    }
}

/// The array positions a slice selects, in selection order. Empty arrays
/// select nothing before the step is even examined.
pub(crate) fn slice_positions(slice: &Slice, len: usize) -> Result<Vec<usize>, EvalError> {
    if len == 0 {
        return Ok(Vec::new());
    }
    let len = len as i64;
    let step = slice.step.unwrap_or(1);
    if step == 0 {
        return Err(EvalError::SliceStepZero);
    }
    let mut out = Vec::new();
    if step > 0 {
        let mut start = slice.start.unwrap_or(0);
        let mut end = slice.end.unwrap_or(len);
        if start < 0 {
            start += len;
        }
        if end < 0 {
            end += len;
        }
        start = start.clamp(0, len);
        end = end.clamp(0, len);
        if start < end {
            out.reserve(((end - start + step - 1) / step) as usize);
        }
        let mut i = start;
        while i < end {
            out.push(i as usize);
            i += step;
        }
    } else {
        // wraparound applies to explicit negative bounds only; the
        // default end is the before-first sentinel
        let mut start = slice
            .start
            .map_or(len - 1, |s| if s < 0 { s + len } else { s });
        let mut end = slice.end.map_or(-1, |e| if e < 0 { e + len } else { e });
        start = start.clamp(-1, len - 1);
        end = end.clamp(-1, len - 1);
        if start > end {
            out.reserve(((start - end - step - 1) / -step) as usize);
        }
        let mut i = start;
        while i > end {
            out.push(i as usize);
            i += step;
        }
    }
    Ok(out)
}

fn apply_slice<'a>(
    node: &'a Value,
    slice: &Slice,
    out: &mut Vec<&'a Value>,
) -> Result<(), EvalError> {
    if let Value::Array(items) = node {
        for index in slice_positions(slice, items.len())? {
            out.push(&items[index]);
        }
    }
    Ok(())
}

fn apply_union_entry<'a>(
    node: &'a Value,
    entry: &UnionEntry,
    out: &mut Vec<&'a Value>,
) -> Result<(), EvalError> {
    match entry {
        UnionEntry::Name(name) => {
            if let Value::Object(map) = node {
                if let Some(member) = map.get(name) {
                    out.push(member);
                }
            }
        }
        UnionEntry::Index(index) => {
            if let Value::Array(items) = node {
                if let Some(index) = normalize_index(*index, items.len()) {
                    out.push(&items[index]);
                }
            }
        }
        UnionEntry::Slice(slice) => apply_slice(node, slice, out)?,
        UnionEntry::Wildcard => push_children(node, out),
    }
    Ok(())
}
