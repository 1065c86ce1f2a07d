//! Evaluation of `[?(...)]` predicate trees against candidate nodes.
//!
//! Path operands produce node sets; comparisons are set-wise, true when
//! any pair satisfies the operator. Numeric comparison across the three
//! widths is exact rather than via lossy widening, so a large `i64`
//! never spuriously equals a nearby double.

use jsondoc::Value;
use num_cmp::NumCmp;

use crate::ast::{CompareOp, CompiledPath, FilterNode, FilterOperand, Function, FunctionCall};
use crate::error::EvalError;
use crate::eval;

pub(crate) fn evaluate(
    node: &FilterNode,
    root: &Value,
    context: &Value,
) -> Result<bool, EvalError> {
    match node {
        FilterNode::Or(lhs, rhs) => {
            Ok(evaluate(lhs, root, context)? || evaluate(rhs, root, context)?)
        }
        FilterNode::And(lhs, rhs) => {
            Ok(evaluate(lhs, root, context)? && evaluate(rhs, root, context)?)
        }
        FilterNode::Not(inner) => Ok(!evaluate(inner, root, context)?),
        FilterNode::Comparison { op, lhs, rhs } => {
            let lhs = evaluate_operand(lhs, root, context)?;
            let rhs = evaluate_operand(rhs, root, context)?;
            compare(*op, &lhs, &rhs)
        }
        FilterNode::Exists(operand) => {
            let operand = evaluate_operand(operand, root, context)?;
            let result = operand.nodes().any(truthy);
            Ok(result)
        }
    }
}

/// An evaluated operand: borrowed nodes for paths, one owned value for
/// literals and function results.
enum Operand<'a> {
    Owned(Value),
    Nodes(Vec<&'a Value>),
}

impl<'a> Operand<'a> {
    fn nodes(&self) -> impl Iterator<Item = &Value> {
        let (single, many): (Option<&Value>, &[&Value]) = match self {
            Operand::Owned(value) => (Some(value), &[]),
            Operand::Nodes(nodes) => (None, nodes),
        };
        single.into_iter().chain(many.iter().copied())
    }

    fn is_empty(&self) -> bool {
        matches!(self, Operand::Nodes(nodes) if nodes.is_empty())
    }

    fn first(&self) -> Option<&Value> {
        self.nodes().next()
    }
}

fn evaluate_operand<'a>(
    operand: &'a FilterOperand,
    root: &'a Value,
    context: &'a Value,
) -> Result<Operand<'a>, EvalError> {
    match operand {
        FilterOperand::Literal(value) => Ok(Operand::Owned(value.clone())),
        FilterOperand::Path(path) => Ok(Operand::Nodes(evaluate_path(path, root, context)?)),
        FilterOperand::Function(call) => {
            Ok(Operand::Owned(evaluate_function(call, root, context)?))
        }
    }
}

fn evaluate_path<'a>(
    path: &CompiledPath,
    root: &'a Value,
    context: &'a Value,
) -> Result<Vec<&'a Value>, EvalError> {
    let start = if path.relative { context } else { root };
    eval::evaluate(start, root, &path.segments)
}

fn evaluate_function(
    call: &FunctionCall,
    root: &Value,
    context: &Value,
) -> Result<Value, EvalError> {
    if call.args.len() != 1 {
        return Err(EvalError::FunctionArity);
    }
    let arg = evaluate_operand(&call.args[0], root, context)?;
    let Some(target) = arg.first() else {
        return Ok(Value::Long(0));
    };
    Ok(match call.name {
        Function::Length => Value::Long(length_of(target)),
        Function::Count => match target {
            Value::Array(items) => Value::Long(items.len() as i64),
            Value::Object(map) => Value::Long(map.len() as i64),
            _ => Value::Long(1),
        },
    })
}

/// Byte length for strings, element count for containers, 0 otherwise.
fn length_of(value: &Value) -> i64 {
    match value {
        Value::String(s) => s.len() as i64,
        Value::Array(items) => items.len() as i64,
        Value::Object(map) => map.len() as i64,
        _ => 0,
    }
}

fn compare(op: CompareOp, lhs: &Operand, rhs: &Operand) -> Result<bool, EvalError> {
    Ok(match op {
        CompareOp::Eq => equals_any(lhs, rhs),
        CompareOp::Ne => not_equals(lhs, rhs),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => relational(op, lhs, rhs),
        CompareOp::Matches => return regex_match(lhs, rhs),
    })
}

fn equals_any(lhs: &Operand, rhs: &Operand) -> bool {
    lhs.nodes()
        .any(|l| rhs.nodes().any(|r| json_equals(l, r)))
}

/// True when some left node equals none of the right nodes. An empty
/// left side is never unequal; an empty right side always is.
fn not_equals(lhs: &Operand, rhs: &Operand) -> bool {
    if lhs.is_empty() {
        return false;
    }
    if rhs.is_empty() {
        return true;
    }
    lhs.nodes()
        .any(|l| !rhs.nodes().any(|r| json_equals(l, r)))
}

fn relational(op: CompareOp, lhs: &Operand, rhs: &Operand) -> bool {
    for l in lhs.nodes() {
        for r in rhs.nodes() {
            if let (Some(a), Some(b)) = (to_number(l), to_number(r)) {
                if number_compare(op, a, b) {
                    return true;
                }
            }
            if let (Value::String(a), Value::String(b)) = (l, r) {
                if string_compare(op, a, b) {
                    return true;
                }
            }
        }
    }
    false
}

fn regex_match(lhs: &Operand, rhs: &Operand) -> Result<bool, EvalError> {
    let Some(pattern) = rhs.first().and_then(Value::as_str) else {
        return Ok(false);
    };
    let regex = fancy_regex::Regex::new(pattern).map_err(|_| EvalError::InvalidRegex)?;
    for l in lhs.nodes() {
        if let Some(text) = l.as_str() {
            if regex.is_match(text).map_err(|_| EvalError::InvalidRegex)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Long(x) => *x != 0,
        Value::Float(x) => *x != 0.0,
        Value::Double(x) => *x != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Structural equality with numeric widths compared by value. Booleans
/// are not numbers here.
pub(crate) fn json_equals(lhs: &Value, rhs: &Value) -> bool {
    if let Some(result) = number_equals(lhs, rhs) {
        return result;
    }
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|((ka, va), (kb, vb))| ka == kb && json_equals(va, vb))
        }
        _ => false,
    }
}

fn number_equals(lhs: &Value, rhs: &Value) -> Option<bool> {
    use Value::{Double, Float, Long};
    Some(match (lhs, rhs) {
        (Long(a), Long(b)) => a == b,
        (Long(a), Float(b)) => a.num_eq(*b),
        (Long(a), Double(b)) => a.num_eq(*b),
        (Float(a), Long(b)) => a.num_eq(*b),
        (Float(a), Float(b)) => a == b,
        (Float(a), Double(b)) => a.num_eq(*b),
        (Double(a), Long(b)) => a.num_eq(*b),
        (Double(a), Float(b)) => a.num_eq(*b),
        (Double(a), Double(b)) => a == b,
        _ => return None,
    })
}

/// Relational coercion: the three numeric widths, plus booleans as 0/1.
#[derive(Clone, Copy)]
enum Number {
    I(i64),
    F32(f32),
    F64(f64),
}

fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Long(x) => Some(Number::I(*x)),
        Value::Float(x) => Some(Number::F32(*x)),
        Value::Double(x) => Some(Number::F64(*x)),
        Value::Bool(b) => Some(Number::I(i64::from(*b))),
        _ => None,
    }
}

fn number_compare(op: CompareOp, lhs: Number, rhs: Number) -> bool {
    use Number::{F32, F64, I};
    match (lhs, rhs) {
        (I(a), I(b)) => ordered(op, a, b),
        (I(a), F32(b)) => ordered(op, a, b),
        (I(a), F64(b)) => ordered(op, a, b),
        (F32(a), I(b)) => ordered(op, a, b),
        (F32(a), F32(b)) => ordered(op, a, b),
        (F32(a), F64(b)) => ordered(op, a, b),
        (F64(a), I(b)) => ordered(op, a, b),
        (F64(a), F32(b)) => ordered(op, a, b),
        (F64(a), F64(b)) => ordered(op, a, b),
    }
}

fn ordered<A: NumCmp<B>, B: Copy>(op: CompareOp, a: A, b: B) -> bool {
    match op {
        CompareOp::Lt => a.num_lt(b),
        CompareOp::Le => a.num_le(b),
        CompareOp::Gt => a.num_gt(b),
        CompareOp::Ge => a.num_ge(b),
        _ => false,
    }
}

fn string_compare(op: CompareOp, a: &str, b: &str) -> bool {
    match op {
        CompareOp::Lt => a < b,
        CompareOp::Le => a <= b,
        CompareOp::Gt => a > b,
        CompareOp::Ge => a >= b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{json_equals, truthy};
    use jsondoc::{parse, Value};

    #[test]
    fn truthiness() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&Value::Bool(false)));
        assert!(!truthy(&Value::Long(0)));
        assert!(!truthy(&Value::Double(0.0)));
        assert!(!truthy(&Value::from("")));
        assert!(!truthy(&parse("[]").1));
        assert!(!truthy(&parse("{}").1));
        assert!(truthy(&Value::Long(-3)));
        assert!(truthy(&Value::from("x")));
        assert!(truthy(&parse("[0]").1));
    }

    #[test]
    fn numeric_equality_crosses_widths() {
        assert!(json_equals(&Value::Long(1), &Value::Double(1.0)));
        assert!(json_equals(&Value::Float(0.5), &Value::Double(0.5)));
        assert!(!json_equals(&Value::Long(1), &Value::Double(1.5)));
        // 2^60 + 1 is not representable as f64
        let big = (1i64 << 60) + 1;
        assert!(!json_equals(&Value::Long(big), &Value::Double((1i64 << 60) as f64)));
    }

    #[test]
    fn booleans_are_not_numbers_for_equality() {
        assert!(!json_equals(&Value::Bool(true), &Value::Long(1)));
        assert!(json_equals(&Value::Bool(true), &Value::Bool(true)));
    }

    #[test]
    fn structural_equality_recurses() {
        let (_, a) = parse(r#"{"x":[1,2.0,{"y":null}]}"#);
        let (_, b) = parse(r#"{"x":[1.0,2,{"y":null}]}"#);
        assert!(json_equals(&a, &b));
        let (_, c) = parse(r#"{"x":[1,2,{"y":0}]}"#);
        assert!(!json_equals(&a, &c));
    }
}
