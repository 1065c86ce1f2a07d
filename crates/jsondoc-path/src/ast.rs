//! Compiled representation of path expressions.

use jsondoc::Value;

/// A parsed, reusable path expression.
///
/// Compilation is the expensive half of a query; a `CompiledPath` can be
/// evaluated against any number of documents. Instances are normally
/// obtained through the per-thread cache (see [`crate::compile`]) and
/// shared by reference count.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    /// `@`-rooted expressions evaluate against the current node; they
    /// are only legal inside filters.
    pub(crate) relative: bool,
    pub(crate) segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub(crate) kind: SegmentKind,
    /// `..`: apply to every descendant of the working set, not just
    /// immediate children.
    pub(crate) recursive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SegmentKind {
    /// `.name` or `['name']`.
    Name(String),
    /// `*` or `[*]`.
    Wildcard,
    /// `[i]` and friends; negative indices count from the end.
    Indices(Vec<i64>),
    /// `[start:end:step]`, Python-style.
    Slice(Slice),
    /// `[a,1,2:4,*]`: entries applied left to right, duplicates kept.
    Union(Vec<UnionEntry>),
    /// `[?(expr)]`.
    Filter(FilterNode),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Slice {
    pub(crate) start: Option<i64>,
    pub(crate) end: Option<i64>,
    pub(crate) step: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UnionEntry {
    Name(String),
    Index(i64),
    Slice(Slice),
    Wildcard,
}

/// Boolean expression tree for `[?(...)]` filters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FilterNode {
    Or(Box<FilterNode>, Box<FilterNode>),
    And(Box<FilterNode>, Box<FilterNode>),
    Not(Box<FilterNode>),
    Comparison {
        op: CompareOp,
        lhs: FilterOperand,
        rhs: FilterOperand,
    },
    /// A bare operand used as a truthiness test.
    Exists(FilterOperand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `=~`, regular expression search.
    Matches,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FilterOperand {
    Literal(Value),
    /// A sub-path evaluated against the document root (`$`) or the
    /// filter's current node (`@`).
    Path(CompiledPath),
    Function(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FunctionCall {
    pub(crate) name: Function,
    pub(crate) args: Vec<FilterOperand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    /// `length(x)` / `size(x)`.
    Length,
    /// `count(x)`.
    Count,
}
