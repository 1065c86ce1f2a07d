//! # jsondoc-path
//!
//! JSONPath querying and in-place mutation over [`jsondoc::Value`]
//! documents.
//!
//! Expressions compile into reusable plans, cached per thread, and
//! evaluate to node lists in a deterministic order:
//!
//! ```
//! use jsondoc::parse;
//! use jsondoc_path::jsonpath;
//!
//! let (_, doc) = parse(r#"{"store":{"book":[
//!     {"title":"Sayings of the Century","price":8.95},
//!     {"title":"Sword of Honour","price":12.99}
//! ]}}"#);
//! let cheap = jsonpath(&doc, "$.store.book[?(@.price < 10)].title").unwrap();
//! assert_eq!(cheap.len(), 1);
//! assert_eq!(cheap[0].as_str(), Some("Sayings of the Century"));
//! ```
//!
//! The dialect follows the classic Goessner form: dot and bracket child
//! access, `..` recursive descent, wildcards, negative indices,
//! Python-style slices, unions with bare-identifier entries, and
//! `?(...)` filters with `==, !=, <, <=, >, >=, =~`, boolean operators,
//! and the `length`/`size`/`count` functions.
//!
//! [`update_jsonpath`] overwrites every selected node and
//! [`delete_jsonpath`] removes every selected slot; both reject
//! `@`-rooted expressions, which only make sense inside filters.

mod ast;
mod cache;
mod error;
mod eval;
mod filter;
mod locate;
mod parser;

use std::rc::Rc;

use jsondoc::Value;

pub use ast::CompiledPath;
pub use error::{Error, EvalError, ParseError};

use locate::UnionSlices;

/// Compiles an expression, reusing this thread's cached plan when
/// available. Repeated calls with a cached expression return the same
/// shared allocation.
pub fn compile(expression: &str) -> Result<Rc<CompiledPath>, ParseError> {
    cache::compiled(expression)
}

/// Evaluates `expression` against `root`, returning references to every
/// selected node in document order.
pub fn jsonpath<'a>(root: &'a Value, expression: &str) -> Result<Vec<&'a Value>, Error> {
    let plan = cache::compiled(expression)?;
    if plan.relative {
        return Err(EvalError::RelativeRoot.into());
    }
    eval::evaluate(root, root, &plan.segments).map_err(Error::from)
}

/// Overwrites every node selected by `expression` with `new_value`,
/// returning how many nodes changed. The value is moved into the last
/// target and cloned for the rest.
pub fn update_jsonpath(
    root: &mut Value,
    expression: &str,
    new_value: Value,
) -> Result<usize, Error> {
    let plan = cache::compiled(expression)?;
    if plan.relative {
        return Err(EvalError::RelativeRoot.into());
    }
    let locations: Vec<Vec<locate::Step>> =
        locate::evaluate(root, &plan.segments, UnionSlices::Honor)?
            .into_iter()
            .map(|located| located.steps)
            .collect();
    let mut replacement = Some(new_value);
    let mut count = 0;
    let total = locations.len();
    for (i, steps) in locations.iter().enumerate() {
        let Some(slot) = locate::resolve_mut(root, steps) else {
            continue;
        };
        let Some(value) = replacement.take() else {
            break;
        };
        if i + 1 < total {
            replacement = Some(value.clone());
        }
        *slot = value;
        count += 1;
    }
    Ok(count)
}

/// Removes every slot selected by `expression`, returning how many were
/// removed. Selections of the root itself are ignored.
pub fn delete_jsonpath(root: &mut Value, expression: &str) -> Result<usize, Error> {
    let plan = cache::compiled(expression)?;
    if plan.relative {
        return Err(EvalError::RelativeRoot.into());
    }
    let mut locations: Vec<Vec<locate::Step>> =
        locate::evaluate(root, &plan.segments, UnionSlices::Skip)?
            .into_iter()
            .map(|located| located.steps)
            .collect();
    locations.sort_by(|a, b| locate::deletion_order(a, b));
    let mut count = 0;
    for steps in &locations {
        if locate::remove_at(root, steps) {
            count += 1;
        }
    }
    Ok(count)
}

/// Method-call sugar for the free functions.
pub trait JsonPathExt {
    fn jsonpath(&self, expression: &str) -> Result<Vec<&Value>, Error>;
    fn update_jsonpath(&mut self, expression: &str, new_value: Value) -> Result<usize, Error>;
    fn delete_jsonpath(&mut self, expression: &str) -> Result<usize, Error>;
}

impl JsonPathExt for Value {
    fn jsonpath(&self, expression: &str) -> Result<Vec<&Value>, Error> {
        jsonpath(self, expression)
    }

    fn update_jsonpath(&mut self, expression: &str, new_value: Value) -> Result<usize, Error> {
        update_jsonpath(self, expression, new_value)
    }

    fn delete_jsonpath(&mut self, expression: &str) -> Result<usize, Error> {
        delete_jsonpath(self, expression)
    }
}
