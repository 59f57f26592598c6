//! Attribute path narrowing
//!
//! Follows the remainder of a reference into the syntax of a declaration, as far as the syntax allows.
//! When a step matches nothing the references of the deepest element that did match are returned.
use crate::addrs::{InstanceKey, Reference, TraversalStep};
use crate::configs::find_attribute;
use crate::lang::{dynamic_iterator, is_dynamic, Extractor};
use hcl_edit::expr::{Expression, Object, ObjectKey};
use hcl_edit::structure::{Block, Body};

/// References within `expr` reachable by `path`
pub(crate) fn expr_references(
    extractor: &Extractor<'_>,
    expr: &Expression,
    path: &[TraversalStep],
    out: &mut Vec<Reference>,
) {
    let Some((head, rest)) = path.split_first() else {
        extractor.expr(expr, out);
        return;
    };

    let inner = match expr {
        Expression::Object(object) => head.as_name().and_then(|name| object_value(object, name)),
        Expression::Array(array) => match head {
            TraversalStep::Index(InstanceKey::Int(index)) => usize::try_from(*index)
                .ok()
                .and_then(|index| array.iter().nth(index)),
            _ => None,
        },
        _ => None,
    };

    match inner {
        Some(inner) => expr_references(extractor, inner, rest, out),
        None => {
            tracing::trace!(step=%head, "expression does not narrow further");
            extractor.expr(expr, out)
        }
    }
}

/// References within `body` reachable by `path`, ignoring attributes and blocks named in `excluded`
pub(crate) fn body_references(
    extractor: &Extractor<'_>,
    body: &Body,
    path: &[TraversalStep],
    excluded: &[&str],
    out: &mut Vec<Reference>,
) {
    let Some((head, rest)) = path.split_first() else {
        extractor.body(body, excluded, out);
        return;
    };

    let Some(name) = head.as_name().filter(|name| !excluded.contains(name)) else {
        tracing::trace!(step=%head, "body does not narrow further");
        extractor.body(body, excluded, out);
        return;
    };

    if let Some(expr) = find_attribute(body, name) {
        expr_references(extractor, expr, rest, out);
        return;
    }

    let blocks: Vec<&Block> = body
        .blocks()
        .filter(|block| block_type(block) == Some(name))
        .collect();
    if blocks.is_empty() {
        tracing::trace!(name, "no attribute or block");
        extractor.body(body, excluded, out);
        return;
    }

    let (blocks, rest) = select_blocks(blocks, rest);
    for block in blocks {
        block_references(extractor, block, rest, out);
    }
}

fn block_references(
    extractor: &Extractor<'_>,
    block: &Block,
    path: &[TraversalStep],
    out: &mut Vec<Reference>,
) {
    if !is_dynamic(block) {
        body_references(extractor, &block.body, path, &[], out);
        return;
    }

    if path.is_empty() {
        extractor.dynamic_block(block, out);
        return;
    }

    // the collection decides how many blocks exist, whatever part of them is read
    if let Some(for_each) = find_attribute(&block.body, "for_each") {
        extractor.expr(for_each, out);
    }

    let inner = extractor.binding(dynamic_iterator(block));
    for content in block
        .body
        .blocks()
        .filter(|content| content.ident.value().as_str() == "content")
    {
        body_references(&inner, &content.body, path, &[], out);
    }
}

/// Type of the blocks `block` produces: its identifier, or the label of a `dynamic` block
fn block_type(block: &Block) -> Option<&str> {
    if is_dynamic(block) {
        block.labels.first().map(|label| label.as_str())
    } else {
        Some(block.ident.value().as_str())
    }
}

/// Apply a label (`.label`, `["label"]`) or position (`[n]`) step to a list of nested blocks
fn select_blocks<'b, 'p>(
    blocks: Vec<&'b Block>,
    path: &'p [TraversalStep],
) -> (Vec<&'b Block>, &'p [TraversalStep]) {
    let Some((head, rest)) = path.split_first() else {
        return (blocks, path);
    };

    if let TraversalStep::Index(InstanceKey::Int(index)) = head {
        return match usize::try_from(*index).ok().and_then(|index| blocks.get(index)) {
            Some(block) => (vec![*block], rest),
            None => (blocks, &[]),
        };
    }

    if let Some(label) = head.as_name() {
        let labelled: Vec<&Block> = blocks
            .iter()
            .copied()
            .filter(|block| {
                !is_dynamic(block) && block.labels.first().map(|l| l.as_str()) == Some(label)
            })
            .collect();
        if !labelled.is_empty() {
            return (labelled, rest);
        }
    }

    (blocks, path)
}

fn object_value<'e>(object: &'e Object, name: &str) -> Option<&'e Expression> {
    object.iter().find_map(|(key, value)| {
        let key = match key {
            ObjectKey::Ident(ident) => ident.value().as_str(),
            ObjectKey::Expression(Expression::String(string)) => string.value().as_str(),
            _ => return None,
        };
        (key == name).then(|| value.expr())
    })
}
