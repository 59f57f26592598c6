use crate::addrs::{Reference, SourceRange};
use crate::configs::{find_attribute, Source};
use crate::visit::{Shadowed, VisitTraversals};
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, Body, Structure};
use hcl_edit::Span;

/// All references in `expr`, in source order
pub fn references_in_expr(expr: &Expression, source: &Source) -> Vec<Reference> {
    let mut references = vec![];
    Extractor::new(source).expr(expr, &mut references);
    references
}

/// All references in `body` including nested blocks, in source order
pub fn references_in_body(body: &Body, source: &Source) -> Vec<Reference> {
    let mut references = vec![];
    Extractor::new(source).body(body, &[], &mut references);
    references
}

/// Collects references, knowing which names are bound locally (e.g. iterators of `dynamic` blocks)
#[derive(Debug, Clone)]
pub(crate) struct Extractor<'s> {
    source: &'s Source,
    bound: Vec<String>,
}

impl<'s> Extractor<'s> {
    pub(crate) fn new(source: &'s Source) -> Self {
        Self {
            source,
            bound: vec![],
        }
    }

    /// Same extractor with `name` bound in addition
    pub(crate) fn binding(&self, name: String) -> Self {
        let mut extractor = self.clone();
        extractor.bound.push(name);
        extractor
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub(crate) fn expr(&self, expr: &Expression, out: &mut Vec<Reference>) {
        let source_range = expr
            .span()
            .map(|span| SourceRange::new(self.source.clone(), span));

        let mut collect = |traversal: &hcl::Traversal| match Reference::from_traversal(traversal) {
            Ok(reference) => out.push(reference.with_source_range(source_range.clone())),
            Err(err) => tracing::trace!(%err, "skipping traversal"),
        };

        let expr = hcl::Expression::from(expr.clone());
        if self.bound.is_empty() {
            expr.visit_traversals(&mut collect);
        } else {
            expr.visit_traversals(&mut Shadowed::new(self.bound.clone(), &mut collect));
        }
    }

    /// References of all attributes and blocks in `body` not named in `excluded`
    pub(crate) fn body(&self, body: &Body, excluded: &[&str], out: &mut Vec<Reference>) {
        for structure in body.iter() {
            match structure {
                Structure::Attribute(attribute) => {
                    if excluded.contains(&attribute.key.value().as_str()) {
                        continue;
                    }
                    self.expr(&attribute.value, out);
                }
                Structure::Block(block) => {
                    if excluded.contains(&block.ident.value().as_str()) {
                        continue;
                    }
                    self.block(block, out);
                }
            }
        }
    }

    pub(crate) fn block(&self, block: &Block, out: &mut Vec<Reference>) {
        if is_dynamic(block) {
            self.dynamic_block(block, out);
        } else {
            self.body(&block.body, &[], out);
        }
    }

    /// References of a `dynamic` block
    ///
    /// `for_each` is evaluated outside the iterator's scope, everything else inside.
    pub(crate) fn dynamic_block(&self, block: &Block, out: &mut Vec<Reference>) {
        if let Some(for_each) = find_attribute(&block.body, "for_each") {
            self.expr(for_each, out);
        }

        let inner = self.binding(dynamic_iterator(block));
        for structure in block.body.iter() {
            match structure {
                Structure::Attribute(attribute) => {
                    if matches!(attribute.key.value().as_str(), "for_each" | "iterator") {
                        continue;
                    }
                    inner.expr(&attribute.value, out);
                }
                Structure::Block(content) if content.ident.value().as_str() == "content" => {
                    inner.body(&content.body, &[], out);
                }
                Structure::Block(other) => inner.block(other, out),
            }
        }
    }
}

/// `dynamic "name" { ... }`
pub(crate) fn is_dynamic(block: &Block) -> bool {
    block.ident.value().as_str() == "dynamic" && block.labels.len() == 1
}

/// Name of the temporary variable inside a `dynamic` block, defaults to the block's label
pub(crate) fn dynamic_iterator(block: &Block) -> String {
    let explicit = find_attribute(&block.body, "iterator").and_then(|expr| {
        match hcl::Expression::from(expr.clone()) {
            hcl::Expression::Variable(variable) => Some(variable.as_str().to_string()),
            _ => None,
        }
    });

    match explicit {
        Some(name) => name,
        None => block
            .labels
            .first()
            .map(|label| label.as_str().to_string())
            .unwrap_or_default(),
    }
}
