use super::Visit;
use hcl::{
    template::{Directive, Element},
    Expression, ObjectKey, Operation, Template, Traversal, TraversalOperator,
};

/// Recursively visit all [hcl::Traversal]s
///
/// A bare variable is visited as a traversal without operators. Names bound by `for` expressions and
/// `for` template directives are not visited inside their scope.
pub trait VisitTraversals {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>);
}

/// Drops traversals rooted at locally bound names before passing the rest on
pub struct Shadowed<'v> {
    names: Vec<String>,
    inner: &'v mut dyn Visit<Traversal>,
}

impl<'v> Shadowed<'v> {
    pub fn new(names: Vec<String>, inner: &'v mut dyn Visit<Traversal>) -> Self {
        Self { names, inner }
    }

    fn for_vars(
        key_var: Option<&hcl::Identifier>,
        value_var: &hcl::Identifier,
        inner: &'v mut dyn Visit<Traversal>,
    ) -> Self {
        let names = key_var
            .into_iter()
            .chain(Some(value_var))
            .map(|ident| ident.as_str().to_string())
            .collect();
        Self::new(names, inner)
    }
}

impl Visit<Traversal> for Shadowed<'_> {
    fn visit(&mut self, traversal: &Traversal) {
        if let Expression::Variable(root) = &traversal.expr {
            if self.names.iter().any(|name| name == root.as_str()) {
                tracing::trace!(name = root.as_str(), "skipping locally bound name");
                return;
            }
        }
        self.inner.visit(traversal)
    }
}

impl VisitTraversals for Expression {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>) {
        match self {
            Expression::Variable(variable) => {
                let traversal = Traversal::new(
                    Expression::Variable(variable.clone()),
                    Vec::<TraversalOperator>::new(),
                );
                visitor.visit(&traversal);
            }
            Expression::Traversal(traversal) => {
                match &traversal.expr {
                    Expression::Variable(_) => visitor.visit(traversal),
                    // e.g. `func(x).attr`, the reference is inside the expression
                    other => other.visit_traversals(visitor),
                }
                for operator in &traversal.operators {
                    if let TraversalOperator::Index(index) = operator {
                        index.visit_traversals(visitor);
                    }
                }
            }
            Expression::Array(array) => {
                for expr in array {
                    expr.visit_traversals(visitor);
                }
            }
            Expression::Object(object) => {
                for (key, value) in object.iter() {
                    if let ObjectKey::Expression(key) = key {
                        key.visit_traversals(visitor);
                    }
                    value.visit_traversals(visitor);
                }
            }
            Expression::TemplateExpr(template_expr) => match Template::from_expr(template_expr) {
                Ok(template) => template.visit_traversals(visitor),
                Err(err) => tracing::trace!(%err, "unable to parse template"),
            },
            Expression::FuncCall(func_call) => {
                for arg in &func_call.args {
                    arg.visit_traversals(visitor);
                }
            }
            Expression::Parenthesis(expr) => {
                expr.visit_traversals(visitor);
            }
            Expression::Conditional(cond) => {
                cond.cond_expr.visit_traversals(visitor);
                cond.true_expr.visit_traversals(visitor);
                cond.false_expr.visit_traversals(visitor);
            }
            Expression::Operation(operation) => match operation.as_ref() {
                Operation::Binary(binop) => {
                    binop.lhs_expr.visit_traversals(visitor);
                    binop.rhs_expr.visit_traversals(visitor);
                }
                Operation::Unary(unop) => {
                    unop.expr.visit_traversals(visitor);
                }
            },
            Expression::ForExpr(forexpr) => {
                forexpr.collection_expr.visit_traversals(visitor);

                let mut scoped =
                    Shadowed::for_vars(forexpr.key_var.as_ref(), &forexpr.value_var, visitor);
                if let Some(key_expr) = &forexpr.key_expr {
                    key_expr.visit_traversals(&mut scoped);
                }
                forexpr.value_expr.visit_traversals(&mut scoped);
                if let Some(cond_expr) = &forexpr.cond_expr {
                    cond_expr.visit_traversals(&mut scoped);
                }
            }
            _ => {}
        }
    }
}

impl VisitTraversals for Template {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>) {
        for element in self.elements() {
            match element {
                Element::Interpolation(interpolation) => {
                    interpolation.expr.visit_traversals(visitor);
                }
                Element::Directive(directive) => match directive {
                    Directive::If(ifdir) => {
                        ifdir.cond_expr.visit_traversals(visitor);
                        ifdir.true_template.visit_traversals(visitor);
                        if let Some(false_template) = &ifdir.false_template {
                            false_template.visit_traversals(visitor);
                        }
                    }
                    Directive::For(fordir) => {
                        fordir.collection_expr.visit_traversals(visitor);

                        let mut scoped =
                            Shadowed::for_vars(fordir.key_var.as_ref(), &fordir.value_var, visitor);
                        fordir.template.visit_traversals(&mut scoped);
                    }
                },
                Element::Literal(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(traversal: &Traversal) -> String {
        let Expression::Variable(root) = &traversal.expr else {
            return "<expr>".into();
        };
        let mut out = root.as_str().to_string();
        for operator in &traversal.operators {
            match operator {
                TraversalOperator::GetAttr(ident) => {
                    out.push('.');
                    out.push_str(ident.as_str());
                }
                _ => out.push_str("[]"),
            }
        }
        out
    }

    fn roots(text: &str) -> Vec<String> {
        let expr: hcl_edit::expr::Expression = text.parse().expect("valid expression");
        let mut found = vec![];
        Expression::from(expr).visit_traversals(&mut |traversal: &Traversal| {
            found.push(render(traversal));
        });
        found
    }

    #[test]
    fn nested_expressions() {
        assert_eq!(
            roots(r#"{ a = [local.a, upper(var.b)], (local.k) = x ? y.z : 1 }"#),
            vec!["local.a", "var.b", "local.k", "x", "y.z"]
        );
    }

    #[test]
    fn index_expressions_are_visited() {
        assert_eq!(
            roots("test_thing.x[local.k].id"),
            vec!["test_thing.x[].id", "local.k"]
        );
    }

    #[test]
    fn for_expression_scope() {
        assert_eq!(
            roots("{ for k, v in local.m : k => v.id if v.enabled && var.on }"),
            vec!["local.m", "var.on"]
        );
    }

    #[test]
    fn template_directives() {
        assert_eq!(
            roots(r#""%{ for s in var.list }${s}-${local.sep}%{ endfor }%{ if var.x }y%{ endif }""#),
            vec!["var.list", "local.sep", "var.x"]
        );
    }
}
