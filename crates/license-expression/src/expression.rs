//! License expression trees.
//!
//! A [`LicenseExpression`] is a boolean tree of `AND`/`OR` nodes over
//! [`Symbol`] leaves. Trees are immutable values: [`LicenseExpression::simplify`]
//! returns a new, normalized tree.

use std::fmt;

use crate::error::{LicenseError, LicenseResult};
use crate::symbol::{LicenseSymbol, LicenseWithExceptionSymbol, Symbol};
use crate::template::Template;

/// Boolean operators joining license expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// Conjunction: every operand applies.
    And,
    /// Disjunction: a choice among operands.
    Or,
}

impl Operator {
    /// The separator used when rendering operands.
    pub fn separator(self) -> &'static str {
        match self {
            Operator::And => " AND ",
            Operator::Or => " OR ",
        }
    }

    /// The opposite operator.
    pub fn dual(self) -> Self {
        match self {
            Operator::And => Operator::Or,
            Operator::Or => Operator::And,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// A parsed license expression.
///
/// `And` and `Or` nodes built by the parser or the checked constructors
/// [`LicenseExpression::and`] and [`LicenseExpression::or`] always hold two
/// or more operands.
///
/// Ordering puts symbols first, then `AND` nodes, then `OR` nodes; operands
/// compare lexicographically. This is the order used by
/// [`LicenseExpression::simplify`].
///
/// # Example
///
/// ```rust
/// use license_expression::{LicenseExpression, LicenseSymbol};
///
/// let mit = LicenseExpression::from(LicenseSymbol::new("mit").unwrap());
/// let bsd = LicenseExpression::from(LicenseSymbol::new("bsd").unwrap());
///
/// let expr = LicenseExpression::or(vec![
///     mit.clone(),
///     LicenseExpression::and(vec![bsd.clone(), mit.clone()]).unwrap(),
/// ])
/// .unwrap();
///
/// assert_eq!(expr.to_string(), "mit OR (bsd AND mit)");
/// assert_eq!(expr.simplify(), mit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LicenseExpression {
    /// A single license, exception, or license-with-exception.
    Symbol(Symbol),
    /// All operands apply.
    And(Vec<LicenseExpression>),
    /// One of the operands applies.
    Or(Vec<LicenseExpression>),
}

impl LicenseExpression {
    /// Creates an `AND` node.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Arity`] with fewer than two operands.
    pub fn and(args: Vec<LicenseExpression>) -> LicenseResult<Self> {
        Self::operation(Operator::And, args)
    }

    /// Creates an `OR` node.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Arity`] with fewer than two operands.
    pub fn or(args: Vec<LicenseExpression>) -> LicenseResult<Self> {
        Self::operation(Operator::Or, args)
    }

    /// Creates an operator node.
    pub fn operation(operator: Operator, args: Vec<LicenseExpression>) -> LicenseResult<Self> {
        if args.len() < 2 {
            return Err(LicenseError::Arity {
                operator,
                found: args.len(),
            });
        }
        Ok(Self::node(operator, args))
    }

    fn node(operator: Operator, args: Vec<LicenseExpression>) -> Self {
        match operator {
            Operator::And => LicenseExpression::And(args),
            Operator::Or => LicenseExpression::Or(args),
        }
    }

    /// The operator of an `AND`/`OR` node; `None` for a symbol.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            LicenseExpression::Symbol(_) => None,
            LicenseExpression::And(_) => Some(Operator::And),
            LicenseExpression::Or(_) => Some(Operator::Or),
        }
    }

    /// The operands of an `AND`/`OR` node; empty for a symbol.
    pub fn args(&self) -> &[LicenseExpression] {
        match self {
            LicenseExpression::Symbol(_) => &[],
            LicenseExpression::And(args) | LicenseExpression::Or(args) => args,
        }
    }

    /// True for a symbol leaf.
    pub fn is_literal(&self) -> bool {
        matches!(self, LicenseExpression::Symbol(_))
    }

    /// The symbol of a leaf.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            LicenseExpression::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Every symbol leaf in depth-first, left-to-right order, duplicates kept.
    pub fn literals(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_literals(&mut out);
        out
    }

    fn collect_literals<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            LicenseExpression::Symbol(symbol) => out.push(symbol),
            LicenseExpression::And(args) | LicenseExpression::Or(args) => {
                for arg in args {
                    arg.collect_literals(out);
                }
            }
        }
    }

    /// Returns the normalized form of this expression.
    ///
    /// Nested operators of the same kind are flattened, duplicate operands
    /// removed, absorbed operands dropped (`A AND (A OR B)` is `A`), operands
    /// sorted, and single-operand nodes collapsed. The rewrite is repeated
    /// until nothing changes, so `simplify` is idempotent.
    pub fn simplify(&self) -> LicenseExpression {
        let mut current = self.simplify_once();
        loop {
            let next = current.simplify_once();
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn simplify_once(&self) -> LicenseExpression {
        let operator = match self.operator() {
            Some(operator) => operator,
            None => return self.clone(),
        };

        let mut args = Vec::with_capacity(self.args().len());
        for arg in self.args() {
            let arg = arg.simplify_once();
            if arg.operator() == Some(operator) {
                if let LicenseExpression::And(children) | LicenseExpression::Or(children) = arg {
                    args.extend(children);
                }
            } else {
                args.push(arg);
            }
        }

        args.sort();
        args.dedup();
        let mut args = absorb(operator, args);

        match args.len() {
            1 => args.remove(0),
            _ => Self::node(operator, args),
        }
    }

    /// True if `other` appears in this expression.
    ///
    /// An expression contains itself, anything one of its operands
    /// contains, and any node of the same operator whose operands are all
    /// operands of this node. A license-with-exception symbol contains its
    /// license and exception.
    ///
    /// No simplification is applied; see
    /// [`Licensing::contains`](crate::Licensing::contains).
    pub fn contains(&self, other: &LicenseExpression) -> bool {
        if self == other {
            return true;
        }
        match self {
            LicenseExpression::Symbol(mine) => match other {
                LicenseExpression::Symbol(theirs) => mine.contains(theirs),
                _ => false,
            },
            LicenseExpression::And(args) | LicenseExpression::Or(args) => {
                if args.iter().any(|arg| arg.contains(other)) {
                    return true;
                }
                other.operator() == self.operator()
                    && other.args().iter().all(|theirs| args.contains(theirs))
            }
        }
    }

    /// Renders this expression, substituting each symbol into `template`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use license_expression::Licensing;
    ///
    /// let licensing = Licensing::default();
    /// let expr = licensing.parse("mit or apache-2.0", Default::default()).unwrap().unwrap();
    /// assert_eq!(
    ///     expr.render("<{symbol.key}>").unwrap(),
    ///     "<mit> OR <apache-2.0>"
    /// );
    /// ```
    pub fn render(&self, template: &str) -> LicenseResult<String> {
        self.render_with(&Template::new(template)?)
    }

    /// Renders this expression with a parsed template.
    pub fn render_with(&self, template: &Template) -> LicenseResult<String> {
        self.render_inner(template, false)
    }

    /// Renders like [`render`](Self::render), also wrapping every
    /// license-with-exception in parentheses unless it is the whole
    /// expression.
    pub fn render_as_readable(&self, template: &str) -> LicenseResult<String> {
        self.render_as_readable_with(&Template::new(template)?)
    }

    /// Renders readably with a parsed template.
    pub fn render_as_readable_with(&self, template: &Template) -> LicenseResult<String> {
        let wrap = !matches!(self, LicenseExpression::Symbol(Symbol::WithException(_)));
        self.render_inner(template, wrap)
    }

    fn render_inner(&self, template: &Template, wrap_with_in_parens: bool) -> LicenseResult<String> {
        let (operator, args) = match self {
            LicenseExpression::Symbol(symbol) => {
                return symbol.render_with(template, wrap_with_in_parens)
            }
            LicenseExpression::And(args) => (Operator::And, args),
            LicenseExpression::Or(args) => (Operator::Or, args),
        };

        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            let text = arg.render_inner(template, wrap_with_in_parens)?;
            if arg.is_literal() {
                rendered.push(text);
            } else {
                rendered.push(format!("({})", text));
            }
        }

        if let [single] = rendered.as_slice() {
            return Ok(format!("{}{}", operator.separator(), single));
        }
        Ok(rendered.join(operator.separator()))
    }
}

/// Removes operands absorbed by another operand of the same node.
///
/// Inside `AND`, an `OR` operand is redundant when another operand is one of
/// its members or is an `OR` over a subset of its members. `OR` is the dual.
fn absorb(operator: Operator, args: Vec<LicenseExpression>) -> Vec<LicenseExpression> {
    let dual = operator.dual();
    let absorbed: Vec<bool> = args
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            if candidate.operator() != Some(dual) {
                return false;
            }
            let members = candidate.args();
            args.iter().enumerate().any(|(j, other)| {
                i != j
                    && (members.contains(other)
                        || (other.operator() == Some(dual)
                            && other.args().iter().all(|a| members.contains(a))))
            })
        })
        .collect();

    args.into_iter()
        .zip(absorbed)
        .filter_map(|(arg, absorbed)| (!absorbed).then_some(arg))
        .collect()
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (operator, args) = match self {
            LicenseExpression::Symbol(symbol) => return symbol.fmt(f),
            LicenseExpression::And(args) => (Operator::And, args),
            LicenseExpression::Or(args) => (Operator::Or, args),
        };
        if args.len() == 1 {
            f.write_str(operator.separator())?;
        }
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(operator.separator())?;
            }
            if arg.is_literal() {
                write!(f, "{}", arg)?;
            } else {
                write!(f, "({})", arg)?;
            }
        }
        Ok(())
    }
}

impl From<Symbol> for LicenseExpression {
    fn from(symbol: Symbol) -> Self {
        LicenseExpression::Symbol(symbol)
    }
}

impl From<LicenseSymbol> for LicenseExpression {
    fn from(symbol: LicenseSymbol) -> Self {
        LicenseExpression::Symbol(Symbol::License(symbol))
    }
}

impl From<LicenseWithExceptionSymbol> for LicenseExpression {
    fn from(symbol: LicenseWithExceptionSymbol) -> Self {
        LicenseExpression::Symbol(Symbol::WithException(symbol))
    }
}
