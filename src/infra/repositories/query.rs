//! Declarative filter and ordering trees compiled to sea-orm queries.
//!
//! Callers build a [`Conditional`] tree and a list of [`OrderBy`] clauses
//! against attribute names, with no I/O; [`RepositoryQuery`] compiles the
//! tree against a concrete entity's columns at fetch time. Compilation
//! failures (unknown attribute, wrong operand shape) are reported separately
//! from store failures.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, Order, QueryFilter, QueryOrder, Select,
    Value,
};
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

use super::base::StoreEntity;
use crate::errors::AppResult;

/// Comparison applied between an attribute and a literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Like,
}

/// One leaf comparison in a filter tree.
#[derive(Debug, Clone)]
pub struct Operation {
    pub attribute: String,
    pub operator: Operator,
    pub value: Value,
}

impl Operation {
    fn new(attribute: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::Eq, value)
    }

    pub fn ne(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::Ne, value)
    }

    pub fn gt(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::Gt, value)
    }

    pub fn gt_eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::GtEq, value)
    }

    pub fn lt(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::Lt, value)
    }

    pub fn lt_eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::LtEq, value)
    }

    /// Pattern match; the value must be textual, with `%` wildcards.
    pub fn like(attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(attribute, Operator::Like, pattern.into())
    }
}

/// Boolean filter tree. Leaves are [`Operation`]s; inner nodes conjoin or
/// disjoin their two subtrees.
#[derive(Debug, Clone)]
pub enum Conditional {
    And(Box<Conditional>, Box<Conditional>),
    Or(Box<Conditional>, Box<Conditional>),
    Op(Operation),
}

impl Conditional {
    pub fn and(left: Conditional, right: Conditional) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Conditional, right: Conditional) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn op(operation: Operation) -> Self {
        Self::Op(operation)
    }
}

impl From<Operation> for Conditional {
    fn from(operation: Operation) -> Self {
        Self::Op(operation)
    }
}

/// Sort direction for an [`OrderBy`] clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ordering clause, by attribute name.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub attribute: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: Direction::Desc,
        }
    }
}

/// Failure to translate a filter or ordering tree into a store query.
///
/// Distinct from execution errors; nothing was sent to the store.
#[derive(Debug, Error)]
pub enum QueryCompileError {
    #[error("unknown attribute '{attribute}' on {entity}")]
    UnknownAttribute {
        entity: &'static str,
        attribute: String,
    },

    #[error("operator requires a text operand for attribute '{attribute}'")]
    NonTextOperand { attribute: String },
}

/// Query under construction against one entity collection.
///
/// Building is pure; `all`/`one` compile and execute.
pub struct RepositoryQuery<'c, C, E> {
    conn: &'c C,
    filter: Option<Conditional>,
    orders: Vec<OrderBy>,
    _entity: PhantomData<E>,
}

impl<'c, C, E> RepositoryQuery<'c, C, E>
where
    C: ConnectionTrait,
    E: StoreEntity,
{
    pub(crate) fn new(conn: &'c C) -> Self {
        Self {
            conn,
            filter: None,
            orders: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Sets the filter tree, replacing any previous one.
    pub fn filter(mut self, conditional: impl Into<Conditional>) -> Self {
        self.filter = Some(conditional.into());
        self
    }

    /// Appends an ordering clause; earlier clauses take precedence.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.orders.push(order);
        self
    }

    /// Compiles the accumulated tree into an executable select.
    pub fn compile(&self) -> Result<Select<E>, QueryCompileError> {
        let mut select = E::find();

        if let Some(conditional) = &self.filter {
            select = select.filter(compile_conditional::<E>(conditional)?);
        }

        for order in &self.orders {
            let column = resolve_column::<E>(&order.attribute)?;
            let direction = match order.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            select = select.order_by(column, direction);
        }

        Ok(select)
    }

    /// Compiles and fetches all matching rows.
    pub async fn all(self) -> AppResult<Vec<E::Model>> {
        let select = self.compile()?;
        select.all(self.conn).await.map_err(Into::into)
    }

    /// Compiles and fetches the first matching row, if any.
    pub async fn one(self) -> AppResult<Option<E::Model>> {
        let select = self.compile()?;
        select.one(self.conn).await.map_err(Into::into)
    }
}

fn resolve_column<E: StoreEntity>(attribute: &str) -> Result<E::Column, QueryCompileError> {
    E::Column::from_str(attribute).map_err(|_| QueryCompileError::UnknownAttribute {
        entity: E::NAME,
        attribute: attribute.to_string(),
    })
}

fn compile_conditional<E: StoreEntity>(
    conditional: &Conditional,
) -> Result<Condition, QueryCompileError> {
    match conditional {
        Conditional::And(left, right) => Ok(Condition::all()
            .add(compile_conditional::<E>(left)?)
            .add(compile_conditional::<E>(right)?)),
        Conditional::Or(left, right) => Ok(Condition::any()
            .add(compile_conditional::<E>(left)?)
            .add(compile_conditional::<E>(right)?)),
        Conditional::Op(operation) => Ok(Condition::all().add(compile_operation::<E>(operation)?)),
    }
}

fn compile_operation<E: StoreEntity>(
    operation: &Operation,
) -> Result<SimpleExpr, QueryCompileError> {
    let column = resolve_column::<E>(&operation.attribute)?;
    let value = operation.value.clone();

    let expr = match operation.operator {
        Operator::Eq => column.eq(value),
        Operator::Ne => column.ne(value),
        Operator::Gt => column.gt(value),
        Operator::GtEq => column.gte(value),
        Operator::Lt => column.lt(value),
        Operator::LtEq => column.lte(value),
        Operator::Like => {
            let Value::String(Some(pattern)) = value else {
                return Err(QueryCompileError::NonTextOperand {
                    attribute: operation.attribute.clone(),
                });
            };
            column.like(pattern.as_str())
        }
    };

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::user;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn sql_of(select: Select<user::Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn compiles_leaf_comparison() {
        let condition = compile_conditional::<user::Entity>(&Conditional::op(Operation::eq(
            "email",
            "a@b.com",
        )))
        .unwrap();

        let sql = sql_of(user::Entity::find().filter(condition));
        assert!(sql.contains("\"email\" = 'a@b.com'"), "{sql}");
    }

    #[test]
    fn compiles_nested_tree() {
        let tree = Conditional::and(
            Conditional::op(Operation::gt("id", 5)),
            Conditional::or(
                Conditional::op(Operation::like("name", "A%")),
                Conditional::op(Operation::eq("email", "a@b.com")),
            ),
        );

        let condition = compile_conditional::<user::Entity>(&tree).unwrap();
        let sql = sql_of(user::Entity::find().filter(condition));

        assert!(sql.contains("\"id\" > 5"), "{sql}");
        assert!(sql.contains("OR"), "{sql}");
        assert!(sql.contains("LIKE 'A%'"), "{sql}");
    }

    #[test]
    fn unknown_attribute_is_a_compile_error() {
        let result =
            compile_conditional::<user::Entity>(&Conditional::op(Operation::eq("nope", 1)));

        assert!(matches!(
            result,
            Err(QueryCompileError::UnknownAttribute { entity: "User", .. })
        ));
    }

    #[test]
    fn like_rejects_non_text_operand() {
        let operation = Operation::new("name", Operator::Like, 42);
        let result = compile_operation::<user::Entity>(&operation);

        assert!(matches!(
            result,
            Err(QueryCompileError::NonTextOperand { .. })
        ));
    }

    #[test]
    fn ordering_resolves_columns() {
        let orders = [OrderBy::asc("name"), OrderBy::desc("id")];
        for order in &orders {
            assert!(resolve_column::<user::Entity>(&order.attribute).is_ok());
        }
        assert!(resolve_column::<user::Entity>("missing").is_err());
    }
}
