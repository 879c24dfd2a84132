//! Module: forge
//! Responsibility: collaborator contracts consumed by local group-by planning.
//! Does not own: expression evaluation, aggregation function semantics, or state behavior.
//! Boundary: opaque forge/factory/accessor handles supplied by the query compiler front end.


use crate::{error::InternalError, plan::local_group::LocalGroupPlanError};
use std::{fmt, sync::Arc};

///
/// AggregationForges
///
/// Type family supplied by the expression forge registry. The planner never
/// evaluates any of these handles; it only routes, shares, and compares them.
///

pub trait AggregationForges {
    /// Partition-key expression node as produced by the front end.
    /// Equality must be deep (structural) equality.
    type ExprNode: PartialEq + fmt::Debug;

    /// Evaluable computation compiled from one expression node.
    type ExprForge: Clone + fmt::Debug;

    /// Per-column aggregation method factory. Never shared across columns.
    type MethodFactory: ?Sized + fmt::Debug;

    /// Shared aggregation state factory. Compared by handle identity only.
    type StateFactory: ?Sized + fmt::Debug;

    /// Reads one facet of a shared aggregation state.
    type Accessor: Clone + PartialEq + fmt::Debug;

    /// Aggregate expression node bound to one output column.
    type AggregateNode: fmt::Debug;

    /// Compile one partition-key expression into its evaluable forge.
    fn forge(expr: &Self::ExprNode) -> Self::ExprForge;
}

///
/// AccessorSlotPair
///
/// Slot of a state factory paired with the accessor reading one facet of it.
/// In the global accessor table `slot` is absolute; in a column plan it is
/// relative to the owning level's deduplicated state-factory list.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessorSlotPair<A> {
    slot: usize,
    accessor: A,
}

impl<A> AccessorSlotPair<A> {
    #[must_use]
    pub const fn new(slot: usize, accessor: A) -> Self {
        Self { slot, accessor }
    }

    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    #[must_use]
    pub const fn accessor(&self) -> &A {
        &self.accessor
    }
}

///
/// ColumnSource
///
/// Resolved computation kind for one output column.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnSource {
    /// Column is backed by the method forge/factory at `index`.
    Method { index: usize },

    /// Column is backed by the accessor table entry at `accessor_index`.
    Access { accessor_index: usize },
}

///
/// ForgeTables
///
/// The four global, column-indexed computation arrays shared by every level of
/// one query. Columns below `method_bound()` are method-based; the remaining
/// columns index the accessor table at `column - method_bound()`.
///

pub struct ForgeTables<'a, F: AggregationForges> {
    method_forges: &'a [Arc<[F::ExprForge]>],
    method_factories: &'a [Arc<F::MethodFactory>],
    state_factories: &'a [Arc<F::StateFactory>],
    accessors: &'a [AccessorSlotPair<F::Accessor>],
}

impl<'a, F: AggregationForges> ForgeTables<'a, F> {
    /// Bundle the global computation arrays.
    ///
    /// Method forges and method factories are parallel arrays and must agree
    /// in length.
    pub fn new(
        method_forges: &'a [Arc<[F::ExprForge]>],
        method_factories: &'a [Arc<F::MethodFactory>],
        state_factories: &'a [Arc<F::StateFactory>],
        accessors: &'a [AccessorSlotPair<F::Accessor>],
    ) -> Result<Self, InternalError> {
        if method_forges.len() != method_factories.len() {
            return Err(LocalGroupPlanError::MethodArityMismatch {
                forges: method_forges.len(),
                factories: method_factories.len(),
            }
            .into());
        }

        Ok(Self {
            method_forges,
            method_factories,
            state_factories,
            accessors,
        })
    }

    /// Number of method-based columns; the dispatch bound.
    #[must_use]
    pub const fn method_bound(&self) -> usize {
        self.method_factories.len()
    }

    /// Highest column count these tables can resolve.
    #[must_use]
    pub const fn column_capacity(&self) -> usize {
        self.method_bound() + self.accessors.len()
    }

    #[must_use]
    pub const fn is_method_column(&self, column: usize) -> bool {
        column < self.method_bound()
    }

    /// Map one output column to the table entry backing it.
    pub fn resolve_column(&self, column: usize) -> Result<ColumnSource, LocalGroupPlanError> {
        if self.is_method_column(column) {
            return Ok(ColumnSource::Method { index: column });
        }

        let accessor_index = column - self.method_bound();
        if accessor_index >= self.accessors.len() {
            return Err(LocalGroupPlanError::UnresolvedColumn {
                column,
                method_bound: self.method_bound(),
                accessor_count: self.accessors.len(),
            });
        }

        Ok(ColumnSource::Access { accessor_index })
    }

    pub(crate) fn method_forges(&self, index: usize) -> &'a Arc<[F::ExprForge]> {
        &self.method_forges[index]
    }

    pub(crate) fn method_factory(&self, index: usize) -> &'a Arc<F::MethodFactory> {
        &self.method_factories[index]
    }

    pub(crate) fn accessor(&self, accessor_index: usize) -> &'a AccessorSlotPair<F::Accessor> {
        &self.accessors[accessor_index]
    }

    pub(crate) fn state_factory(&self, slot: usize) -> Option<&'a Arc<F::StateFactory>> {
        self.state_factories.get(slot)
    }

    pub(crate) const fn state_factory_count(&self) -> usize {
        self.state_factories.len()
    }
}

impl<F: AggregationForges> Clone for ForgeTables<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: AggregationForges> Copy for ForgeTables<'_, F> {}
