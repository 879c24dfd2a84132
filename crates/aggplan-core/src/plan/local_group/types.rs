//! Pure local group-by data types; must not embed planning semantics.

use crate::{
    forge::{AccessorSlotPair, AggregationForges},
    plan::QueryMode,
};
use derive_more::{Add, AddAssign, Sum};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// LevelNumber
///
/// Stable identifier of one grouping level. `-1` is the top level, `0` the
/// default level, and remaining levels count up from `1` in input order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct LevelNumber(i32);

impl LevelNumber {
    pub const TOP: Self = Self(-1);
    pub const DEFAULT: Self = Self(0);
    pub const FIRST_SEQUENTIAL: Self = Self(1);

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_top(self) -> bool {
        self.0 == Self::TOP.0
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == Self::DEFAULT.0
    }

    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// ColumnAggregationRequest
///
/// One output column bound to the aggregate expression computing it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnAggregationRequest<N> {
    column: usize,
    node: N,
}

impl<N> ColumnAggregationRequest<N> {
    #[must_use]
    pub const fn new(column: usize, node: N) -> Self {
        Self { column, node }
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    #[must_use]
    pub const fn node(&self) -> &N {
        &self.node
    }
}

///
/// LevelDescription
///
/// One grouping granularity: its partition keys and the columns aggregated at it.
/// An empty key list marks the unconditional top level.
///

#[derive(Debug)]
pub struct LevelDescription<F: AggregationForges> {
    partition_exprs: Vec<F::ExprNode>,
    requests: Vec<ColumnAggregationRequest<F::AggregateNode>>,
}

impl<F: AggregationForges> LevelDescription<F> {
    #[must_use]
    pub const fn new(
        partition_exprs: Vec<F::ExprNode>,
        requests: Vec<ColumnAggregationRequest<F::AggregateNode>>,
    ) -> Self {
        Self {
            partition_exprs,
            requests,
        }
    }

    #[must_use]
    pub const fn partition_exprs(&self) -> &[F::ExprNode] {
        self.partition_exprs.as_slice()
    }

    #[must_use]
    pub const fn requests(&self) -> &[ColumnAggregationRequest<F::AggregateNode>] {
        self.requests.as_slice()
    }

    #[must_use]
    pub const fn is_top(&self) -> bool {
        self.partition_exprs.is_empty()
    }
}

///
/// GroupingDescription
///
/// Front-end grouping shape of one statement: total column count plus the
/// ordered grouping levels the columns partition across.
///

#[derive(Debug)]
pub struct GroupingDescription<F: AggregationForges> {
    num_columns: usize,
    levels: Vec<LevelDescription<F>>,
}

impl<F: AggregationForges> GroupingDescription<F> {
    #[must_use]
    pub const fn new(num_columns: usize, levels: Vec<LevelDescription<F>>) -> Self {
        Self {
            num_columns,
            levels,
        }
    }

    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[must_use]
    pub const fn levels(&self) -> &[LevelDescription<F>] {
        self.levels.as_slice()
    }
}

///
/// ColumnSlot
///
/// Where one column reads its aggregation result within its level.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnSlot<A> {
    /// Offset into the level's method list; never shared.
    Method { offset: usize },

    /// Offset into the level's deduplicated state list plus the facet accessor.
    Access(AccessorSlotPair<A>),
}

impl<A> ColumnSlot<A> {
    #[must_use]
    pub const fn is_method(&self) -> bool {
        matches!(self, Self::Method { .. })
    }

    #[must_use]
    pub const fn method_offset(&self) -> Option<usize> {
        match self {
            Self::Method { offset } => Some(*offset),
            Self::Access(_) => None,
        }
    }

    #[must_use]
    pub const fn access_pair(&self) -> Option<&AccessorSlotPair<A>> {
        match self {
            Self::Method { .. } => None,
            Self::Access(pair) => Some(pair),
        }
    }
}

///
/// LocalGroupByColumn
///
/// Routing entry for one output column.
///

#[derive(Debug)]
pub struct LocalGroupByColumn<F: AggregationForges> {
    default_level: bool,
    partition_forges: Arc<[F::ExprForge]>,
    slot: ColumnSlot<F::Accessor>,
    level_number: LevelNumber,
}

impl<F: AggregationForges> LocalGroupByColumn<F> {
    #[must_use]
    pub(crate) const fn new(
        default_level: bool,
        partition_forges: Arc<[F::ExprForge]>,
        slot: ColumnSlot<F::Accessor>,
        level_number: LevelNumber,
    ) -> Self {
        Self {
            default_level,
            partition_forges,
            slot,
            level_number,
        }
    }

    #[must_use]
    pub const fn is_default_level(&self) -> bool {
        self.default_level
    }

    #[must_use]
    pub fn partition_forges(&self) -> &[F::ExprForge] {
        &self.partition_forges
    }

    #[must_use]
    pub const fn slot(&self) -> &ColumnSlot<F::Accessor> {
        &self.slot
    }

    #[must_use]
    pub const fn level_number(&self) -> LevelNumber {
        self.level_number
    }
}

///
/// PlanTotals
///
/// Method and distinct state instance counts, per level or summed over a plan.
///

#[derive(Add, AddAssign, Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Sum)]
pub struct PlanTotals {
    pub num_methods: usize,
    pub num_accesses: usize,
}

///
/// LocalGroupByLevel
///
/// Computations owned by one grouping level. State factories are distinct by
/// identity within the level; method entries are one per column.
///

#[derive(Debug)]
pub struct LocalGroupByLevel<F: AggregationForges> {
    level_number: LevelNumber,
    method_forges: Vec<Arc<[F::ExprForge]>>,
    method_factories: Vec<Arc<F::MethodFactory>>,
    state_factories: Vec<Arc<F::StateFactory>>,
    partition_forges: Arc<[F::ExprForge]>,
    default_level: bool,
}

impl<F: AggregationForges> LocalGroupByLevel<F> {
    #[must_use]
    pub(crate) const fn new(
        level_number: LevelNumber,
        method_forges: Vec<Arc<[F::ExprForge]>>,
        method_factories: Vec<Arc<F::MethodFactory>>,
        state_factories: Vec<Arc<F::StateFactory>>,
        partition_forges: Arc<[F::ExprForge]>,
        default_level: bool,
    ) -> Self {
        Self {
            level_number,
            method_forges,
            method_factories,
            state_factories,
            partition_forges,
            default_level,
        }
    }

    #[must_use]
    pub const fn level_number(&self) -> LevelNumber {
        self.level_number
    }

    #[must_use]
    pub const fn method_forges(&self) -> &[Arc<[F::ExprForge]>] {
        self.method_forges.as_slice()
    }

    #[must_use]
    pub const fn method_factories(&self) -> &[Arc<F::MethodFactory>] {
        self.method_factories.as_slice()
    }

    #[must_use]
    pub const fn state_factories(&self) -> &[Arc<F::StateFactory>] {
        self.state_factories.as_slice()
    }

    #[must_use]
    pub fn partition_forges(&self) -> &[F::ExprForge] {
        &self.partition_forges
    }

    #[must_use]
    pub const fn is_default_level(&self) -> bool {
        self.default_level
    }

    #[must_use]
    pub const fn totals(&self) -> PlanTotals {
        PlanTotals {
            num_methods: self.method_factories.len(),
            num_accesses: self.state_factories.len(),
        }
    }
}

///
/// LocalGroupByPlan
///
/// Immutable local group-by plan consumed by evaluation/codegen.
///
/// The top level is held apart from `levels` because it is evaluated
/// unconditionally, whatever grouping key an event carries.
///

#[derive(Debug)]
pub struct LocalGroupByPlan<F: AggregationForges> {
    totals: PlanTotals,
    columns: Vec<LocalGroupByColumn<F>>,
    optional_top_level: Option<LocalGroupByLevel<F>>,
    levels: Vec<LocalGroupByLevel<F>>,
    mode: QueryMode,
}

impl<F: AggregationForges> LocalGroupByPlan<F> {
    #[must_use]
    pub(crate) fn new(
        totals: PlanTotals,
        columns: Vec<LocalGroupByColumn<F>>,
        optional_top_level: Option<LocalGroupByLevel<F>>,
        levels: Vec<LocalGroupByLevel<F>>,
        mode: QueryMode,
    ) -> Self {
        debug_assert!(
            levels
                .windows(2)
                .all(|w| w[0].level_number() < w[1].level_number()),
            "levels must be listed in increasing level-number order"
        );

        Self {
            totals,
            columns,
            optional_top_level,
            levels,
            mode,
        }
    }

    #[must_use]
    pub const fn totals(&self) -> PlanTotals {
        self.totals
    }

    #[must_use]
    pub const fn num_methods(&self) -> usize {
        self.totals.num_methods
    }

    #[must_use]
    pub const fn num_accesses(&self) -> usize {
        self.totals.num_accesses
    }

    /// Column routing entries, indexed by output column.
    #[must_use]
    pub const fn columns(&self) -> &[LocalGroupByColumn<F>] {
        self.columns.as_slice()
    }

    #[must_use]
    pub fn column(&self, column: usize) -> Option<&LocalGroupByColumn<F>> {
        self.columns.get(column)
    }

    #[must_use]
    pub const fn optional_top_level(&self) -> Option<&LocalGroupByLevel<F>> {
        self.optional_top_level.as_ref()
    }

    /// Non-top levels in level-number order.
    #[must_use]
    pub const fn levels(&self) -> &[LocalGroupByLevel<F>] {
        self.levels.as_slice()
    }

    /// Find a level (top level included) by number.
    #[must_use]
    pub fn level(&self, level_number: LevelNumber) -> Option<&LocalGroupByLevel<F>> {
        self.all_levels()
            .find(|level| level.level_number() == level_number)
    }

    /// Top level first (if any), then the remaining levels in order.
    pub fn all_levels(&self) -> impl Iterator<Item = &LocalGroupByLevel<F>> {
        self.optional_top_level.iter().chain(self.levels.iter())
    }

    #[must_use]
    pub const fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Number of access-state columns that reuse a slot already claimed by
    /// another column of the same level.
    #[must_use]
    pub fn shared_access_columns(&self) -> usize {
        let access_columns = self
            .columns
            .iter()
            .filter(|column| !column.slot().is_method())
            .count();

        access_columns.saturating_sub(self.totals.num_accesses)
    }
}
