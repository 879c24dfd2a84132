//! Module: plan::local_group::level
//! Responsibility: per-level column assignment and in-level state-factory dedup.
//! Does not own: level numbering or global totals.
//! Boundary: writes only the columns its level owns into the shared column buffer.

use crate::{
    error::InternalError,
    forge::{AccessorSlotPair, AggregationForges, ColumnSource, ForgeTables},
    plan::local_group::{
        ColumnSlot, LevelDescription, LevelNumber, LocalGroupByColumn, LocalGroupByLevel,
        LocalGroupPlanError,
    },
};
use std::{collections::HashMap, sync::Arc};

///
/// ColumnPlanBuffer
///
/// Column-indexed arena owned by the analyzer. Each level builder borrows it
/// exclusively in turn and may fill each slot at most once.
///

#[derive(Debug)]
pub struct ColumnPlanBuffer<F: AggregationForges> {
    slots: Vec<Option<LocalGroupByColumn<F>>>,
}

impl<F: AggregationForges> ColumnPlanBuffer<F> {
    #[must_use]
    pub fn new(num_columns: usize) -> Self {
        let mut slots = Vec::with_capacity(num_columns);
        slots.resize_with(num_columns, || None);

        Self { slots }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Return true once `column` holds an entry.
    #[must_use]
    pub fn is_assigned(&self, column: usize) -> bool {
        matches!(self.slots.get(column), Some(Some(_)))
    }

    fn assign(
        &mut self,
        column: usize,
        entry: LocalGroupByColumn<F>,
    ) -> Result<(), LocalGroupPlanError> {
        let num_columns = self.slots.len();
        let Some(slot) = self.slots.get_mut(column) else {
            return Err(LocalGroupPlanError::ColumnOutOfRange {
                column,
                num_columns,
            });
        };
        if slot.is_some() {
            return Err(LocalGroupPlanError::DuplicateColumn { column });
        }
        *slot = Some(entry);

        Ok(())
    }

    /// Close the buffer; every column must have been assigned exactly once.
    pub fn finish(self) -> Result<Vec<LocalGroupByColumn<F>>, InternalError> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(column, slot)| slot.ok_or(LocalGroupPlanError::UnassignedColumn { column }))
            .collect::<Result<Vec<_>, _>>()
            .map_err(InternalError::from)
    }
}

///
/// StateFactoryIndex
///
/// Per-level lookup from state-factory handle identity to relative slot.
/// Two structurally identical factories with distinct handles stay distinct.
///

struct StateFactoryIndex<'a, S: ?Sized> {
    by_identity: HashMap<*const (), usize>,
    factories: Vec<&'a Arc<S>>,
}

impl<'a, S: ?Sized> StateFactoryIndex<'a, S> {
    fn new() -> Self {
        Self {
            by_identity: HashMap::new(),
            factories: Vec::new(),
        }
    }

    // Relative slot of `factory`, appending it on first use.
    fn slot_for(&mut self, factory: &'a Arc<S>) -> usize {
        let identity = Arc::as_ptr(factory).cast::<()>();
        let next = self.factories.len();
        let slot = *self.by_identity.entry(identity).or_insert(next);
        if slot == next {
            self.factories.push(factory);
        }

        slot
    }

    fn into_factories(self) -> Vec<Arc<S>> {
        debug_assert_eq!(self.by_identity.len(), self.factories.len());

        self.factories.into_iter().map(Arc::clone).collect()
    }
}

/// Build one grouping level and write its column routing entries.
///
/// Method columns take the next method offset. Access-state columns reuse the
/// relative slot of an identical factory handle already added to this level,
/// otherwise append it.
pub fn build_level<F: AggregationForges>(
    level_number: LevelNumber,
    level: &LevelDescription<F>,
    tables: ForgeTables<'_, F>,
    columns: &mut ColumnPlanBuffer<F>,
    default_level: bool,
) -> Result<LocalGroupByLevel<F>, InternalError> {
    let partition_forges: Arc<[F::ExprForge]> =
        level.partition_exprs().iter().map(F::forge).collect();

    let mut method_forges = Vec::new();
    let mut method_factories = Vec::new();
    let mut states = StateFactoryIndex::new();

    for request in level.requests() {
        let column = request.column();

        let slot = match tables.resolve_column(column)? {
            ColumnSource::Method { index } => {
                method_forges.push(Arc::clone(tables.method_forges(index)));
                method_factories.push(Arc::clone(tables.method_factory(index)));

                ColumnSlot::Method {
                    offset: method_factories.len() - 1,
                }
            }
            ColumnSource::Access { accessor_index } => {
                let pair = tables.accessor(accessor_index);
                let factory = tables.state_factory(pair.slot()).ok_or(
                    LocalGroupPlanError::UnresolvedStateSlot {
                        column,
                        slot: pair.slot(),
                        state_count: tables.state_factory_count(),
                    },
                )?;
                let relative_slot = states.slot_for(factory);

                ColumnSlot::Access(AccessorSlotPair::new(
                    relative_slot,
                    pair.accessor().clone(),
                ))
            }
        };

        tracing::trace!(
            level = %level_number,
            column,
            method = slot.is_method(),
            "assigned local group-by column"
        );

        columns.assign(
            column,
            LocalGroupByColumn::new(
                default_level,
                Arc::clone(&partition_forges),
                slot,
                level_number,
            ),
        )?;
    }

    Ok(LocalGroupByLevel::new(
        level_number,
        method_forges,
        method_factories,
        states.into_factories(),
        partition_forges,
        default_level,
    ))
}
