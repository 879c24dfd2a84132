//! Module: plan::local_group::analyzer
//! Responsibility: level numbering and assembly of one local group-by plan.
//! Does not own: per-column slot assignment (see `level`).
//! Boundary: sole writer of the column buffer; drives level builders strictly in sequence.

use crate::{
    error::InternalError,
    forge::{AggregationForges, ForgeTables},
    obs::sink::{self, MetricsEvent},
    plan::{
        AnalyzeConfig,
        local_group::{
            ColumnPlanBuffer, GroupingDescription, LevelDescription, LevelNumber,
            LocalGroupByLevel, LocalGroupByPlan, LocalGroupPlanError, PlanTotals, build_level,
            deep_equals_ignore_dup_and_order,
        },
    },
};
use std::collections::BTreeSet;

///
/// LevelRoles
///
/// Input positions of the privileged levels, resolved before numbering.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct LevelRoles {
    top: Option<usize>,
    default: Option<usize>,
}

/// Plan the aggregation state instances of one statement.
///
/// Numbering: the key-less level becomes the top level (`-1`), the first level
/// whose keys equal `group_by` as a set becomes the default level (`0`), and
/// every other level is numbered from `1` in input order.
///
/// A missing `group_by` is treated as an empty key list.
pub fn analyze<F: AggregationForges>(
    tables: ForgeTables<'_, F>,
    grouping: &GroupingDescription<F>,
    group_by: Option<&[F::ExprNode]>,
    config: &AnalyzeConfig,
) -> Result<LocalGroupByPlan<F>, InternalError> {
    let result = plan_levels(tables, grouping, group_by.unwrap_or_default(), config);

    match &result {
        Ok(plan) => sink::record(MetricsEvent::LocalGroupPlanBuilt {
            levels: plan.levels().len(),
            has_top_level: plan.optional_top_level().is_some(),
            num_methods: plan.num_methods(),
            num_accesses: plan.num_accesses(),
            shared_access_columns: plan.shared_access_columns(),
        }),
        Err(err) => {
            tracing::debug!(
                statement = config.statement_name().unwrap_or_default(),
                class = %err.class,
                origin = %err.origin,
                error = %err,
                "rejected local group-by plan"
            );
            sink::record(MetricsEvent::LocalGroupPlanRejected { class: err.class });
        }
    }

    result
}

fn plan_levels<F: AggregationForges>(
    tables: ForgeTables<'_, F>,
    grouping: &GroupingDescription<F>,
    group_by: &[F::ExprNode],
    config: &AnalyzeConfig,
) -> Result<LocalGroupByPlan<F>, InternalError> {
    let statement = config.statement_name().unwrap_or_default();
    let roles = resolve_level_roles(grouping.levels(), group_by)?;
    let mut columns = ColumnPlanBuffer::new(grouping.num_columns());

    // top level: aliases the statement grouping only when there is none
    let optional_top_level = roles
        .top
        .map(|index| {
            let level = &grouping.levels()[index];
            log_level(statement, index, LevelNumber::TOP, level);
            build_level(
                LevelNumber::TOP,
                level,
                tables,
                &mut columns,
                group_by.is_empty(),
            )
        })
        .transpose()?;

    let mut levels = Vec::with_capacity(grouping.levels().len());

    if let Some(index) = roles.default {
        let level = &grouping.levels()[index];
        log_level(statement, index, LevelNumber::DEFAULT, level);
        levels.push(build_level(
            LevelNumber::DEFAULT,
            level,
            tables,
            &mut columns,
            true,
        )?);
    }

    let mut level_number = LevelNumber::FIRST_SEQUENTIAL;
    for (index, level) in grouping.levels().iter().enumerate() {
        if Some(index) == roles.top || Some(index) == roles.default {
            continue;
        }
        log_level(statement, index, level_number, level);
        levels.push(build_level(
            level_number,
            level,
            tables,
            &mut columns,
            false,
        )?);
        level_number = level_number.next();
    }

    ensure_unique_level_numbers(optional_top_level.as_ref(), &levels)?;

    let totals = optional_top_level
        .iter()
        .chain(levels.iter())
        .map(LocalGroupByLevel::totals)
        .sum::<PlanTotals>();
    let columns = columns.finish()?;

    tracing::debug!(
        statement,
        levels = levels.len(),
        top_level = optional_top_level.is_some(),
        num_methods = totals.num_methods,
        num_accesses = totals.num_accesses,
        "planned local group-by aggregation"
    );

    Ok(LocalGroupByPlan::new(
        totals,
        columns,
        optional_top_level,
        levels,
        config.mode(),
    ))
}

// Locate the key-less level and the level aliasing the statement group-by.
fn resolve_level_roles<F: AggregationForges>(
    levels: &[LevelDescription<F>],
    group_by: &[F::ExprNode],
) -> Result<LevelRoles, LocalGroupPlanError> {
    let mut roles = LevelRoles::default();

    for (index, level) in levels.iter().enumerate() {
        if level.is_top() {
            if let Some(first) = roles.top {
                return Err(LocalGroupPlanError::MultipleTopLevels {
                    first,
                    second: index,
                });
            }
            roles.top = Some(index);
            continue;
        }

        if !deep_equals_ignore_dup_and_order(group_by, level.partition_exprs()) {
            continue;
        }
        if let Some(first) = roles.default {
            return Err(LocalGroupPlanError::MultipleDefaultLevels {
                first,
                second: index,
            });
        }
        roles.default = Some(index);
    }

    Ok(roles)
}

fn ensure_unique_level_numbers<F: AggregationForges>(
    top: Option<&LocalGroupByLevel<F>>,
    levels: &[LocalGroupByLevel<F>],
) -> Result<(), LocalGroupPlanError> {
    let mut seen = BTreeSet::new();
    for level in top.into_iter().chain(levels.iter()) {
        if !seen.insert(level.level_number()) {
            return Err(LocalGroupPlanError::LevelNumberCollision {
                level_number: level.level_number(),
            });
        }
    }

    Ok(())
}

fn log_level<F: AggregationForges>(
    statement: &str,
    index: usize,
    level_number: LevelNumber,
    level: &LevelDescription<F>,
) {
    tracing::debug!(
        statement,
        input_index = index,
        level = %level_number,
        partition_keys = level.partition_exprs().len(),
        columns = level.requests().len(),
        "numbered local group-by level"
    );
}
