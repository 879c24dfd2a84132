mod level;

use crate::{
    error::InternalError,
    plan::{AnalyzeConfig, GroupingDescription, LocalGroupByPlan, LocalGroupPlanError, analyze},
    test_support::{TableFixture, TestForges},
};

fn plan_with(
    fixture: &TableFixture,
    grouping: &GroupingDescription<TestForges>,
    group_by: &[&'static str],
) -> Result<LocalGroupByPlan<TestForges>, InternalError> {
    analyze(
        fixture.tables(),
        grouping,
        Some(group_by),
        &AnalyzeConfig::continuous(),
    )
}

// Level number of every column, in column order.
fn level_numbers(plan: &LocalGroupByPlan<TestForges>) -> Vec<i32> {
    plan.columns()
        .iter()
        .map(|column| column.level_number().get())
        .collect()
}

fn expect_plan_error(
    result: Result<LocalGroupByPlan<TestForges>, InternalError>,
) -> LocalGroupPlanError {
    let err = result.expect_err("plan must be rejected");

    err.local_group_detail()
        .cloned()
        .expect("rejection must carry local group-by detail")
}
