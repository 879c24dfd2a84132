use crate::{
    plan::{
        ColumnPlanBuffer, ColumnSlot, LevelNumber, LocalGroupByColumn, LocalGroupPlanError,
        build_level,
    },
    test_support::{TableFixture, TestForges, level},
};
use std::sync::Arc;

// (relative slot, accessor) of one access-state column.
fn access_slot(columns: &[LocalGroupByColumn<TestForges>], column: usize) -> (usize, &'static str) {
    let pair = columns[column]
        .slot()
        .access_pair()
        .expect("access column");

    (pair.slot(), *pair.accessor())
}

#[test]
fn accessors_of_one_factory_share_a_slot() {
    let fixture = TableFixture::new(0, &["window"], &[(0, "first"), (0, "last")]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(2);

    let built = build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["k"], &[0, 1]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");
    let columns = buffer.finish().expect("all columns assigned");

    assert_eq!(built.state_factories().len(), 1);
    assert!(Arc::ptr_eq(
        &built.state_factories()[0],
        &fixture.state_factories[0]
    ));
    assert_eq!(access_slot(&columns, 0), (0, "first"));
    assert_eq!(access_slot(&columns, 1), (0, "last"));
    assert_eq!(built.totals().num_accesses, 1);
}

#[test]
fn equal_looking_factories_with_distinct_handles_do_not_share() {
    let fixture = TableFixture::new(0, &["window", "window"], &[(0, "first"), (1, "first")]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(2);

    let built = build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["k"], &[0, 1]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");
    let columns = buffer.finish().expect("all columns assigned");

    assert_eq!(built.state_factories().len(), 2);
    assert_eq!(access_slot(&columns, 0), (0, "first"));
    assert_eq!(access_slot(&columns, 1), (1, "first"));
}

#[test]
fn method_columns_take_offsets_in_request_order() {
    let fixture = TableFixture::new(3, &[], &[]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(3);

    let built = build_level(
        LevelNumber::DEFAULT,
        &level(&["k"], &[2, 0, 1]),
        fixture.tables(),
        &mut buffer,
        true,
    )
    .expect("valid level");
    let columns = buffer.finish().expect("all columns assigned");

    let offsets: Vec<_> = columns
        .iter()
        .map(|column| column.slot().method_offset().expect("method column"))
        .collect();
    assert_eq!(offsets, vec![1, 2, 0]);

    assert_eq!(built.method_factories().len(), 3);
    assert!(Arc::ptr_eq(
        &built.method_factories()[0],
        &fixture.method_factories[2]
    ));
    assert!(Arc::ptr_eq(&built.method_forges()[0], &fixture.method_forges[2]));
    assert!(columns.iter().all(|column| column.is_default_level()));
}

#[test]
fn mixed_level_routes_methods_and_shared_states() {
    let fixture = TableFixture::new(
        2,
        &["window", "sorted"],
        &[(0, "first"), (1, "min"), (0, "count")],
    );
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(5);

    let built = build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["k"], &[3, 0, 2, 4, 1]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");
    let columns = buffer.finish().expect("all columns assigned");

    assert_eq!(columns[0].slot(), &ColumnSlot::Method { offset: 0 });
    assert_eq!(columns[1].slot(), &ColumnSlot::Method { offset: 1 });
    assert_eq!(access_slot(&columns, 3), (0, "min"));
    assert_eq!(access_slot(&columns, 2), (1, "first"));
    assert_eq!(access_slot(&columns, 4), (1, "count"));
    assert_eq!(built.totals().num_methods, 2);
    assert_eq!(built.totals().num_accesses, 2);
}

#[test]
fn partition_forges_are_shared_by_level_columns() {
    let fixture = TableFixture::new(2, &[], &[]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(2);

    let built = build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["region", "custId"], &[0, 1]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");
    let columns = buffer.finish().expect("all columns assigned");

    let expected = vec!["forge(region)".to_string(), "forge(custId)".to_string()];
    assert_eq!(built.partition_forges(), expected.as_slice());
    for column in &columns {
        assert_eq!(column.partition_forges(), expected.as_slice());
        assert_eq!(column.level_number(), LevelNumber::FIRST_SEQUENTIAL);
    }
}

#[test]
fn builders_write_only_their_own_columns() {
    let fixture = TableFixture::new(3, &[], &[]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(3);

    build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["a"], &[1]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");

    assert!(buffer.is_assigned(1));
    assert!(!buffer.is_assigned(0));
    assert!(!buffer.is_assigned(2));
    assert_eq!(buffer.len(), 3);

    let err = buffer.finish().expect_err("columns 0 and 2 are unassigned");
    assert_eq!(
        err.local_group_detail(),
        Some(&LocalGroupPlanError::UnassignedColumn { column: 0 })
    );
}

#[test]
fn empty_level_contributes_nothing() {
    let fixture = TableFixture::new(1, &[], &[]);
    let mut buffer = ColumnPlanBuffer::<TestForges>::new(0);

    let built = build_level(
        LevelNumber::FIRST_SEQUENTIAL,
        &level(&["a"], &[]),
        fixture.tables(),
        &mut buffer,
        false,
    )
    .expect("valid level");

    assert_eq!(built.totals().num_methods, 0);
    assert_eq!(built.totals().num_accesses, 0);
    assert!(buffer.is_empty());
}
