use crate::{
    codegen::{
        CanonicalTypeName, CodegenFootprint, FootprintError, FootprintRegistry, NamedParam,
        ResultType,
    },
    error::{ErrorClass, ErrorDetail, ErrorOrigin},
    obs::{MetricsEvent, MetricsSink, with_metrics_sink},
};
use std::{
    borrow::Cow,
    cell::RefCell,
    collections::{BTreeSet, HashSet},
    fmt,
    rc::Rc,
};

///
/// QualifiedType
///
/// Type handle that displays its simple name only.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct QualifiedType {
    package: &'static str,
    name: &'static str,
}

impl fmt::Display for QualifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl CanonicalTypeName for QualifiedType {
    fn canonical_name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}.{}", self.package, self.name))
    }
}

const fn qualified(package: &'static str, name: &'static str) -> QualifiedType {
    QualifiedType { package, name }
}

fn footprint(
    result: &'static str,
    params: &[(&'static str, &str)],
    tag: Option<&str>,
) -> CodegenFootprint<&'static str> {
    CodegenFootprint::new(
        Some(result),
        None,
        params
            .iter()
            .map(|(ty, name)| NamedParam::new(*ty, *name))
            .collect(),
        tag.map(str::to_string),
    )
    .expect("result type is present")
}

#[test]
fn footprint_requires_a_result_type() {
    let err = CodegenFootprint::<&'static str>::new(None, None, Vec::new(), None)
        .expect_err("missing result type must fail");

    assert_eq!(err.class, ErrorClass::Unsupported);
    assert_eq!(err.origin, ErrorOrigin::Codegen);
    assert!(matches!(
        err.detail,
        Some(ErrorDetail::Footprint(FootprintError::MissingResultType))
    ));
}

#[test]
fn footprint_falls_back_to_result_type_name() {
    let named =
        CodegenFootprint::<&'static str>::new(None, Some("Row".to_string()), Vec::new(), None)
            .expect("type name is a valid result");

    assert_eq!(named.result_type(), &ResultType::Named("Row".to_string()));
    assert_eq!(named.result_type_name(), Some("Row"));
}

#[test]
fn equal_fields_make_footprints_interchangeable() {
    let left = footprint("long", &[("Event", "eps"), ("bool", "isNew")], Some("agg"));
    let right = footprint("long", &[("Event", "events"), ("bool", "newData")], Some("agg"));

    assert_eq!(left, right, "parameter names do not take part in equality");
    assert_eq!(left.signature(), right.signature());

    let mut set = HashSet::new();
    set.insert(left);
    assert!(set.contains(&right));
}

#[test]
fn changing_any_field_breaks_equality() {
    let base = footprint("long", &[("Event", "eps")], Some("agg"));

    let other_result = footprint("double", &[("Event", "eps")], Some("agg"));
    let other_param = footprint("long", &[("Row", "eps")], Some("agg"));
    let extra_param = footprint("long", &[("Event", "eps"), ("bool", "b")], Some("agg"));
    let other_tag = footprint("long", &[("Event", "eps")], Some("window"));
    let no_tag = footprint("long", &[("Event", "eps")], None);

    for changed in [&other_result, &other_param, &extra_param, &other_tag, &no_tag] {
        assert_ne!(&base, changed);
        assert_ne!(base.signature(), changed.signature());
    }
}

#[test]
fn resolved_and_named_results_differ() {
    let resolved = footprint("Row", &[], None);
    let named =
        CodegenFootprint::<&'static str>::new(None, Some("Row".to_string()), Vec::new(), None)
            .expect("type name is a valid result");

    assert_ne!(resolved, named);
    assert_ne!(resolved.signature(), named.signature());
}

#[test]
fn referenced_types_include_result_and_parameters() {
    let unit = footprint("long", &[("Event", "eps"), ("bool", "isNew")], None);
    let mut types = BTreeSet::from(["Context"]);

    unit.collect_referenced_types(&mut types);

    assert_eq!(types, BTreeSet::from(["Context", "Event", "bool", "long"]));
}

#[test]
fn types_sharing_a_display_name_get_distinct_signatures() {
    let unit = |ty: QualifiedType| {
        CodegenFootprint::new(
            Some(ty.clone()),
            None,
            vec![NamedParam::new(ty, "map")],
            None,
        )
        .expect("result type is present")
    };
    let std_map = unit(qualified("std.collections", "Map"));
    let app_map = unit(qualified("app.model", "Map"));

    assert_eq!(
        std_map.params()[0].ty().to_string(),
        app_map.params()[0].ty().to_string()
    );
    assert_ne!(std_map, app_map);
    assert_ne!(std_map.signature(), app_map.signature());
    assert_eq!(std_map.signature(), unit(qualified("std.collections", "Map")).signature());
}

#[test]
fn signature_renders_as_hex() {
    let rendered = footprint("long", &[], None).signature().to_string();

    assert_eq!(rendered.len(), 64);
    assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn registry_redirects_equal_footprints_to_one_unit() {
    let mut registry = FootprintRegistry::new();

    let first = registry.register(footprint("long", &[("Event", "a")], Some("level")));
    let second = registry.register(footprint("double", &[("Event", "a")], Some("level")));
    let again = registry.register(footprint("long", &[("Event", "b")], Some("level")));

    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
    assert_eq!(again, first);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.reused(), 1);

    let ids: Vec<_> = registry.iter().map(|(id, _)| id.get()).collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(
        registry.get(second).map(CodegenFootprint::result_type),
        Some(&ResultType::Resolved("double"))
    );
}

#[test]
fn registry_reports_registrations_to_sink() {
    #[derive(Default)]
    struct CapturingSink {
        events: RefCell<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CapturingSink {
        fn record(&self, event: MetricsEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    let sink = Rc::new(CapturingSink::default());
    with_metrics_sink(sink.clone(), || {
        let mut registry = FootprintRegistry::new();
        registry.register(footprint("long", &[], None));
        registry.register(footprint("long", &[], None));
    });

    assert_eq!(
        sink.events.borrow().as_slice(),
        &[
            MetricsEvent::FootprintRegistered { reused: false },
            MetricsEvent::FootprintRegistered { reused: true },
        ]
    );
}
