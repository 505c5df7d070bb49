/// Property tests for unit-of-work ordering and reference validation
///
/// Run with: cargo test --test property_tests
use proptest::prelude::*;
use unitofwork::{DataApiError, Record, ReferenceId, UnitOfWorkBuilder};

fn named(name: &str, refs: &[ReferenceId]) -> Record {
    let mut builder = Record::builder("Node__c").with_field("Name", name).unwrap();
    for (i, r) in refs.iter().enumerate() {
        builder = builder.with_field(&format!("Parent{}__c", i), r).unwrap();
    }
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn prop_order_preserved(names in prop::collection::vec("[a-z]{1,8}", 0..40)) {
        let mut uow = UnitOfWorkBuilder::new();
        for name in &names {
            uow.register_create(named(name, &[])).unwrap();
        }

        let unit = uow.build().unwrap();
        let registered: Vec<String> = unit
            .operations()
            .iter()
            .map(|op| op.record().string_field("Name").unwrap().to_string())
            .collect();
        prop_assert_eq!(registered, names);
    }

    #[test]
    fn prop_backward_references_build(
        picks in prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..3), 1..20)
    ) {
        // each record references arbitrary earlier records
        let mut uow = UnitOfWorkBuilder::new();
        let mut handles: Vec<ReferenceId> = Vec::new();
        for (i, choice) in picks.iter().enumerate() {
            let refs: Vec<ReferenceId> = if handles.is_empty() {
                Vec::new()
            } else {
                choice.iter().map(|idx| handles[idx.index(handles.len())].clone()).collect()
            };
            handles.push(uow.register_create(named(&format!("n{}", i), &refs)).unwrap());
        }

        prop_assert!(uow.build().is_ok());
    }

    #[test]
    fn prop_foreign_reference_never_builds(
        before in 0usize..10,
        after in 0usize..10,
        foreign_position in 0usize..10,
    ) {
        let mut other = UnitOfWorkBuilder::new();
        let mut foreign = None;
        for i in 0..=foreign_position {
            foreign = Some(other.register_create(named(&format!("f{}", i), &[])).unwrap());
        }
        let foreign = foreign.unwrap();

        let mut uow = UnitOfWorkBuilder::new();
        for i in 0..before {
            uow.register_create(named(&format!("b{}", i), &[])).unwrap();
        }
        uow.register_create(named("dangling", &[foreign])).unwrap();
        for i in 0..after {
            uow.register_create(named(&format!("a{}", i), &[])).unwrap();
        }

        let is_dangling = matches!(uow.build(), Err(DataApiError::DanglingReference { .. }));
        prop_assert!(is_dangling);
    }
}
