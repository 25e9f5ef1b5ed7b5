mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{fill_bank, select_all, workflow, ScriptedGateway};
use ecampus_enrollment::enrollment::SaveBlocker;
use ecampus_enrollment::{BankField, Resolution, SelectOption, SelectionLevel};

#[tokio::test]
async fn test_mount_loads_merit_and_talukas() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);

    let resolution = wf.mount().await.unwrap();
    assert_eq!(resolution, Resolution::Loaded { level: SelectionLevel::Taluka, count: 2 });
    assert_eq!(wf.merit().await.unwrap().merit_student_info_id, 5521);
    assert_eq!(
        wf.level(SelectionLevel::Taluka).await.options[0],
        SelectOption::new("Pune", "Pune")
    );
}

#[tokio::test]
async fn test_mount_fails_without_merit_record() {
    let gateway = Arc::new(ScriptedGateway { merit_missing: true, ..Default::default() });
    let wf = workflow(&gateway);

    let err = wf.mount().await.unwrap_err();
    assert_eq!(err.user_message(), "Merit form not found");
    assert!(wf.merit().await.is_none());
}

#[tokio::test]
async fn test_full_chain_resolves_with_auto_selected_medium() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    let snapshot = wf.snapshot().await;
    assert_eq!(snapshot.selections.value(SelectionLevel::Medium), Some("2"));
    assert_eq!(snapshot.selections.class_is_direct(), Some(true));
    assert!(snapshot.can_save);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_named_handlers_walk_the_chain() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    wf.mount().await.unwrap();
    let resolver = wf.resolver();

    let loaded = |level, count| Resolution::Loaded { level, count };
    assert_eq!(resolver.on_taluka_change("Pune").await, loaded(SelectionLevel::Institute, 3));
    assert_eq!(resolver.on_institute_change("106015").await, loaded(SelectionLevel::Section, 2));
    assert_eq!(resolver.on_section_change("8").await, loaded(SelectionLevel::Course, 2));
    assert_eq!(resolver.on_course_change("307").await, loaded(SelectionLevel::Class, 1));
    assert_eq!(resolver.on_class_change("1510702").await, loaded(SelectionLevel::Medium, 2));
    assert_eq!(wf.level(SelectionLevel::Medium).await.value.as_deref(), Some("2"));
    assert_eq!(resolver.on_medium_change("3").await, Resolution::Terminal);

    let selections = wf.selections().await;
    assert!(selections.all_selected());
    assert_eq!(selections.value(SelectionLevel::Medium), Some("3"));
    assert!(wf.can_save().await);
}

#[tokio::test]
async fn test_downstream_cleared_before_fetch_resolves() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    gateway.hold_sections.store(true, Ordering::SeqCst);

    let change = wf.select(SelectionLevel::Institute, "106020");
    let check = async {
        while !gateway.sections_waiting.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        let selections = wf.selections().await;
        assert_eq!(selections.value(SelectionLevel::Institute), Some("106020"));
        for level in SelectionLevel::Section.from_here() {
            assert!(selections.value(level).is_none(), "{} still set", level);
            assert!(selections.options(level).is_empty(), "{} still has options", level);
        }
        assert!(selections.level(SelectionLevel::Section).loading);
        assert_eq!(selections.class_is_direct(), None);
        assert!(!wf.can_save().await);

        gateway.release.notify_one();
    };

    let (resolution, _) = tokio::join!(change, check);
    assert_eq!(resolution, Resolution::Loaded { level: SelectionLevel::Section, count: 1 });
    assert!(!wf.level(SelectionLevel::Section).await.loading);
}

#[tokio::test]
async fn test_slow_earlier_response_is_discarded() {
    let gateway = Arc::new(ScriptedGateway {
        section_delay_ms: [("106015".to_string(), 80), ("106020".to_string(), 5)].into_iter().collect(),
        ..Default::default()
    });
    let wf = workflow(&gateway);
    wf.mount().await.unwrap();
    wf.select(SelectionLevel::Taluka, "Pune").await;

    let first = wf.select(SelectionLevel::Institute, "106015");
    let second = async {
        while gateway.section_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        wf.select(SelectionLevel::Institute, "106020").await
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first, Resolution::Stale);
    assert_eq!(second, Resolution::Loaded { level: SelectionLevel::Section, count: 1 });

    let sections = wf.level(SelectionLevel::Section).await;
    assert_eq!(sections.options, vec![SelectOption::new("Vocational", "12")]);
}

#[tokio::test]
async fn test_fast_earlier_response_is_discarded() {
    let gateway = Arc::new(ScriptedGateway {
        section_delay_ms: [("106015".to_string(), 5), ("106020".to_string(), 60)].into_iter().collect(),
        ..Default::default()
    });
    let wf = workflow(&gateway);
    wf.mount().await.unwrap();
    wf.select(SelectionLevel::Taluka, "Pune").await;

    let first = wf.select(SelectionLevel::Institute, "106015");
    let second = async {
        while gateway.section_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        wf.select(SelectionLevel::Institute, "106020").await
    };

    let (first, _) = tokio::join!(first, second);
    assert_eq!(first, Resolution::Stale);
    assert_eq!(
        wf.level(SelectionLevel::Section).await.options,
        vec![SelectOption::new("Vocational", "12")]
    );
}

#[tokio::test]
async fn test_stale_failure_does_not_set_error() {
    let gateway = Arc::new(ScriptedGateway {
        section_delay_ms: [("106099".to_string(), 60)].into_iter().collect(),
        failing_ccodes: ["106099".to_string()].into_iter().collect(),
        ..Default::default()
    });
    let wf = workflow(&gateway);
    wf.mount().await.unwrap();
    wf.select(SelectionLevel::Taluka, "Pune").await;

    let failing = wf.select(SelectionLevel::Institute, "106099");
    let winner = async {
        while gateway.section_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        wf.select(SelectionLevel::Institute, "106015").await
    };

    let (failing, _) = tokio::join!(failing, winner);
    assert_eq!(failing, Resolution::Stale);
    assert!(wf.error().await.is_none());
    assert_eq!(wf.level(SelectionLevel::Section).await.options.len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_sets_error_and_keeps_invalidation() {
    let gateway = Arc::new(ScriptedGateway {
        failing_ccodes: ["106020".to_string()].into_iter().collect(),
        ..Default::default()
    });
    let wf = workflow(&gateway);
    select_all(&wf).await;

    let resolution = wf.select(SelectionLevel::Institute, "106020").await;
    assert_eq!(resolution, Resolution::Failed("No sections for 106020".into()));
    assert_eq!(wf.error().await.as_deref(), Some("No sections for 106020"));

    let selections = wf.selections().await;
    assert_eq!(selections.value(SelectionLevel::Institute), Some("106020"));
    assert_eq!(selections.missing_levels().len(), 4);
    assert!(!selections.level(SelectionLevel::Section).loading);

    // The next successful action clears the error.
    wf.select(SelectionLevel::Institute, "106015").await;
    assert!(wf.error().await.is_none());
}

#[tokio::test]
async fn test_empty_option_list_is_not_an_error() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    wf.mount().await.unwrap();
    wf.select(SelectionLevel::Taluka, "Pune").await;

    let resolution = wf.select(SelectionLevel::Institute, "106099").await;
    assert_eq!(resolution, Resolution::Loaded { level: SelectionLevel::Section, count: 0 });
    assert!(wf.error().await.is_none());
}

#[tokio::test]
async fn test_deselect_clears_downstream_without_fetch() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;
    let calls_before = gateway.institute_calls.load(Ordering::SeqCst);

    assert_eq!(wf.select(SelectionLevel::Taluka, "").await, Resolution::Deselected);
    assert_eq!(gateway.institute_calls.load(Ordering::SeqCst), calls_before);

    let selections = wf.selections().await;
    assert_eq!(selections.missing_levels(), SelectionLevel::ALL.to_vec());
    assert_eq!(selections.options(SelectionLevel::Taluka).len(), 2);
    assert!(selections.options(SelectionLevel::Institute).is_empty());
}

#[tokio::test]
async fn test_user_medium_choice_survives() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    assert_eq!(wf.select(SelectionLevel::Medium, "3").await, Resolution::Terminal);
    let medium = wf.level(SelectionLevel::Medium).await;
    assert_eq!(medium.value.as_deref(), Some("3"));
    assert_eq!(medium.selected_label(), Some("Marathi"));
}

#[tokio::test]
async fn test_clearing_medium_is_a_deselect() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    assert_eq!(wf.select(SelectionLevel::Medium, "").await, Resolution::Deselected);
    assert!(wf.level(SelectionLevel::Medium).await.value.is_none());
    assert_eq!(wf.blockers().await, vec![SaveBlocker::MissingSelection(SelectionLevel::Medium)]);
    assert!(!wf.can_save().await);
}

#[tokio::test]
async fn test_reselecting_class_reloads_mediums() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;
    wf.select(SelectionLevel::Medium, "3").await;

    wf.select(SelectionLevel::Class, "1510702").await;
    assert_eq!(wf.level(SelectionLevel::Medium).await.value.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_can_save_follows_current_state() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;
    assert!(wf.can_save().await);

    wf.select(SelectionLevel::Medium, "").await;
    assert!(!wf.can_save().await);
    assert_eq!(
        wf.blockers().await,
        vec![SaveBlocker::MissingSelection(SelectionLevel::Medium)]
    );

    wf.select(SelectionLevel::Medium, "2").await;
    assert!(wf.can_save().await);
}

#[tokio::test]
async fn test_bank_details_gate_non_direct_classes() {
    let gateway = Arc::new(ScriptedGateway::non_direct());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    assert_eq!(wf.class_is_direct().await, Some(false));
    assert!(!wf.can_save().await);
    assert_eq!(wf.blockers().await.len(), BankField::ALL.len());

    fill_bank(&wf).await;
    assert!(wf.can_save().await);

    wf.update_bank_field(BankField::MotherDob, "").await;
    assert_eq!(
        wf.blockers().await,
        vec![SaveBlocker::MissingBankField(BankField::MotherDob)]
    );
}

#[tokio::test]
async fn test_bank_details_survive_reselection() {
    let gateway = Arc::new(ScriptedGateway::non_direct());
    let wf = workflow(&gateway);
    select_all(&wf).await;
    fill_bank(&wf).await;

    wf.select(SelectionLevel::Taluka, "Nashik").await;
    assert!(wf.bank_details().await.is_complete());
    assert_eq!(wf.class_is_direct().await, None);
}

#[tokio::test]
async fn test_direct_class_needs_no_bank_details() {
    let gateway = Arc::new(ScriptedGateway::default());
    let wf = workflow(&gateway);
    select_all(&wf).await;

    assert!(wf.bank_details().await.missing_fields().len() == BankField::ALL.len());
    assert!(wf.can_save().await);
}
