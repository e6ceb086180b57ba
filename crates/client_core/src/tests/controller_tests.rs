use super::*;

fn roster(rows: usize) -> RosterController {
    RosterController::with_rows(rows, ControllerConfig::default())
}

fn anna() -> StudentSummary {
    StudentSummary::new(7, "Anna")
}

fn andrey() -> StudentSummary {
    StudentSummary::new(12, "Andrey")
}

fn expect_ticket(outcome: FilterOutcome) -> LookupTicket {
    match outcome {
        FilterOutcome::Lookup(ticket) => ticket,
        other => panic!("expected a lookup, got {other:?}"),
    }
}

/// Types `filter` into `row` and answers its lookup with `students`.
fn seed(
    controller: &mut RosterController,
    row: usize,
    filter: &str,
    students: Vec<StudentSummary>,
) {
    let ticket = expect_ticket(controller.on_filter_changed(row, filter).expect("row"));
    assert_eq!(
        controller.apply_lookup(&ticket, Ok(students.clone())),
        Ok(LookupApplied::Updated(students.len()))
    );
}

#[test]
fn numeric_id_from_suggestions_confirms_selection() {
    let mut controller = roster(3);
    seed(&mut controller, 0, "an", vec![anna(), andrey()]);

    let outcome = controller.on_filter_changed(0, "12").expect("row");

    assert_eq!(outcome, FilterOutcome::Selected(andrey()));
    let row = controller.row(0).expect("row");
    assert_eq!(row.visible_text(), "Andrey");
    assert_eq!(row.hidden_id(), Some(StudentId(12)));
    assert!(row.suggestions().is_empty());
}

#[test]
fn duplicate_id_is_rejected_and_row_reset() {
    let mut controller = roster(3);
    seed(&mut controller, 1, "an", vec![anna(), andrey()]);
    controller.on_filter_changed(1, "12").expect("row");

    seed(&mut controller, 0, "an", vec![anna(), andrey()]);
    let outcome = controller.on_filter_changed(0, "12").expect("row");

    let FilterOutcome::Rejected(duplicate) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(
        duplicate,
        DuplicateStudent {
            row: 0,
            id: StudentId(12),
            held_by: 1
        }
    );
    assert!(duplicate.message().contains("12"));

    let row_a = controller.row(0).expect("row");
    assert_eq!(row_a.visible_text(), "");
    assert_eq!(row_a.hidden_id(), None);
    assert_eq!(row_a.suggestions(), &[anna(), andrey()]);

    let row_b = controller.row(1).expect("row");
    assert_eq!(row_b.visible_text(), "Andrey");
    assert_eq!(row_b.hidden_id(), Some(StudentId(12)));
    assert_eq!(controller.holder_of(StudentId(12)), Some(1));
}

#[test]
fn each_student_is_held_by_at_most_one_row() {
    let mut controller = roster(4);
    for row in 0..4 {
        seed(&mut controller, row, "an", vec![anna(), andrey()]);
        controller.on_filter_changed(row, "7").expect("row");
    }

    let holders: Vec<_> = controller
        .rows()
        .iter()
        .filter(|row| row.hidden_id() == Some(StudentId(7)))
        .collect();
    assert_eq!(holders.len(), 1);
    assert_eq!(controller.holder_of(StudentId(7)), Some(0));
}

#[test]
fn short_text_clears_suggestions_and_id_without_lookup() {
    let mut controller = roster(2);
    seed(&mut controller, 0, "an", vec![anna()]);
    controller.on_filter_changed(0, "7").expect("row");
    seed(&mut controller, 0, "an", vec![anna()]);

    for text in ["A", ""] {
        let outcome = controller.on_filter_changed(0, text).expect("row");
        assert_eq!(outcome, FilterOutcome::Cleared);
        let row = controller.row(0).expect("row");
        assert!(row.suggestions().is_empty());
        assert_eq!(row.hidden_id(), None);
        assert_eq!(row.hidden_id_value(), "");
    }
}

#[test]
fn filter_length_counts_characters() {
    let mut controller = roster(1);
    assert!(matches!(
        controller.on_filter_changed(0, "Ан").expect("row"),
        FilterOutcome::Lookup(_)
    ));
    assert_eq!(
        controller.on_filter_changed(0, "А").expect("row"),
        FilterOutcome::Cleared
    );
}

#[test]
fn configured_filter_minimum_never_drops_below_two() {
    for min_filter_chars in [0, 1] {
        let mut controller = RosterController::with_rows(1, ControllerConfig { min_filter_chars });
        for text in ["", "A"] {
            assert_eq!(
                controller.on_filter_changed(0, text).expect("row"),
                FilterOutcome::Cleared,
                "min {min_filter_chars}, text {text:?}"
            );
        }
    }

    let mut strict = RosterController::with_rows(1, ControllerConfig { min_filter_chars: 3 });
    assert_eq!(strict.on_filter_changed(0, "An").expect("row"), FilterOutcome::Cleared);
    assert!(matches!(
        strict.on_filter_changed(0, "Ann").expect("row"),
        FilterOutcome::Lookup(_)
    ));
}

#[test]
fn oversized_numeric_text_is_unmatched_without_lookup() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "an", vec![anna()]);

    let outcome = controller
        .on_filter_changed(0, " 99999999999999999999 ")
        .expect("row");

    assert_eq!(
        outcome,
        FilterOutcome::Unmatched("99999999999999999999".to_string())
    );
    let row = controller.row(0).expect("row");
    assert_eq!(row.hidden_id(), None);
    assert_eq!(row.suggestions(), &[anna()]);
}

#[test]
fn unmatched_numeric_id_keeps_suggestions_and_skips_lookup() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "an", vec![anna()]);

    let outcome = controller.on_filter_changed(0, "99").expect("row");

    assert_eq!(outcome, FilterOutcome::Unmatched("99".to_string()));
    let row = controller.row(0).expect("row");
    assert_eq!(row.visible_text(), "99");
    assert_eq!(row.hidden_id(), None);
    assert_eq!(row.suggestions(), &[anna()]);
}

#[test]
fn typing_over_a_selection_drops_the_id() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "an", vec![anna()]);
    controller.on_filter_changed(0, "7").expect("row");

    let ticket = expect_ticket(controller.on_filter_changed(0, "Anna B").expect("row"));

    assert_eq!(ticket.filter, "Anna B");
    assert_eq!(controller.row(0).expect("row").hidden_id(), None);
}

#[test]
fn lookup_replaces_previous_suggestions() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "bo", vec![StudentSummary::new(3, "Boris")]);

    let ticket = expect_ticket(controller.on_filter_changed(0, "an").expect("row"));
    assert_eq!(ticket.filter, "an");
    let applied = controller.apply_lookup(&ticket, Ok(vec![anna()]));

    assert_eq!(applied, Ok(LookupApplied::Updated(1)));
    assert_eq!(controller.row(0).expect("row").suggestions(), &[anna()]);
}

#[test]
fn older_lookup_cannot_overwrite_newer_one() {
    let mut controller = roster(1);
    let slow = expect_ticket(controller.on_filter_changed(0, "an").expect("row"));
    let fast = expect_ticket(controller.on_filter_changed(0, "ann").expect("row"));

    assert_eq!(
        controller.apply_lookup(&fast, Ok(vec![anna()])),
        Ok(LookupApplied::Updated(1))
    );
    assert_eq!(
        controller.apply_lookup(&slow, Ok(vec![anna(), andrey()])),
        Ok(LookupApplied::Stale)
    );
    assert_eq!(controller.row(0).expect("row").suggestions(), &[anna()]);
}

#[test]
fn lookup_landing_after_clear_is_discarded() {
    let mut controller = roster(1);
    let ticket = expect_ticket(controller.on_filter_changed(0, "an").expect("row"));
    controller.on_filter_changed(0, "").expect("row");

    assert_eq!(
        controller.apply_lookup(&ticket, Ok(vec![anna()])),
        Ok(LookupApplied::Stale)
    );
    assert!(controller.row(0).expect("row").suggestions().is_empty());
}

#[test]
fn failed_lookup_keeps_stale_suggestions() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "an", vec![anna()]);
    let ticket = expect_ticket(controller.on_filter_changed(0, "ann").expect("row"));

    let applied = controller.apply_lookup(&ticket, Err(LookupError::Status { status: 500 }));

    assert_eq!(applied, Ok(LookupApplied::Failed));
    assert_eq!(controller.row(0).expect("row").suggestions(), &[anna()]);
}

#[test]
fn suggestion_pick_reports_entry_without_touching_row() {
    let mut controller = roster(1);
    seed(&mut controller, 0, "an", vec![anna(), andrey()]);
    let before = controller.row(0).expect("row").clone();

    let picked = controller.on_suggestion_picked(0, "7").expect("row");

    assert_eq!(picked, Some(anna()));
    assert_eq!(controller.row(0).expect("row"), &before);
    assert_eq!(controller.on_suggestion_picked(0, "Anna").expect("row"), None);
}

#[test]
fn unknown_rows_fail_the_interaction_only() {
    let mut controller = roster(2);
    assert_eq!(
        controller.on_filter_changed(5, "an"),
        Err(RosterError::UnknownRow(5))
    );
    assert_eq!(
        controller.row_index("N-0009"),
        Err(RosterError::UnknownField("N-0009".to_string()))
    );
    assert_eq!(controller.row_index("N-0002"), Ok(1));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let fields = ["N-0001", "N-0002", "N-0001"]
        .into_iter()
        .map(|raw| FieldName::parse(raw).expect("valid"));
    let err = RosterController::new(fields, ControllerConfig::default()).expect_err("must fail");
    assert_eq!(err, RosterError::DuplicateField("N-0001".to_string()));
}

#[test]
fn trailing_empty_row_after_filled_rows_stays_visible() {
    let mut controller = roster(3);
    controller.on_filter_changed(0, "Anna").expect("row");
    controller.on_filter_changed(1, "Boris").expect("row");

    assert!(controller.recompute_visibility().is_empty());
}

#[test]
fn trailing_run_of_empty_rows_is_hidden() {
    let mut controller = roster(5);
    controller.on_filter_changed(0, "x").expect("row");

    assert_eq!(controller.hidden_rows(), vec![2, 3, 4]);
    assert!(!controller.row(1).expect("row").is_hidden());
}

#[test]
fn empty_roster_shows_only_first_row() {
    let controller = roster(4);
    assert_eq!(controller.hidden_rows(), vec![1, 2, 3]);
    assert!(roster(1).hidden_rows().is_empty());
    assert!(roster(0).hidden_rows().is_empty());
}

#[test]
fn whitespace_only_rows_count_as_empty() {
    let mut controller = roster(3);
    controller.on_filter_changed(0, "Anna").expect("row");
    controller.on_filter_changed(1, "   ").expect("row");

    assert_eq!(controller.hidden_rows(), vec![2]);
}

#[test]
fn filling_last_row_reveals_rows_above() {
    let mut controller = roster(4);
    controller.on_filter_changed(3, "an").expect("row");
    assert!(controller.hidden_rows().is_empty());

    controller.on_filter_changed(3, "").expect("row");
    assert_eq!(controller.hidden_rows(), vec![1, 2, 3]);
}

#[test]
fn visibility_pass_is_idempotent() {
    let mut controller = roster(6);
    controller.on_filter_changed(0, "Anna").expect("row");
    controller.on_filter_changed(2, "Boris").expect("row");

    let first = controller.recompute_visibility();
    let second = controller.recompute_visibility();

    assert_eq!(first, vec![4, 5]);
    assert_eq!(first, second);
}

#[test]
fn form_fields_submit_hidden_ids_only() {
    let mut controller = roster(2);
    seed(&mut controller, 0, "an", vec![anna()]);
    controller.on_filter_changed(0, "7").expect("row");
    controller.on_filter_changed(1, "Boris").expect("row");

    assert_eq!(
        controller.form_fields(),
        vec![
            ("IN-0001".to_string(), "7".to_string()),
            ("IN-0002".to_string(), String::new()),
        ]
    );
}
