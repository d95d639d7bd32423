// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pricing, training-mode, and lookup-table behaviour.
//!
//! These pin down observed pricing exactly, including the Running price
//! shared by coach-assisted returning users and self-serve new users.

use program_signup::models::{
    ActivityType, ProgramKey, Segment, Selection, Track, TrainingMode, UserType,
};
use program_signup::services::{available_training_modes, resolve_cost};

mod common;

fn priced(activity: ActivityType, segment: Segment, user: UserType) -> u32 {
    resolve_cost(&Selection {
        activity_type: Some(activity),
        segment: Some(segment),
        user_type: Some(user),
        ..Default::default()
    })
}

#[test]
fn test_running_prices() {
    use ActivityType::Running;
    assert_eq!(priced(Running, Segment::CoachGuided, UserType::New), 60);
    assert_eq!(priced(Running, Segment::CoachGuided, UserType::Return), 35);
    assert_eq!(priced(Running, Segment::SelfServe, UserType::New), 35);
    assert_eq!(priced(Running, Segment::SelfServe, UserType::Return), 20);
}

#[test]
fn test_walking_prices_ignore_user_type() {
    for user in [UserType::New, UserType::Return] {
        assert_eq!(priced(ActivityType::Walking, Segment::CoachGuided, user), 30);
        assert_eq!(priced(ActivityType::Walking, Segment::SelfServe, user), 15);
    }
}

#[test]
fn test_other_activities_are_free() {
    for segment in [Segment::CoachGuided, Segment::SelfServe] {
        for user in [UserType::New, UserType::Return] {
            assert_eq!(priced(ActivityType::Masters, segment, user), 0);
        }
    }
    // No activity chosen yet
    let partial = Selection {
        segment: Some(Segment::CoachGuided),
        ..Default::default()
    };
    assert_eq!(resolve_cost(&partial), 0);
}

#[test]
fn test_training_modes() {
    for segment in [None, Some(Segment::CoachGuided), Some(Segment::SelfServe)] {
        assert_eq!(
            available_training_modes(Some(ActivityType::Walking), segment),
            &[TrainingMode::Std]
        );
    }

    let full = [TrainingMode::Std, TrainingMode::Exp, TrainingMode::Speed];
    let reduced = [TrainingMode::Std, TrainingMode::Exp];
    for activity in [None, Some(ActivityType::Running), Some(ActivityType::Masters)] {
        assert_eq!(
            available_training_modes(activity, Some(Segment::CoachGuided)),
            &full
        );
        assert_eq!(
            available_training_modes(activity, Some(Segment::SelfServe)),
            &reduced
        );
        assert_eq!(available_training_modes(activity, None), &reduced);
    }
}

#[test]
fn test_every_key_round_trips() {
    let catalog = common::catalog();
    assert!(!catalog.is_empty());

    for key in catalog.keys() {
        let expected = catalog.lookup(key).unwrap();
        assert_eq!(catalog.resolve_url(&key.to_selection()), Some(expected));

        // The rendered composite key parses back to the same entry.
        let reparsed: ProgramKey = key.to_string().parse().unwrap();
        assert_eq!(catalog.lookup(&reparsed), Some(expected));
    }
}

#[test]
fn test_absent_combination_is_not_found() {
    let catalog = common::catalog();

    // Self-serve programs have no Speed option
    let mismatched = ProgramKey {
        track: Track::Spring,
        segment: Segment::SelfServe,
        activity_type: ActivityType::Running,
        user_type: UserType::New,
        training_mode: TrainingMode::Speed,
    };
    assert_eq!(catalog.resolve_url(&mismatched.to_selection()), None);

    // Masters is not offered in summer
    let summer_masters = ProgramKey {
        track: Track::Summer,
        segment: Segment::CoachGuided,
        activity_type: ActivityType::Masters,
        user_type: UserType::New,
        training_mode: TrainingMode::Std,
    };
    assert_eq!(catalog.resolve_url(&summer_masters.to_selection()), None);

    // Incomplete selections never resolve
    assert_eq!(catalog.resolve_url(&Selection::default()), None);
}

#[test]
fn test_spring_coach_guided_new_runner() {
    let catalog = common::catalog();
    let selection = common::new_runner();

    assert_eq!(resolve_cost(&selection), 60);
    let url = catalog.resolve_url(&selection).unwrap();
    assert!(
        url.ends_with("/a01coach-guided-run-new-std"),
        "unexpected url {url}"
    );
}

#[test]
fn test_legacy_vocabulary_resolves_same_link() {
    let catalog = common::catalog();
    let legacy: Selection = serde_json::from_value(serde_json::json!({
        "track": "Spring",
        "segment": "Pro",
        "activityType": "Running",
        "userType": "New",
        "trainingMode": "Standard",
    }))
    .unwrap();

    assert_eq!(
        catalog.resolve_url(&legacy),
        catalog.resolve_url(&common::new_runner())
    );
}

#[test]
fn test_catalog_consistent_with_training_modes() {
    assert!(common::catalog().mismatched_keys().is_empty());
}

#[test]
fn test_program_listing_groups_by_track() {
    let catalog = common::catalog();
    let categories = catalog.programs();

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Spring", "Summer", "Fall"]);

    let total: usize = categories.iter().map(|c| c.programs.len()).sum();
    assert_eq!(total, catalog.len());

    let first = &categories[0].programs[0];
    assert!(first.url.ends_with("/a01coach-guided-run-new-std"));
    assert_eq!(first.description.as_deref(), Some("$60"));
    assert_eq!(first.category.as_deref(), Some("Spring"));
}
