use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    EngineError, RuleAction, RuleEffect, RuleEngine, RuleEngineContext, RuleEnrollment,
    RuleEvent, RuleValueType, RuleVariable, TriggerEnvironment,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
}

fn any_event() -> RuleEvent {
    RuleEvent::new("event-1", "stage-1", date(10))
}

fn run_event(context: RuleEngineContext, event: &RuleEvent) -> Vec<RuleEffect> {
    RuleEngine::builder(Arc::new(context))
        .build()
        .evaluate_event(event)
        .unwrap()
        .run()
}

fn payloads(effects: &[RuleEffect]) -> Vec<&str> {
    effects.iter().map(RuleEffect::data).collect()
}

#[test]
fn single_true_rule_yields_literal() {
    let context = RuleEngineContext::builder()
        .rule("hello", |r| {
            r.priority(1)
                .when("true")
                .action(RuleAction::display_text("", "'hello'"))
        })
        .build();
    let effects = run_event(context, &any_event());
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].data(), "hello");
}

#[test]
fn calculated_variable_flows_to_next_rule() {
    let context = RuleEngineContext::builder()
        .rule("reader", |r| {
            r.priority(2)
                .when("true")
                .action(RuleAction::display_text("X is ", "#{X}"))
        })
        .rule("writer", |r| {
            r.priority(1)
                .when("true")
                .action(RuleAction::assign_variable("#{X}", "'5'"))
        })
        .build();
    let effects = run_event(context, &any_event());
    assert_eq!(payloads(&effects), ["5"]);
}

#[test]
fn empty_condition_produces_nothing() {
    let context = RuleEngineContext::builder()
        .rule("silent", |r| {
            r.priority(1)
                .action(RuleAction::display_text("", "'never'"))
        })
        .build();
    assert!(run_event(context, &any_event()).is_empty());
}

#[test]
fn malformed_condition_is_skipped() {
    let context = RuleEngineContext::builder()
        .rule("broken", |r| {
            r.priority(1)
                .when("#{weight} > (")
                .action(RuleAction::display_text("", "'broken'"))
        })
        .rule("fine", |r| {
            r.priority(2)
                .when("1 < 2")
                .action(RuleAction::display_text("", "'fine'"))
        })
        .build();
    assert_eq!(payloads(&run_event(context, &any_event())), ["fine"]);
}

#[test]
fn whole_number_renders_without_fraction() {
    let context = RuleEngineContext::builder()
        .rule("four", |r| {
            r.priority(1)
                .when("true")
                .action(RuleAction::display_text("", "2.0 * 2"))
        })
        .build();
    assert_eq!(payloads(&run_event(context, &any_event())), ["4"]);
}

#[test]
fn count_if_zero_pos_over_sibling_events() {
    let context = Arc::new(
        RuleEngineContext::builder()
            .variable(RuleVariable::newest_event(
                "score",
                "DE_SCORE",
                RuleValueType::Numeric,
            ))
            .rule("count", |r| {
                r.priority(1)
                    .when("true")
                    .action(RuleAction::display_text("", "d2:countIfZeroPos(#{score})"))
                    .action(RuleAction::display_text("", "d2:countIfZeroPos(#{unknown})"))
            })
            .build(),
    );
    let engine = RuleEngine::builder(context)
        .events([
            RuleEvent::new("a", "s", date(1)).data_value("DE_SCORE", "0"),
            RuleEvent::new("b", "s", date(2)).data_value("DE_SCORE", "-1"),
            RuleEvent::new("c", "s", date(3)).data_value("DE_SCORE", "2"),
        ])
        .build();
    let effects = engine
        .evaluate_enrollment(&RuleEnrollment::new("en", date(1)))
        .unwrap()
        .run();
    assert_eq!(payloads(&effects), ["2", "0"]);
}

#[test]
fn non_numeric_candidate_degrades_to_empty() {
    let context = Arc::new(
        RuleEngineContext::builder()
            .variable(RuleVariable::newest_event(
                "score",
                "DE_SCORE",
                RuleValueType::Numeric,
            ))
            .rule("count", |r| {
                r.priority(1)
                    .when("true")
                    .action(RuleAction::display_text("", "d2:countIfZeroPos(#{score})"))
                    .action(RuleAction::display_text("", "'next'"))
            })
            .build(),
    );
    let engine = RuleEngine::builder(context)
        .events([RuleEvent::new("a", "s", date(1)).data_value("DE_SCORE", "n/a")])
        .build();
    let effects = engine
        .evaluate_enrollment(&RuleEnrollment::new("en", date(1)))
        .unwrap()
        .run();
    assert_eq!(payloads(&effects), ["", "next"]);
}

fn android_context(version: &str) -> RuleEngineContext {
    RuleEngineContext::builder()
        .supplementary("android_version", [version])
        .rule("keyword", |r| {
            r.priority(1)
                .when("true and true")
                .action(RuleAction::display_text("", "'modern'"))
        })
        .rule("symbolic", |r| {
            r.priority(2)
                .when("true && true")
                .action(RuleAction::display_text("", "'legacy-safe'"))
        })
        .build()
}

fn run_android(version: &str) -> Vec<RuleEffect> {
    RuleEngine::builder(Arc::new(android_context(version)))
        .trigger_environment(TriggerEnvironment::AndroidClient)
        .build()
        .evaluate_event(&any_event())
        .unwrap()
        .run()
}

#[test]
fn old_android_client_uses_legacy_mode() {
    assert_eq!(payloads(&run_android("19")), ["legacy-safe"]);
}

#[test]
fn current_android_client_uses_full_syntax() {
    assert_eq!(payloads(&run_android("21")), ["modern", "legacy-safe"]);
}

#[test]
fn web_client_ignores_android_version() {
    let effects = RuleEngine::builder(Arc::new(android_context("19")))
        .trigger_environment(TriggerEnvironment::WebClient)
        .build()
        .evaluate_event(&any_event())
        .unwrap()
        .run();
    assert_eq!(payloads(&effects), ["modern", "legacy-safe"]);
}

#[test]
fn assign_to_field_emits_effect() {
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::current_event(
            "height",
            "DE_HEIGHT",
            RuleValueType::Numeric,
        ))
        .rule("double", |r| {
            r.priority(1)
                .when("#{height} > 0")
                .action(RuleAction::assign("DE_DOUBLE", "", "#{height} * 2").unwrap())
        })
        .build();
    let event = any_event().data_value("DE_HEIGHT", "80");
    let effects = run_event(context, &event);
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].data(), "160");
    assert!(matches!(
        effects[0].action(),
        RuleAction::Assign { field, .. } if field == "DE_DOUBLE"
    ));
}

#[test]
fn environment_variables_are_readable() {
    let context = RuleEngineContext::builder()
        .rule("ids", |r| {
            r.priority(1)
                .when("V{event_id} == 'event-1'")
                .action(RuleAction::display_text("", "V{program_stage_id}"))
                .action(RuleAction::display_text("", "V{event_date}"))
        })
        .build();
    assert_eq!(
        payloads(&run_event(context, &any_event())),
        ["stage-1", "2024-04-10"]
    );
}

#[test]
fn constants_are_numeric() {
    let context = RuleEngineContext::builder()
        .constant("limit", "10")
        .rule("over", |r| {
            r.priority(1)
                .when("C{limit} > 9")
                .action(RuleAction::display_text("", "C{limit} + 1"))
        })
        .build();
    assert_eq!(payloads(&run_event(context, &any_event())), ["11"]);
}

#[test]
fn blank_targets_are_rejected_before_evaluation() {
    let engine = RuleEngine::builder(Arc::new(RuleEngineContext::builder().build())).build();
    let event = RuleEvent::new("", "stage", date(1));
    let err = engine.evaluate_event(&event).unwrap_err();
    assert!(matches!(err, EngineError::MissingTarget { target: "event" }));
    let enrollment = RuleEnrollment::new(" ", date(1));
    assert!(engine.evaluate_enrollment(&enrollment).is_err());
}

#[test]
fn no_rules_no_effects() {
    let context = RuleEngineContext::builder().build();
    assert!(run_event(context, &any_event()).is_empty());
}

#[test]
fn action_constructors_reject_empty_messages() {
    assert!(RuleAction::show_warning("", "", "").is_err());
    assert!(RuleAction::show_error("Too heavy", "", "").is_ok());
    assert!(RuleAction::assign("", "", "1").is_err());
}

#[test]
fn deeply_nested_condition_is_skipped() {
    let depth = 10_000;
    let condition = format!("{}true{}", "(".repeat(depth), ")".repeat(depth));
    let context = RuleEngineContext::builder()
        .rule("deep", |r| {
            r.priority(1)
                .when(&condition)
                .action(RuleAction::display_text("", "'deep'"))
        })
        .rule("shallow", |r| {
            r.priority(2)
                .when("true")
                .action(RuleAction::display_text("", "'shallow'"))
        })
        .build();
    assert_eq!(payloads(&run_event(context, &any_event())), ["shallow"]);
}

#[test]
fn deeply_nested_action_data_renders_empty() {
    let data = format!("{}1{}", "d2:floor(".repeat(5_000), ")".repeat(5_000));
    let chain = vec!["1"; 5_000].join(" + ");
    let context = RuleEngineContext::builder()
        .rule("deep", |r| {
            r.priority(1)
                .when("true")
                .action(RuleAction::display_text("", data.as_str()))
                .action(RuleAction::display_text("", chain.as_str()))
                .action(RuleAction::display_text("", "1 + 1"))
        })
        .build();
    assert_eq!(payloads(&run_event(context, &any_event())), ["", "", "2"]);
}
