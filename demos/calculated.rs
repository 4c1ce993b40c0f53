use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    RuleAction, RuleEngine, RuleEngineContext, RuleEnrollment, RuleEvent, RuleValueType,
    RuleVariable,
};

fn main() {
    // One rule computes a value, later rules read it.
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::newest_event(
            "score",
            "DE_SCORE",
            RuleValueType::Numeric,
        ))
        .variable(RuleVariable::calculated("positive", RuleValueType::Numeric))
        .rule("count_positive", |r| {
            r.priority(1)
                .when("true")
                .action(RuleAction::assign_variable(
                    "#{positive}",
                    "d2:countIfZeroPos(#{score})",
                ))
        })
        .rule("report", |r| {
            r.priority(2)
                .when("#{positive} > 1")
                .action(RuleAction::display_text("Non-negative scores: ", "#{positive}"))
        })
        .build();

    let date = |day| NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date");
    let engine = RuleEngine::builder(Arc::new(context))
        .events([
            RuleEvent::new("a", "visit", date(1)).data_value("DE_SCORE", "0"),
            RuleEvent::new("b", "visit", date(8)).data_value("DE_SCORE", "-1"),
            RuleEvent::new("c", "visit", date(15)).data_value("DE_SCORE", "2"),
        ])
        .build();

    let execution = engine
        .evaluate_enrollment(&RuleEnrollment::new("enrollment", date(1)))
        .expect("enrollment has an identifier");
    for effect in execution.run() {
        println!("{}: {}", effect.action().kind(), effect.data());
    }
}
