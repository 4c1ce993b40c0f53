use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    // Lower priority numbers run first; rules without a priority run last
    // in declaration order.
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::current_event(
            "status",
            "DE_STATUS",
            RuleValueType::Text,
        ))
        .rule("footer", |r| {
            r.when("true")
                .action(RuleAction::display_text("", "'checked'"))
        })
        .rule("referral", |r| {
            r.priority(10)
                .when("#{status} == 'referred'")
                .action(RuleAction::display_text("", "'needs follow-up'"))
        })
        .rule("closed", |r| {
            r.priority(0)
                .when("#{status} == 'closed'")
                .action(RuleAction::hide_field("DE_FOLLOW_UP"))
        })
        .build();

    println!("Execution order: {:?}", context.execution_order());

    let engine = RuleEngine::builder(Arc::new(context)).build();
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");

    for status in ["closed", "referred", "new"] {
        let event = RuleEvent::new(status, "stage", date).data_value("DE_STATUS", status);
        let effects = engine
            .evaluate_event(&event)
            .expect("event has an identifier")
            .run();
        let rendered: Vec<String> = effects.iter().map(ToString::to_string).collect();
        println!("{status}: {rendered:?}");
    }
}
