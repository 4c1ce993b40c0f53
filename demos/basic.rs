use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    // Define rules
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::current_event(
            "weight",
            "DE_WEIGHT",
            RuleValueType::Numeric,
        ))
        .rule("heavy", |r| {
            r.priority(1)
                .when("#{weight} > 90")
                .action(RuleAction::display_text("Weight above 90: ", "#{weight}"))
        })
        .rule("greeting", |r| {
            r.when("true")
                .action(RuleAction::display_text("", "'hello'"))
        })
        .build();

    println!("{context}");

    // Evaluate one event
    let engine = RuleEngine::builder(Arc::new(context)).build();
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
    let event = RuleEvent::new("event-1", "stage-1", date).data_value("DE_WEIGHT", "95");

    let effects = engine
        .evaluate_event(&event)
        .expect("event has an identifier")
        .run();
    for effect in &effects {
        println!("Effect: {effect}");
    }
}
