use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use program_rules::{
    RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    let context = Arc::new(
        RuleEngineContext::builder()
            .variable(RuleVariable::current_event(
                "age",
                "DE_AGE",
                RuleValueType::Numeric,
            ))
            .rule("adult", |r| {
                r.priority(1)
                    .when("#{age} >= 18")
                    .action(RuleAction::display_text("Adult: ", "#{age}"))
            })
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ctx = Arc::clone(&context);
            thread::spawn(move || {
                let age = 16 + i;
                let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
                let event = RuleEvent::new(format!("event-{i}"), "stage", date)
                    .data_value("DE_AGE", age.to_string());

                let engine = RuleEngine::builder(ctx).build();
                let effects = engine
                    .evaluate_event(&event)
                    .expect("event has an identifier")
                    .run();
                println!("Thread {i}: {effects:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
