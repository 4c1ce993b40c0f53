use program_rules::{RuleAction, RuleEngineContext, RuleValueType, RuleVariable};

fn main() {
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::current_event(
            "weight",
            "DE_WEIGHT",
            RuleValueType::Numeric,
        ))
        .rule("ok", |r| {
            r.priority(1)
                .when("#{weight} > 90")
                .action(RuleAction::display_text("", "#{weight} * 2"))
        })
        .rule("typo", |r| {
            r.priority(2)
                .when("#{wieght} > 90")
                .action(RuleAction::display_text("", "'never'"))
        })
        .build();

    println!("#{{weight}} * 2 is {:?}", context.describe("#{weight} * 2"));

    match context.validate() {
        Ok(()) => println!("All expressions are valid."),
        Err((expression, err)) => println!("Invalid expression '{expression}': {err}"),
    }
}
