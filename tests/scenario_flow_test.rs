//! Scenario flow integration tests
//!
//! Walks the checkout and admin conversations through the scenario
//! manager, including rejected transitions and input validation.

use BazarBot::state::{ConversationContext, ScenarioManager};

#[test]
fn checkout_walks_name_phone_address_confirmation() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(1001);

    manager.start_scenario(&mut context, "checkout").unwrap();
    assert!(context.is_at("checkout", "name_input"));

    context.set_data("name", "Alisher Usmonov").unwrap();
    manager.next_step(&mut context, "phone_input").unwrap();

    context.set_data("phone", "+998901234567").unwrap();
    manager.next_step(&mut context, "address_input").unwrap();

    context.set_data("address", "Tashkent, Chilonzor 5").unwrap();
    manager.next_step(&mut context, "confirmation").unwrap();

    assert!(context.is_at("checkout", "confirmation"));
    assert_eq!(context.get_string("name"), Some("Alisher Usmonov".to_string()));
    assert_eq!(context.get_string("phone"), Some("+998901234567".to_string()));
    assert_eq!(context.get_string("address"), Some("Tashkent, Chilonzor 5".to_string()));
}

#[test]
fn checkout_rejects_skipping_ahead() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(1002);

    manager.start_scenario(&mut context, "checkout").unwrap();

    assert!(manager.next_step(&mut context, "address_input").is_err());
    assert!(manager.next_step(&mut context, "confirmation").is_err());
    // The failed transitions must not move the context
    assert!(context.is_at("checkout", "name_input"));
}

#[test]
fn checkout_validates_each_input() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(1003);

    manager.start_scenario(&mut context, "checkout").unwrap();
    assert!(manager.validate_input(&context, "A").is_err());
    assert!(manager.validate_input(&context, "Alisher").is_ok());

    manager.next_step(&mut context, "phone_input").unwrap();
    assert!(manager.validate_input(&context, "hello").is_err());
    assert!(manager.validate_input(&context, "+998 90 123 45 67").is_ok());

    manager.next_step(&mut context, "address_input").unwrap();
    assert!(manager.validate_input(&context, "x").is_err());
    assert!(manager.validate_input(&context, "Tashkent, Chilonzor 5").is_ok());
}

#[test]
fn add_product_collects_all_fields() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(2001);

    manager.start_scenario(&mut context, "add_product").unwrap();
    assert!(context.is_at("add_product", "name_input"));

    manager.next_step(&mut context, "price_input").unwrap();
    assert!(manager.validate_input(&context, "150 000").is_ok());
    assert!(manager.validate_input(&context, "-5").is_err());

    manager.next_step(&mut context, "description_input").unwrap();
    manager.next_step(&mut context, "image_input").unwrap();
    assert!(manager.validate_input(&context, "https://example.com/a.jpg").is_ok());
    assert!(manager.validate_input(&context, "not a url").is_err());

    manager.next_step(&mut context, "category_input").unwrap();
    manager.next_step(&mut context, "confirmation").unwrap();
    assert!(context.is_at("add_product", "confirmation"));
}

#[test]
fn completed_scenario_clears_context() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(3001);

    manager.start_scenario(&mut context, "edit_product").unwrap();
    context.set_data("product_id", 7i64).unwrap();
    context.set_data("field", "price").unwrap();

    context.complete_scenario();

    assert!(context.scenario.is_none());
    assert!(context.step.is_none());
    assert!(context.data.is_empty());
}
