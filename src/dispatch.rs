//! Interaction dispatcher
//!
//! Turns client-side UI events (button clicks, form submissions) into a
//! natural-language follow-up query for the generation loop.

use crate::protocol::{Message, Part};
use serde_json::{Map, Value};

/// Key of the data part carrying a UI event
const USER_ACTION_KEY: &str = "userAction";

/// Placeholder for the context fields the dispatcher reads by name
const UNKNOWN: &str = "Unknown";

/// Client UI event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionEvent {
    pub name: String,
    pub context: Map<String, Value>,
}

impl InteractionEvent {
    pub fn new(name: impl Into<String>, context: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            context,
        }
    }

    /// Read an event from a `userAction` value.
    ///
    /// Missing or mistyped fields fall back to an empty name or context;
    /// extra fields (surface id, timestamps) are ignored.
    pub fn from_value(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let context = value
            .get("context")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self::new(name, context)
    }

    fn context_field(&self, key: &str) -> String {
        match self.context.get(key) {
            None | Some(Value::Null) => UNKNOWN.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn context_json(&self) -> String {
        Value::Object(self.context.clone()).to_string()
    }
}

/// Map a UI event to the query text for the next turn. Never fails.
pub fn dispatch(event: &InteractionEvent) -> String {
    match event.name.as_str() {
        "cta_click" => "The user clicked the main CTA button. Acknowledge this and show a success \
                        message or a next step UI (like a sign-up form)."
            .to_string(),
        "submit_form" => format!(
            "User submitted form with data: {}. Confirm receipt and show a thank you message \
             or a success state.",
            event.context_json()
        ),
        "select_product" => format!(
            "User selected product: {}. Display detailed specifications and an 'Order Now' \
             button for this product.",
            event.context_field("product")
        ),
        "view_item" => format!(
            "User wants to view item with ID: {}. Generate a detailed item view.",
            event.context_field("itemId")
        ),
        "complete_wizard" => {
            "User completed the wizard. Show a celebration/completion UI with next steps."
                .to_string()
        }
        other => format!(
            "The user interacted with the UI element '{other}' with data {}. Respond \
             appropriately by updating the UI.",
            event.context_json()
        ),
    }
}

/// UI event carried by the message's data parts; the last one wins
pub fn find_interaction_event(message: &Message) -> Option<InteractionEvent> {
    message.parts.iter().rev().find_map(|part| match part {
        Part::Data { data, .. } => data.get(USER_ACTION_KEY).map(InteractionEvent::from_value),
        Part::Text { .. } => None,
    })
}

/// Query for the turn started by `message`.
///
/// A UI event wins over text; otherwise the text parts are joined with
/// newlines. `None` when the message has neither.
pub fn query_from_message(message: &Message) -> Option<String> {
    if let Some(event) = find_interaction_event(message) {
        tracing::info!(action = %event.name, "Received A2UI client event");
        return Some(dispatch(&event));
    }

    let text = message
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::Data { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Role;
    use proptest::prelude::*;
    use serde_json::json;

    fn event(name: &str, context: Value) -> InteractionEvent {
        InteractionEvent::new(name, context.as_object().cloned().unwrap_or_default())
    }

    fn message(parts: Vec<Part>) -> Message {
        Message {
            message_id: "m".into(),
            context_id: None,
            task_id: None,
            role: Role::User,
            parts,
        }
    }

    #[test]
    fn select_product_mentions_product() {
        let q = dispatch(&event("select_product", json!({"product": "Widget"})));
        assert!(q.contains("Widget"));
    }

    #[test]
    fn named_fields_default_to_unknown() {
        assert!(dispatch(&event("select_product", json!({}))).contains("product: Unknown."));
        assert!(dispatch(&event("view_item", json!({"other": 1}))).contains("ID: Unknown."));
        assert!(dispatch(&event("view_item", json!({"itemId": null}))).contains("ID: Unknown."));
    }

    #[test]
    fn non_string_fields_are_rendered_as_json() {
        assert!(dispatch(&event("view_item", json!({"itemId": 42}))).contains("ID: 42."));
    }

    #[test]
    fn submit_form_echoes_fields() {
        let q = dispatch(&event("submit_form", json!({"email": "a@b.c", "plan": "pro"})));
        assert!(q.contains(r#""email":"a@b.c""#));
        assert!(q.contains(r#""plan":"pro""#));
    }

    #[test]
    fn fixed_actions_have_fixed_queries() {
        assert!(dispatch(&event("cta_click", json!({"x": 1}))).contains("CTA button"));
        assert!(dispatch(&event("complete_wizard", json!({}))).contains("celebration"));
    }

    #[test]
    fn unknown_action_names_event_and_context() {
        let q = dispatch(&event("toggle_theme", json!({"dark": true})));
        assert!(q.contains("'toggle_theme'"));
        assert!(q.contains(r#"{"dark":true}"#));
    }

    #[test]
    fn lenient_event_parsing() {
        let e = InteractionEvent::from_value(&json!({"name": 5, "context": "nope"}));
        assert_eq!(e, InteractionEvent::default());
        assert!(!dispatch(&e).is_empty());
    }

    #[test]
    fn ui_event_wins_over_text() {
        let msg = message(vec![
            Part::text("ignored"),
            Part::Data {
                data: json!({"userAction": {"name": "select_product", "surfaceId": "s", "context": {"product": "Gizmo"}}}),
                metadata: None,
            },
        ]);
        let q = query_from_message(&msg).unwrap();
        assert!(q.contains("Gizmo"));
        assert!(!q.contains("ignored"));
    }

    #[test]
    fn last_ui_event_wins() {
        let action = |product: &str| Part::Data {
            data: json!({"userAction": {"name": "select_product", "context": {"product": product}}}),
            metadata: None,
        };
        let msg = message(vec![
            action("Gizmo"),
            Part::Data { data: json!({"other": 1}), metadata: None },
            action("Widget"),
            Part::Data { data: json!({"other": 2}), metadata: None },
        ]);
        assert_eq!(find_interaction_event(&msg).unwrap().context["product"], "Widget");
        let q = query_from_message(&msg).unwrap();
        assert!(q.contains("Widget"));
        assert!(!q.contains("Gizmo"));
    }

    #[test]
    fn data_without_user_action_is_skipped() {
        let msg = message(vec![
            Part::Data { data: json!({"other": 1}), metadata: None },
            Part::text("Create a headline"),
            Part::text("for a bakery"),
        ]);
        assert_eq!(query_from_message(&msg).as_deref(), Some("Create a headline\nfor a bakery"));
    }

    #[test]
    fn empty_message_has_no_query() {
        assert_eq!(query_from_message(&message(vec![])), None);
        assert_eq!(query_from_message(&message(vec![Part::text("  ")])), None);
    }

    fn arb_context() -> impl Strategy<Value = Map<String, Value>> {
        proptest::collection::btree_map(
            "[a-zA-Z]{1,8}",
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                ".{0,12}".prop_map(Value::from),
            ],
            0..5,
        )
        .prop_map(|m| m.into_iter().collect())
    }

    fn arb_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("cta_click".to_string()),
            Just("submit_form".to_string()),
            Just("select_product".to_string()),
            Just("view_item".to_string()),
            Just("complete_wizard".to_string()),
            ".{0,16}",
        ]
    }

    proptest! {
        #[test]
        fn dispatch_is_total(name in arb_name(), context in arb_context()) {
            let q = dispatch(&InteractionEvent::new(name, context));
            prop_assert!(!q.trim().is_empty());
        }

        #[test]
        fn product_always_mentioned(product in "[A-Za-z0-9 ]{1,20}") {
            let q = dispatch(&event("select_product", json!({"product": product.clone()})));
            prop_assert!(q.contains(&product));
        }
    }
}
