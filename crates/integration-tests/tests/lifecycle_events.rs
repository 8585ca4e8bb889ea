//! Integration tests for entity lifecycle notifications and checkout
//! request building.

use chrono::Utc;

use dandeline_core::{
    LeadId, LeadStatus, NotificationType, QuoteRequestId, QuoteServiceType, QuoteStatus,
};
use dandeline_server::models::{Lead, QuoteRequest};
use dandeline_server::services::events::{DomainEvent, notification_for};
use dandeline_server::services::resolve_relations;
use dandeline_server::stripe::{CreateCheckoutSession, SessionLineItemInput};

fn lead(status: LeadStatus) -> Lead {
    Lead {
        id: LeadId::new(12),
        name: "Noa Fischer".to_string(),
        email: "noa@example.com".to_string(),
        phone_number: None,
        company: Some("Fischer & Co".to_string()),
        status,
        source: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn lead_status_change_yields_exactly_one_notification() {
    let event = DomainEvent::LeadStatusChanged {
        lead: lead(LeadStatus::Qualified),
        previous: LeadStatus::New,
    };

    let notification = notification_for(&event).expect("status change notifies");
    assert_eq!(notification.kind, NotificationType::Primary);
    assert!(notification.message.contains("Noa Fischer"));
    assert!(notification.message.contains("qualified"));
    assert_eq!(notification.action_url.as_deref(), Some("/admin/leads/12"));
}

#[test]
fn quote_request_submission_notifies_admins() {
    let event = DomainEvent::QuoteRequestCreated {
        quote: QuoteRequest {
            id: QuoteRequestId::new(4),
            name: "Iris Tan".to_string(),
            email: "iris@example.com".to_string(),
            phone_number: None,
            service_type: QuoteServiceType::Both,
            event_date: None,
            event_location: Some("Botanic Gardens".to_string()),
            guest_count: Some(120),
            budget: None,
            description: "Full wedding florals".to_string(),
            status: QuoteStatus::Pending,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
    };

    let notification = notification_for(&event).expect("submission notifies");
    assert_eq!(notification.kind, NotificationType::Success);
    assert_eq!(notification.title, "New Quote Request");
}

#[test]
fn relation_requests_intersect_against_allow_list() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Rel {
        Prices,
        Category,
        Orders,
    }

    let allowed = [Rel::Prices, Rel::Category];

    // None -> the full default set
    assert_eq!(resolve_relations(None, &allowed), vec![Rel::Prices, Rel::Category]);

    // Disallowed names are dropped silently
    assert_eq!(
        resolve_relations(Some(&[Rel::Orders, Rel::Category]), &allowed),
        vec![Rel::Category]
    );
}

#[test]
fn checkout_request_carries_every_cart_item_and_option() {
    let request = CreateCheckoutSession {
        line_items: vec![
            SessionLineItemInput {
                price: "price_A".to_string(),
                quantity: 2,
            },
            SessionLineItemInput {
                price: "price_B".to_string(),
                quantity: 5,
            },
        ],
        success_url: "https://dandelinedesigns.com/checkout/success?session_id={CHECKOUT_SESSION_ID}"
            .to_string(),
        cancel_url: "https://dandelinedesigns.com".to_string(),
        collect_shipping_address: true,
        collect_phone_number: true,
        always_create_customer: true,
        metadata: vec![("source".to_string(), "website_store".to_string())],
        shipping_rates: vec![],
    };

    let form = request.to_form();

    // All requested line items appear in the session request
    assert!(form.contains(&("line_items[0][price]".to_string(), "price_A".to_string())));
    assert!(form.contains(&("line_items[0][quantity]".to_string(), "2".to_string())));
    assert!(form.contains(&("line_items[1][price]".to_string(), "price_B".to_string())));
    assert!(form.contains(&("line_items[1][quantity]".to_string(), "5".to_string())));

    // Checkout directives ride along
    assert!(form.contains(&("customer_creation".to_string(), "always".to_string())));
    assert!(form.contains(&(
        "phone_number_collection[enabled]".to_string(),
        "true".to_string()
    )));
    assert!(form.iter().any(|(k, v)| k == "success_url" && v.contains("{CHECKOUT_SESSION_ID}")));

    // No shipping rates fetched -> the field is omitted entirely
    assert!(!form.iter().any(|(k, _)| k.starts_with("shipping_options")));
}
