//! Entity lifecycle events and their side effects.
//!
//! Services emit a [`DomainEvent`] at the end of each mutating operation
//! that has side effects; the [`EventDispatcher`] runs the listeners:
//! creating in-app notifications and queueing transactional emails. The
//! event and its consumers are explicit in the call path (no framework
//! observer magic).
//!
//! Side effects are best-effort: a failed notification insert or email
//! send is logged and never rolls back the mutation that triggered it.

use sqlx::PgPool;

use dandeline_core::{LeadStatus, NotificationType, OrderStatus};

use crate::db::NotificationRepository;
use crate::models::{ContactMessage, Lead, NewNotification, Order, QuoteRequest};

use super::EmailService;

/// An entity lifecycle event with notification/email side effects.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A lead's pipeline status changed.
    LeadStatusChanged {
        lead: Lead,
        previous: LeadStatus,
    },
    /// A quote request was submitted.
    QuoteRequestCreated { quote: QuoteRequest },
    /// A contact message was submitted.
    ContactMessageCreated { message: ContactMessage },
    /// An order was materialized.
    OrderCreated { order: Order },
    /// An order's fulfillment status changed.
    OrderStatusChanged {
        order: Order,
        previous: OrderStatus,
    },
}

/// The in-app notification an event produces, if any.
///
/// Pure mapping so the notification content is testable without a store.
#[must_use]
pub fn notification_for(event: &DomainEvent) -> Option<NewNotification> {
    match event {
        DomainEvent::LeadStatusChanged { lead, .. } => Some(NewNotification {
            kind: NotificationType::Primary,
            title: "Lead Status Updated".to_string(),
            message: format!("Lead {} status updated to {}", lead.name, lead.status),
            action_url: Some(format!("/admin/leads/{}", lead.id)),
            action_text: Some("View Lead".to_string()),
        }),
        DomainEvent::QuoteRequestCreated { quote } => Some(NewNotification {
            kind: NotificationType::Success,
            title: "New Quote Request".to_string(),
            message: format!("A new quote request has been submitted by {}", quote.name),
            action_url: Some("/admin/quotes".to_string()),
            action_text: Some("View Quotes".to_string()),
        }),
        DomainEvent::ContactMessageCreated { message } => Some(NewNotification {
            kind: NotificationType::Info,
            title: "New Contact Message".to_string(),
            message: format!("A new contact message has been received from {}", message.name),
            action_url: Some("/admin/messages".to_string()),
            action_text: Some("View Messages".to_string()),
        }),
        DomainEvent::OrderCreated { .. } | DomainEvent::OrderStatusChanged { .. } => None,
    }
}

/// Dispatches domain events to their listeners.
#[derive(Clone)]
pub struct EventDispatcher {
    pool: PgPool,
    mailer: Option<EmailService>,
}

impl EventDispatcher {
    /// Create a new dispatcher. With no mailer, email side effects are
    /// skipped (notifications still fire).
    #[must_use]
    pub const fn new(pool: PgPool, mailer: Option<EmailService>) -> Self {
        Self { pool, mailer }
    }

    /// Run the listeners for an event.
    ///
    /// Never fails: each side effect catches and logs its own errors.
    pub async fn dispatch(&self, event: DomainEvent) {
        self.create_notification(&event).await;
        self.queue_email(event);
    }

    /// Listener: record the in-app notification, if the event has one.
    async fn create_notification(&self, event: &DomainEvent) {
        let Some(fields) = notification_for(event) else {
            return;
        };

        let title = fields.title.clone();
        if let Err(e) = NotificationRepository::new(&self.pool).store(fields).await {
            tracing::error!(error = %e, title = %title, "Failed to create notification");
        }
    }

    /// Listener: queue the event's transactional email, fire-and-forget.
    fn queue_email(&self, event: DomainEvent) {
        let Some(mailer) = self.mailer.clone() else {
            return;
        };

        tokio::spawn(async move {
            let result = match &event {
                DomainEvent::OrderCreated { order } => {
                    mailer.send_order_confirmation(order).await
                }
                DomainEvent::OrderStatusChanged { order, previous } => {
                    mailer.send_order_status_update(order, *previous).await
                }
                DomainEvent::QuoteRequestCreated { quote } => {
                    mailer.send_quote_request_confirmation(quote).await
                }
                DomainEvent::ContactMessageCreated { message } => {
                    mailer.send_contact_confirmation(message).await
                }
                DomainEvent::LeadStatusChanged { .. } => Ok(()),
            };

            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to send event email");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dandeline_core::{LeadId, QuoteRequestId, QuoteServiceType, QuoteStatus};

    fn sample_lead(status: LeadStatus) -> Lead {
        Lead {
            id: LeadId::new(7),
            name: "Avery Chen".to_string(),
            email: "avery@example.com".to_string(),
            phone_number: None,
            company: None,
            status,
            source: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_lead_status_change_notification() {
        let event = DomainEvent::LeadStatusChanged {
            lead: sample_lead(LeadStatus::Qualified),
            previous: LeadStatus::New,
        };

        let notification = notification_for(&event).expect("lead event notifies");
        assert_eq!(notification.kind, NotificationType::Primary);
        assert_eq!(notification.title, "Lead Status Updated");
        assert!(notification.message.contains("Avery Chen"));
        assert!(notification.message.contains("qualified"));
        assert_eq!(notification.action_url.as_deref(), Some("/admin/leads/7"));
    }

    #[test]
    fn test_quote_request_notification() {
        let event = DomainEvent::QuoteRequestCreated {
            quote: QuoteRequest {
                id: QuoteRequestId::new(1),
                name: "Jordan Lee".to_string(),
                email: "jordan@example.com".to_string(),
                phone_number: None,
                service_type: QuoteServiceType::FloralDesign,
                event_date: None,
                event_location: None,
                guest_count: None,
                budget: None,
                description: "Wedding flowers".to_string(),
                status: QuoteStatus::Pending,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };

        let notification = notification_for(&event).expect("quote event notifies");
        assert_eq!(notification.kind, NotificationType::Success);
        assert!(notification.message.contains("Jordan Lee"));
    }

    #[test]
    fn test_contact_message_notification() {
        let event = DomainEvent::ContactMessageCreated {
            message: ContactMessage {
                id: dandeline_core::ContactMessageId::new(3),
                name: "Sam Ortiz".to_string(),
                business_name: None,
                email: "sam@example.com".to_string(),
                phone_number: None,
                subject: None,
                message: "Do you deliver on Sundays?".to_string(),
                is_read: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };

        let notification = notification_for(&event).expect("contact event notifies");
        assert_eq!(notification.kind, NotificationType::Info);
        assert!(notification.message.contains("Sam Ortiz"));
        assert_eq!(notification.action_url.as_deref(), Some("/admin/messages"));
    }
}
