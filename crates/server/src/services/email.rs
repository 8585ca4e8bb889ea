//! Email service for transactional customer mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Sends are
//! best-effort: callers queue them fire-and-forget and log failures; a
//! failed email never rolls back the mutation that triggered it.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use dandeline_core::OrderStatus;

use crate::config::EmailConfig;
use crate::models::{ContactMessage, Order, QuoteRequest};

/// HTML template for order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    total: String,
    currency: &'a str,
}

/// Plain text template for order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    total: String,
    currency: &'a str,
}

/// HTML template for order status update email.
#[derive(Template)]
#[template(path = "email/order_status_update.html")]
struct OrderStatusUpdateHtml<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    previous_status: String,
    new_status: String,
}

/// Plain text template for order status update email.
#[derive(Template)]
#[template(path = "email/order_status_update.txt")]
struct OrderStatusUpdateText<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    previous_status: String,
    new_status: String,
}

/// HTML template for order shipped email.
#[derive(Template)]
#[template(path = "email/order_shipped.html")]
struct OrderShippedHtml<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    tracking_number: Option<&'a str>,
}

/// Plain text template for order shipped email.
#[derive(Template)]
#[template(path = "email/order_shipped.txt")]
struct OrderShippedText<'a> {
    customer_name: &'a str,
    order_number: &'a str,
    tracking_number: Option<&'a str>,
}

/// HTML template for quote request confirmation email.
#[derive(Template)]
#[template(path = "email/quote_request_confirmation.html")]
struct QuoteRequestConfirmationHtml<'a> {
    name: &'a str,
}

/// Plain text template for quote request confirmation email.
#[derive(Template)]
#[template(path = "email/quote_request_confirmation.txt")]
struct QuoteRequestConfirmationText<'a> {
    name: &'a str,
}

/// HTML template for contact form confirmation email.
#[derive(Template)]
#[template(path = "email/contact_confirmation.html")]
struct ContactConfirmationHtml<'a> {
    name: &'a str,
}

/// Plain text template for contact form confirmation email.
#[derive(Template)]
#[template(path = "email/contact_confirmation.txt")]
struct ContactConfirmationText<'a> {
    name: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the order confirmation email.
    ///
    /// Skips quietly when the order captured no customer email.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), EmailError> {
        let Some(to) = order.customer_email.as_deref() else {
            tracing::warn!(order_id = %order.id, "Cannot send order confirmation: no customer email");
            return Ok(());
        };

        let customer_name = order.customer_name();
        let html = OrderConfirmationHtml {
            customer_name: &customer_name,
            order_number: &order.order_number,
            total: format!("{:.2}", order.total_amount),
            currency: &order.currency,
        }
        .render()?;
        let text = OrderConfirmationText {
            customer_name: &customer_name,
            order_number: &order.order_number,
            total: format!("{:.2}", order.total_amount),
            currency: &order.currency,
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Order confirmation - {}", order.order_number),
            &text,
            &html,
        )
        .await
    }

    /// Send an order status update email.
    ///
    /// Transitions to `shipped` get the dedicated shipped template;
    /// transitions to statuses the customer is not notified about are
    /// suppressed entirely.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_order_status_update(
        &self,
        order: &Order,
        previous_status: OrderStatus,
    ) -> Result<(), EmailError> {
        let Some(to) = order.customer_email.as_deref() else {
            tracing::warn!(order_id = %order.id, "Cannot send status update: no customer email");
            return Ok(());
        };

        if order.status == OrderStatus::Shipped {
            return self.send_order_shipped(order).await;
        }

        if !order.status.notifies_customer() || order.status == previous_status {
            return Ok(());
        }

        let customer_name = order.customer_name();
        let html = OrderStatusUpdateHtml {
            customer_name: &customer_name,
            order_number: &order.order_number,
            previous_status: previous_status.to_string(),
            new_status: order.status.to_string(),
        }
        .render()?;
        let text = OrderStatusUpdateText {
            customer_name: &customer_name,
            order_number: &order.order_number,
            previous_status: previous_status.to_string(),
            new_status: order.status.to_string(),
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Order update - {}", order.order_number),
            &text,
            &html,
        )
        .await
    }

    /// Send the dedicated shipped email (with tracking number when known).
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_order_shipped(&self, order: &Order) -> Result<(), EmailError> {
        let Some(to) = order.customer_email.as_deref() else {
            tracing::warn!(order_id = %order.id, "Cannot send shipped email: no customer email");
            return Ok(());
        };

        let customer_name = order.customer_name();
        let html = OrderShippedHtml {
            customer_name: &customer_name,
            order_number: &order.order_number,
            tracking_number: order.tracking_number.as_deref(),
        }
        .render()?;
        let text = OrderShippedText {
            customer_name: &customer_name,
            order_number: &order.order_number,
            tracking_number: order.tracking_number.as_deref(),
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Your order has shipped - {}", order.order_number),
            &text,
            &html,
        )
        .await
    }

    /// Send the quote request confirmation email.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_quote_request_confirmation(
        &self,
        quote: &QuoteRequest,
    ) -> Result<(), EmailError> {
        let html = QuoteRequestConfirmationHtml { name: &quote.name }.render()?;
        let text = QuoteRequestConfirmationText { name: &quote.name }.render()?;

        self.send_multipart_email(&quote.email, "We received your quote request", &text, &html)
            .await
    }

    /// Send the contact form confirmation email.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_contact_confirmation(
        &self,
        message: &ContactMessage,
    ) -> Result<(), EmailError> {
        let html = ContactConfirmationHtml {
            name: &message.name,
        }
        .render()?;
        let text = ContactConfirmationText {
            name: &message.name,
        }
        .render()?;

        self.send_multipart_email(&message.email, "Thanks for getting in touch", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
