//! Order confirmation emails.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crafteo_core::order::Order;
use crafteo_core::types::{ShippingMethod, format_ars};

use crate::config::EmailConfig;

/// One rendered line of the order summary.
struct EmailLine {
    name: String,
    quantity: i32,
    total: String,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order_number: i64,
    customer_name: &'a str,
    lines: &'a [EmailLine],
    subtotal: String,
    shipping: String,
    total: String,
    shipping_method: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order_number: i64,
    customer_name: &'a str,
    lines: &'a [EmailLine],
    subtotal: String,
    shipping: String,
    total: String,
    shipping_method: &'a str,
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

/// Email service for transactional mail.
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
    /// Returns error if the SMTP transport cannot be built.
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

    /// Send the order confirmation email to the customer.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render or the send fails.
    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), EmailError> {
        let lines: Vec<EmailLine> = order
            .items
            .iter()
            .map(|item| EmailLine {
                name: item.name.clone(),
                quantity: item.quantity,
                total: format_ars(item.line_total()),
            })
            .collect();
        let shipping_method = shipping_method_label(order.shipping_method);

        let html = OrderConfirmationHtml {
            order_number: order.order_number,
            customer_name: &order.customer.name,
            lines: &lines,
            subtotal: format_ars(order.subtotal),
            shipping: format_ars(order.shipping_cost),
            total: format_ars(order.total),
            shipping_method,
        }
        .render()?;
        let text = OrderConfirmationText {
            order_number: order.order_number,
            customer_name: &order.customer.name,
            lines: &lines,
            subtotal: format_ars(order.subtotal),
            shipping: format_ars(order.shipping_cost),
            total: format_ars(order.total),
            shipping_method,
        }
        .render()?;

        let subject = format!("Recibimos tu pedido #{}", order.order_number);
        self.send_multipart_email(&order.customer.email, &subject, &text, &html)
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

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Customer-facing label for a shipping method.
const fn shipping_method_label(method: ShippingMethod) -> &'static str {
    match method {
        ShippingMethod::Retiro => "Retiro por el taller",
        ShippingMethod::Moto => "Moto (CABA y alrededores)",
        ShippingMethod::Correo => "Correo a domicilio",
        ShippingMethod::ToCoordinate => "Entrega a coordinar",
    }
}
