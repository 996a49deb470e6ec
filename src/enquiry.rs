//! Enquiries
//!
//! An enquiry is never stored: it is rendered into a pre-filled WhatsApp message or email
//! compose link that the customer sends themselves.

use thiserror::Error;

use crate::products::Product;

/// Enquiry validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnquiryError {
    /// A required form field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Where enquiries are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    /// WhatsApp number in international format without `+`
    pub whatsapp_number: String,

    /// Sales inbox
    pub email: String,

    /// Subject line for email enquiries
    pub email_subject: String,
}

impl Default for ContactDetails {
    fn default() -> Self {
        Self {
            whatsapp_number: "919960447001".to_string(),
            email: "amritva009@amritvaoverseas.com".to_string(),
            email_subject: "Enquiry from Amritva Overseas".to_string(),
        }
    }
}

impl ContactDetails {
    /// Link opening a WhatsApp chat with `message` pre-filled.
    pub fn whatsapp_url(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.whatsapp_number,
            urlencoding::encode(message)
        )
    }

    /// Link opening a chat with no message.
    pub fn whatsapp_chat_url(&self) -> String {
        format!("https://wa.me/{}", self.whatsapp_number)
    }
}

fn required(value: &str, field: &'static str) -> Result<(), EnquiryError> {
    if value.trim().is_empty() {
        return Err(EnquiryError::MissingField(field));
    }

    Ok(())
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();

    if value.is_empty() { fallback } else { value }
}

/// Enquiry about a specific product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductEnquiry {
    /// Customer name (required)
    pub name: String,

    /// Customer email (required)
    pub email: String,

    /// Customer phone (required)
    pub phone: String,

    /// Requested quantity
    pub quantity: String,

    /// Free text message
    pub message: String,
}

impl ProductEnquiry {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`EnquiryError::MissingField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), EnquiryError> {
        required(&self.name, "name")?;
        required(&self.email, "email")?;
        required(&self.phone, "phone")?;

        Ok(())
    }

    /// The message sent for `product`.
    pub fn message(&self, product: &Product) -> String {
        format!(
            "*Product Enquiry*\n\n\
             *Product:* {}\n\
             *Category:* {}\n\
             *Type:* {}\n\
             *Price:* {}\n\n\
             *Customer Details:*\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Quantity: {}\n\n\
             *Message:*\n{}",
            product.name,
            product.category,
            or_default(&product.product_type, "N/A"),
            product.price,
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            or_default(&self.quantity, "Not specified"),
            or_default(&self.message, "No additional message"),
        )
    }

    /// Validates the form and builds the WhatsApp link for `product`.
    ///
    /// # Errors
    ///
    /// Returns [`EnquiryError::MissingField`] when a required field is blank.
    pub fn whatsapp_url(
        &self,
        product: &Product,
        contact: &ContactDetails,
    ) -> Result<String, EnquiryError> {
        self.validate()?;

        Ok(contact.whatsapp_url(&self.message(product)))
    }
}

/// Enquiry from the contact page, not tied to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralEnquiry {
    /// Customer name (required)
    pub name: String,

    /// Customer email (required)
    pub email: String,

    /// Customer phone
    pub phone: String,

    /// Interest: a category slug, `organic` or `other`
    pub category: String,

    /// Free text message
    pub message: String,
}

impl Default for GeneralEnquiry {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            category: "towels".to_string(),
            message: String::new(),
        }
    }
}

impl GeneralEnquiry {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`EnquiryError::MissingField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), EnquiryError> {
        required(&self.name, "name")?;
        required(&self.email, "email")?;

        Ok(())
    }

    /// Label for the chosen interest.
    pub fn category_label(&self) -> &str {
        match self.category.as_str() {
            "towels" => "Towels",
            "cow-dung" => "Cow Dung Products",
            "organic" => "Organic Items",
            "other" => "Other Enquiry",
            other => other,
        }
    }

    /// The message sent.
    pub fn message(&self) -> String {
        format!(
            "*New Enquiry from Website*\n\n\
             *Name:* {}\n\n\
             *Email:* {}\n\n\
             *Phone:* {}\n\n\
             *Product Category:* {}\n\n\
             *Message:*\n{}",
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.category_label(),
            self.message.trim(),
        )
    }

    /// Validates the form and builds the WhatsApp link.
    ///
    /// # Errors
    ///
    /// Returns [`EnquiryError::MissingField`] when a required field is blank.
    pub fn whatsapp_url(&self, contact: &ContactDetails) -> Result<String, EnquiryError> {
        self.validate()?;

        Ok(contact.whatsapp_url(&self.message()))
    }
}

/// Email client offered in the "send email" picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailClient {
    /// Gmail web compose
    Gmail,
    /// Outlook web compose
    Outlook,
    /// Yahoo Mail web compose
    Yahoo,
    /// The system mail handler
    Default,
}

impl EmailClient {
    /// Every client, in picker order.
    pub const ALL: [EmailClient; 4] = [
        EmailClient::Gmail,
        EmailClient::Outlook,
        EmailClient::Yahoo,
        EmailClient::Default,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            EmailClient::Gmail => "Gmail",
            EmailClient::Outlook => "Outlook",
            EmailClient::Yahoo => "Yahoo Mail",
            EmailClient::Default => "Default Mail App",
        }
    }

    /// Compose link addressed to the sales inbox.
    pub fn compose_url(self, contact: &ContactDetails) -> String {
        let to = &contact.email;
        let subject = urlencoding::encode(&contact.email_subject);

        match self {
            EmailClient::Gmail => format!(
                "https://mail.google.com/mail/?view=cm&fs=1&to={to}&su={subject}"
            ),
            EmailClient::Outlook => format!(
                "https://outlook.live.com/mail/0/deeplink/compose?to={to}&subject={subject}"
            ),
            EmailClient::Yahoo => {
                format!("https://compose.mail.yahoo.com/?to={to}&subject={subject}")
            }
            EmailClient::Default => format!("mailto:{to}?subject={subject}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{
        products::{CONTACT_FOR_PRICE, ProductId},
        taxonomy::CategoryKey,
    };

    fn robe() -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Premium Bathrobe".to_string(),
            category: "Towels".to_string(),
            category_slug: CategoryKey::Towels,
            product_type: "Bathrobe".to_string(),
            product_subtype: String::new(),
            description: String::new(),
            price: CONTACT_FOR_PRICE.to_string(),
            price_value: Decimal::ZERO,
            image_emoji: "🧖".to_string(),
            image_url: None,
            highlight: None,
            created_at: 1,
        }
    }

    fn enquiry() -> ProductEnquiry {
        ProductEnquiry {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 1234567890".to_string(),
            ..ProductEnquiry::default()
        }
    }

    #[test]
    fn product_message_uses_placeholders() {
        let message = enquiry().message(&robe());

        assert!(message.starts_with("*Product Enquiry*\n\n*Product:* Premium Bathrobe\n"));
        assert!(message.contains("*Type:* Bathrobe\n"));
        assert!(message.contains("*Price:* Contact for Price\n\n*Customer Details:*\n"));
        assert!(message.contains("Quantity: Not specified\n\n"));
        assert!(message.ends_with("*Message:*\nNo additional message"));
    }

    #[test]
    fn missing_phone_blocks_link() {
        let form = ProductEnquiry {
            phone: "  ".to_string(),
            ..enquiry()
        };

        assert_eq!(
            form.whatsapp_url(&robe(), &ContactDetails::default()),
            Err(EnquiryError::MissingField("phone"))
        );
    }

    #[test]
    fn whatsapp_link_is_percent_encoded() -> TestResult {
        let url = enquiry().whatsapp_url(&robe(), &ContactDetails::default())?;

        assert!(url.starts_with("https://wa.me/919960447001?text=%2AProduct%20Enquiry%2A%0A%0A"));
        assert!(!url.contains(' '));

        Ok(())
    }

    #[test]
    fn general_enquiry_maps_category_label() -> TestResult {
        let form = GeneralEnquiry {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            category: "cow-dung".to_string(),
            message: "Need 500 kg".to_string(),
            ..GeneralEnquiry::default()
        };

        assert!(form.message().contains("*Product Category:* Cow Dung Products\n\n"));
        assert!(form.whatsapp_url(&ContactDetails::default())?.contains("Need%20500%20kg"));

        Ok(())
    }

    #[test]
    fn general_enquiry_requires_email() {
        let form = GeneralEnquiry {
            name: "Ravi".to_string(),
            ..GeneralEnquiry::default()
        };

        assert_eq!(form.validate(), Err(EnquiryError::MissingField("email")));
    }

    #[test]
    fn compose_links_encode_subject() {
        let contact = ContactDetails::default();

        assert_eq!(
            EmailClient::Default.compose_url(&contact),
            "mailto:amritva009@amritvaoverseas.com?subject=Enquiry%20from%20Amritva%20Overseas"
        );
        assert!(
            EmailClient::Yahoo
                .compose_url(&contact)
                .starts_with("https://compose.mail.yahoo.com/?to=")
        );
    }
}
