//! `enquiry` subcommands.

use std::io::{self, Write};

use catalog::{
    enquiry::{ContactDetails, EmailClient, GeneralEnquiry, ProductEnquiry},
    fixtures::demo_catalog,
    normalize::Normalizer,
    products::{Product, ProductId},
};
use clap::{Args, Subcommand, ValueEnum};

use catalog_app::{config::StoreConfig, context::AppContext};

#[derive(Debug, Args)]
pub struct EnquiryCommand {
    #[command(subcommand)]
    command: EnquirySubcommand,
}

#[derive(Debug, Subcommand)]
enum EnquirySubcommand {
    /// Print a WhatsApp link with the enquiry pre-filled
    Whatsapp(WhatsappArgs),

    /// Print email compose links addressed to the sales inbox
    Email(EmailArgs),
}

#[derive(Debug, Args)]
struct WhatsappArgs {
    /// Your name
    #[arg(long)]
    name: String,

    /// Your email
    #[arg(long)]
    email: String,

    /// Your phone number; required for product enquiries
    #[arg(long, default_value = "")]
    phone: String,

    /// Quantity wanted
    #[arg(long, default_value = "")]
    quantity: String,

    /// Message
    #[arg(long, default_value = "")]
    message: String,

    /// Enquire about this product id
    #[arg(long)]
    product: Option<String>,

    /// Interest for general enquiries (towels, cow-dung, organic, other)
    #[arg(long, default_value = "towels")]
    category: String,

    /// Look products up in the demonstration catalog instead of the store
    #[arg(long)]
    demo: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClientArg {
    Gmail,
    Outlook,
    Yahoo,
    Default,
}

impl From<ClientArg> for EmailClient {
    fn from(client: ClientArg) -> Self {
        match client {
            ClientArg::Gmail => EmailClient::Gmail,
            ClientArg::Outlook => EmailClient::Outlook,
            ClientArg::Yahoo => EmailClient::Yahoo,
            ClientArg::Default => EmailClient::Default,
        }
    }
}

#[derive(Debug, Args)]
struct EmailArgs {
    /// Only print the link for this client
    #[arg(long, value_enum)]
    client: Option<ClientArg>,
}

pub async fn run(command: EnquiryCommand, store: &StoreConfig) -> Result<(), String> {
    let contact = ContactDetails::default();
    let mut out = io::stdout().lock();

    match command.command {
        EnquirySubcommand::Whatsapp(args) => {
            let url = whatsapp_url(args, store, &contact).await?;

            writeln!(out, "{url}").map_err(|error| error.to_string())
        }
        EnquirySubcommand::Email(args) => {
            let clients = args
                .client
                .map_or_else(|| EmailClient::ALL.to_vec(), |client| vec![client.into()]);

            for client in clients {
                writeln!(out, "{}: {}", client.name(), client.compose_url(&contact))
                    .map_err(|error| error.to_string())?;
            }

            Ok(())
        }
    }
}

async fn whatsapp_url(
    args: WhatsappArgs,
    store: &StoreConfig,
    contact: &ContactDetails,
) -> Result<String, String> {
    let Some(product_id) = args.product else {
        let enquiry = GeneralEnquiry {
            name: args.name,
            email: args.email,
            phone: args.phone,
            category: args.category,
            message: args.message,
        };

        return enquiry.whatsapp_url(contact).map_err(|error| error.to_string());
    };

    let product = find_product(&ProductId::new(product_id), args.demo, store).await?;

    let enquiry = ProductEnquiry {
        name: args.name,
        email: args.email,
        phone: args.phone,
        quantity: args.quantity,
        message: args.message,
    };

    enquiry
        .whatsapp_url(&product, contact)
        .map_err(|error| error.to_string())
}

async fn find_product(id: &ProductId, demo: bool, store: &StoreConfig) -> Result<Product, String> {
    let products = if demo {
        demo_catalog(&Normalizer::default())
            .map_err(|error| error.to_string())?
            .into_products()
    } else {
        AppContext::from_config(store)
            .map_err(|error| error.to_string())?
            .storefront()
            .load()
            .await
            .map_err(|error| error.to_string())?
            .products()
            .to_vec()
    };

    products
        .into_iter()
        .find(|product| product.id == *id)
        .ok_or_else(|| format!("product not found: {id}"))
}
