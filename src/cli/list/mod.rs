//! List command - operates the persisted shopping list

use std::fmt::Write as _;
use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::domain::summary::{format_amount, format_line_amount};
use crate::domain::{Clock, KeyValueStore, ProductDraft, ProductId, ProductUpdate, SystemClock};
use crate::infrastructure::services::{CategorizationService, ListStore, ShareService};
use crate::infrastructure::storage::FileKeyValueStore;

#[derive(Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ListAction {
    /// Add a product to the top of the list
    Add {
        name: String,
        price: f64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Set a product's quantity; zero or less removes it
    Qty {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Change a product's name, price or quantity
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<u32>,
    },

    /// Remove a product
    Remove { id: i64 },

    /// Remove every product
    Clear,

    /// Print the list and its total
    Show,

    /// Print the shareable summary message
    Share {
        /// Group products by supermarket category
        #[arg(long)]
        categorize: bool,
    },

    /// Print quota, cache and limit status
    Status,
}

/// Services the list commands operate on
pub struct ListContext {
    pub list: ListStore,
    pub categorization: Arc<CategorizationService>,
    pub share: ShareService,
    pub clock: Arc<dyn Clock>,
}

impl ListContext {
    /// Load the list and wire categorization on `store`
    pub async fn open(
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let list = ListStore::load(store.clone(), clock.clone()).await;
        let categorization =
            crate::create_categorization_service(config, store.clone(), clock.clone())?;
        let share =
            crate::create_share_service(config, categorization.clone(), store, clock.clone());

        Ok(Self {
            list,
            categorization,
            share,
            clock,
        })
    }
}

pub async fn run(args: ListArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileKeyValueStore::new(config.storage.data_dir.clone()));
    let context = ListContext::open(&config, store, Arc::new(SystemClock)).await?;

    let output = execute(&context, args.action).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

/// Apply `action` and render what should be printed
pub async fn execute(context: &ListContext, action: ListAction) -> anyhow::Result<String> {
    match action {
        ListAction::Add {
            name,
            price,
            quantity,
        } => {
            let product = context.list.add(ProductDraft::new(name, price, quantity)?).await;
            Ok(format!(
                "Agregado #{}: {} x {} - ${}",
                product.id(),
                product.name(),
                product.quantity(),
                format_line_amount(product.line_total())
            ))
        }
        ListAction::Qty { id, quantity } => {
            let id = ProductId::new(id);
            if !context.list.update_quantity(id, quantity).await {
                anyhow::bail!("No se pudo actualizar el producto #{}", id);
            }
            Ok(render_total(context.list.total().await))
        }
        ListAction::Update {
            id,
            name,
            price,
            quantity,
        } => {
            let id = ProductId::new(id);
            let mut update = ProductUpdate::default();
            if let Some(name) = name {
                update = update.with_name(name);
            }
            if let Some(price) = price {
                update = update.with_price(price);
            }
            if let Some(quantity) = quantity {
                update = update.with_quantity(quantity);
            }
            if update.is_empty() {
                anyhow::bail!("Nada para actualizar");
            }

            if !context.list.update_product(id, &update).await? {
                anyhow::bail!("Producto #{} no encontrado", id);
            }
            Ok(render_total(context.list.total().await))
        }
        ListAction::Remove { id } => {
            let id = ProductId::new(id);
            if !context.list.remove(id).await {
                anyhow::bail!("Producto #{} no encontrado", id);
            }
            Ok(render_total(context.list.total().await))
        }
        ListAction::Clear => {
            context.list.clear().await;
            Ok("Lista vaciada".to_string())
        }
        ListAction::Show => Ok(render_list(context).await),
        ListAction::Share { categorize } => {
            let products = context.list.products().await;
            let today = context.clock.today();

            if !categorize {
                return Ok(context.share.share_plain(&products, today));
            }

            let shared = context.share.share_categorized(&products, today).await?;
            Ok(match shared.notice {
                Some(notice) => format!("Aviso: {}\n\n{}", notice, shared.message),
                None => shared.message,
            })
        }
        ListAction::Status => {
            let status = context.categorization.system_status().await;
            Ok(serde_json::to_string_pretty(&status)?)
        }
    }
}

fn render_total(total: f64) -> String {
    format!("Total: ${}", format_amount(total))
}

async fn render_list(context: &ListContext) -> String {
    let products = context.list.products().await;
    if products.is_empty() {
        return "La lista está vacía".to_string();
    }

    let mut out = String::new();
    for product in &products {
        let _ = writeln!(
            out,
            "#{}  {} x {} @ ${} = ${}",
            product.id(),
            product.name(),
            product.quantity(),
            format_line_amount(product.price()),
            format_line_amount(product.line_total())
        );
    }
    out.push_str(&render_total(context.list.total().await));
    out
}
