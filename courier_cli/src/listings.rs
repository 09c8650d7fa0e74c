use anyhow::Context;
use clap::Args;
use comfy_table::Table;
use courier_client::{
    config::ClientConfig, optimizer_api::OptimizerApiClient, session::Session,
};

pub const NO_MATCHING_CUSTOMERS: &str = "No customers match your search criteria.";

#[derive(Args)]
pub struct CustomersArgs {
    /// Only show customers whose name or address contains this text
    #[arg(short, long, default_value = "")]
    filter: String,
}

pub async fn run_customers(config: &ClientConfig, args: CustomersArgs) -> anyhow::Result<()> {
    let mut session = Session::new(OptimizerApiClient::from_config(config));
    session
        .load()
        .await
        .customers
        .context("Could not load customers")?;

    session.selection_mut().set_filter(args.filter);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Address", "Location"]);

    let mut shown = 0;
    for customer in session.selection().filtered_customers(session.cache()) {
        table.add_row(vec![
            customer.id().to_string(),
            customer.name().to_owned(),
            customer.address().to_owned(),
            customer.location().to_string(),
        ]);
        shown += 1;
    }

    if shown == 0 {
        println!("{}", NO_MATCHING_CUSTOMERS);
    } else {
        println!("{table}");
    }

    Ok(())
}

pub async fn run_storages(config: &ClientConfig) -> anyhow::Result<()> {
    let mut session = Session::new(OptimizerApiClient::from_config(config));
    session
        .load()
        .await
        .storages
        .context("Could not load storages")?;

    let default_storage = session.selection().active_storage();

    let mut table = Table::new();
    table.set_header(vec!["", "ID", "Name", "Address", "Location"]);
    for storage in session.cache().storages() {
        let marker = if Some(storage.id()) == default_storage {
            "*"
        } else {
            ""
        };

        table.add_row(vec![
            marker.to_owned(),
            storage.id().to_string(),
            storage.name().to_owned(),
            storage.address().to_owned(),
            storage.location().to_string(),
        ]);
    }

    println!("{table}");

    Ok(())
}
