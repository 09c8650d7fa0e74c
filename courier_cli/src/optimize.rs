use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Args;
use comfy_table::Table;
use courier_client::{
    config::ClientConfig,
    customer::CustomerId,
    fleet_params::FleetParams,
    map_view::RenderedMap,
    optimization_result::OptimizationResult,
    optimizer_api::OptimizerApiClient,
    session::{Applied, Session},
    storage::StorageId,
};
use indicatif::ProgressBar;
use jiff::Timestamp;
use tracing::{info, warn};

use crate::parsers;

#[derive(Args)]
pub struct OptimizeArgs {
    /// Customer to toggle into the selection, repeat for more
    #[arg(short, long = "customer")]
    customers: Vec<CustomerId>,

    /// Depot storage, defaults to the first storage listed
    #[arg(short, long)]
    storage: Option<StorageId>,

    /// Number of trucks
    #[arg(short, long, default_value_t = 0)]
    trucks: u32,

    /// Product weight (kg)
    #[arg(short, long, value_parser = parsers::parse_weight, default_value = "0")]
    weight: f64,

    /// Expected number of customers per day
    #[arg(long, default_value_t = 0)]
    daily_customers: u32,

    /// Write the rendered map to this GeoJSON file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the full optimization result
    #[arg(long)]
    raw: bool,
}

pub async fn run(config: &ClientConfig, args: OptimizeArgs) -> anyhow::Result<()> {
    let mut session = Session::new(OptimizerApiClient::from_config(config));

    // Failed listings are logged by the session; carry on with what loaded.
    let mut pending = session.spawn_load().len();
    while pending > 0 {
        let Some(event) = session.next_event().await else {
            break;
        };

        if let Applied::Customers(_) | Applied::Storages(_) = session.apply(event) {
            pending -= 1;
        }
    }

    for id in args.customers {
        if !session.selection_mut().toggle_customer(id) {
            warn!("Customer {} was given twice and is now deselected", id);
        } else if session.cache().customer(id).is_none() {
            warn!("Customer {} is unknown and will be skipped", id);
        }
    }

    if let Some(storage) = args.storage {
        session.selection_mut().set_active_storage(storage);
    }

    session.set_fleet(FleetParams {
        num_vehicles: args.trucks,
        total_weight: args.weight,
        daily_customers: args.daily_customers,
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Optimizing routes...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let started = Timestamp::now();
    let (submission, _task) = session.spawn_submit();

    let mut outcome = None;
    while let Some(event) = session.next_event().await {
        match session.apply(event) {
            Applied::Optimization {
                submission: finished,
                outcome: applied,
            } if finished == submission => {
                outcome = Some(applied);
                break;
            }
            _ => {}
        }
    }

    spinner.finish_and_clear();
    info!(
        "Submission {} finished in {:#}",
        submission,
        started.duration_until(Timestamp::now())
    );

    if let Some(result) = session.result() {
        print_summary(result, args.raw)?;
    }

    let map = session.render_map();
    print_stops(&map);

    if let Some(out) = &args.out {
        write_map(out, &map)?;
        info!("Map written to {:?}", out);
    }

    match outcome {
        Some(applied) => {
            applied.context("Optimization request failed")?;
            match session.result().and_then(OptimizationResult::error) {
                Some(error) => Err(anyhow::anyhow!("Optimizer rejected the request: {error}")),
                None => Ok(()),
            }
        }
        None => Err(anyhow::anyhow!("Session closed before the optimization finished")),
    }
}

fn print_summary(result: &OptimizationResult, raw: bool) -> anyhow::Result<()> {
    if let Some(error) = result.error() {
        println!("Optimizer error: {error}");
    }

    if let Some(message) = result.message() {
        println!("{message}");
    }

    if let Some(total_distance) = result.total_distance() {
        println!("Total distance: {total_distance}");
    }

    if let Some(routes) = result.routes() {
        for (index, route) in routes.iter().enumerate() {
            let vehicle = route
                .vehicle()
                .map_or_else(|| index.to_string(), |vehicle| vehicle.to_string());
            let stops = route.route().map_or(0, |coordinates| coordinates.len());

            match route.distance() {
                Some(distance) => {
                    println!("Vehicle {vehicle}: {stops} stops, distance {distance}")
                }
                None => println!("Vehicle {vehicle}: {stops} stops"),
            }
        }
    }

    if raw {
        println!("{}", result.to_pretty_json()?);
    }

    Ok(())
}

fn print_stops(map: &RenderedMap) {
    if map.markers().is_empty() {
        println!("No route to display.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Stop", "Latitude", "Longitude"]);
    for marker in map.markers() {
        table.add_row(vec![
            marker.position().to_string(),
            marker.location().lat().to_string(),
            marker.location().lng().to_string(),
        ]);
    }

    println!("{table}");
}

fn write_map(path: &Path, map: &RenderedMap) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Could not create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &map.to_geojson())?;
    writer.flush()?;

    Ok(())
}
