use anyhow::{anyhow, Result};
use home_booking::{
    availability::AvailabilityStore,
    backend::AvailabilityBackend,
    calendar::CalendarNavigator,
    configuration::Configuration,
    configuration_handler::{Command, ConfigurationHandler},
    local_availability::LocalAvailability,
    remote_availability::RemoteAvailability,
    reservation::ReservationPlanner,
    schedule::Schedule,
    types::Service,
    workload::WorkloadAggregator,
};
use chrono::Datelike;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    if let Some(url) = configuration.availability_url() {
        info!(%url, "Using remote availability");
        let backend = RemoteAvailability::new(&url)?;
        run(configuration, backend).await
    } else {
        info!("Using in-memory availability");
        run(configuration, LocalAvailability::default()).await
    }
}

async fn run<B: AvailabilityBackend>(configuration: ConfigurationHandler, backend: B) -> Result<()> {
    let hours = configuration.business_hours();
    let mut store = AvailabilityStore::new(backend);
    store.load().await;

    match configuration.command.clone() {
        Command::Slots { date } => {
            let planner = ReservationPlanner::new(hours);
            for slot in store.committed().available_slots(date, planner.slots()) {
                println!("{slot}");
            }
        }
        Command::Reserve { date, time, days } => {
            let planner = ReservationPlanner::new(hours);
            let service = Service::new("Ad hoc service", hours.slot_interval_minutes, days);
            let plan = planner.plan(&service, date);

            store
                .reserve(&planner, &plan, time)
                .map_err(|conflict| anyhow!("Reservation rejected: {conflict}"))?;
            store.commit().await?;
            println!("{}", serde_json::to_string_pretty(&plan.request(time))?);
        }
        Command::Calendar { date } => {
            let navigator = CalendarNavigator::for_today(date);
            let month = navigator.visible_month().date();
            println!("{:^27}", format!("{} {}", month.format("%B"), month.year()));
            println!(" Su  Mo  Tu  We  Th  Fr  Sa");
            for week in navigator.grid(store.committed()) {
                let row: Vec<String> = week
                    .iter()
                    .map(|cell| match cell {
                        Some(cell) if cell.is_selected => format!("{:>3}*", cell.date.date().day()),
                        Some(cell) if cell.is_disabled => format!("{:>3}x", cell.date.date().day()),
                        Some(cell) => format!("{:>3} ", cell.date.date().day()),
                        None => "    ".into(),
                    })
                    .collect();
                println!("{}", row.concat().trim_end());
            }
        }
        Command::Workload {
            schedule,
            technician,
            date,
        } => {
            let schedule = Schedule::from_file(&schedule)?;
            let technician = schedule
                .technician(technician)
                .ok_or_else(|| anyhow!("Unknown technician {technician}"))?;
            let aggregator = WorkloadAggregator::new(hours, configuration.workload_thresholds());
            let load = aggregator.daily_load(
                technician,
                date,
                &schedule.bookings,
                &schedule.service_index(),
            );
            println!("{}", serde_json::to_string_pretty(&load)?);
        }
    }
    Ok(())
}
