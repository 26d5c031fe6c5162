use crate::{
    configuration::{BusinessHours, Configuration, WorkloadThresholds},
    date_key::DateKey,
    time_slots::TimeSlot,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "home-booking", about = "Availability and scheduling for home services")]
pub struct ConfigurationHandler {
    /// Base URL of the availability service. Availability stays in memory when unset.
    #[arg(long, env = "AVAILABILITY_URL")]
    availability_url: Option<String>,

    #[arg(long, env = "BUSINESS_START_HOUR", default_value_t = 8)]
    start_hour: u32,

    #[arg(long, env = "BUSINESS_END_HOUR", default_value_t = 18)]
    end_hour: u32,

    #[arg(long, env = "BREAK_START_HOUR", default_value_t = 12)]
    break_start: u32,

    #[arg(long, env = "BREAK_END_HOUR", default_value_t = 13)]
    break_end: u32,

    #[arg(long, env = "SLOT_INTERVAL_MINUTES", default_value_t = 60)]
    slot_interval: u32,

    #[arg(long, env = "WORKLOAD_MEDIUM_FROM", default_value_t = 50)]
    workload_medium_from: u32,

    #[arg(long, env = "WORKLOAD_HIGH_FROM", default_value_t = 80)]
    workload_high_from: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the free slots of a day
    Slots {
        #[arg(long)]
        date: DateKey,
    },
    /// Reserve a slot for a service lasting `days` days and commit it
    Reserve {
        #[arg(long)]
        date: DateKey,
        #[arg(long)]
        time: TimeSlot,
        #[arg(long, default_value_t = 1)]
        days: u32,
    },
    /// Print the month around a date
    Calendar {
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Daily workload of a technician from a schedule file
    Workload {
        #[arg(long)]
        schedule: PathBuf,
        #[arg(long)]
        technician: Uuid,
        #[arg(long)]
        date: DateKey,
    },
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn business_hours(&self) -> BusinessHours {
        BusinessHours {
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            break_start: self.break_start,
            break_end: self.break_end,
            slot_interval_minutes: self.slot_interval,
        }
        .validated_or_default()
    }

    fn workload_thresholds(&self) -> WorkloadThresholds {
        WorkloadThresholds {
            medium_from: self.workload_medium_from,
            high_from: self.workload_high_from.max(self.workload_medium_from),
        }
    }

    fn availability_url(&self) -> Option<String> {
        self.availability_url.clone()
    }
}
