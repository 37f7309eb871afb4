//! The bank teller system.  Cars arrive at two drive-through cashiers, each
//! with a bounded line, and pick a line at random when both have room.
//! Cars that find both lines full park and walk indoors.  Indoor customers
//! queue in a bounded line for a pool of tellers, who only start serving
//! after an opening delay; customers who find the indoor line full leave
//! and are counted as lost.
//!
//! The extended variant adds a loan desk: a share of indoor arrivals are
//! new clients who are questioned by a manager, refused (and counted as
//! lost) or issued a loan, and finally handed a card by the manager before
//! joining the indoor line.

use serde::{Deserialize, Serialize};

use crate::input_modeling::{ContinuousRandomVariable, Delay};
use crate::models::{Place, PlaceId, Transition};
use crate::output_analysis::Observable;
use crate::simulator::Net;
use crate::utils::errors::SimulationError;

/// Capacities, service times and arrival processes of the standard bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankParameters {
    pub first_drive_line_capacity: u64,
    pub second_drive_line_capacity: u64,
    pub indoor_line_capacity: u64,
    pub first_drive_service: ContinuousRandomVariable,
    pub second_drive_service: ContinuousRandomVariable,
    pub indoor_service: ContinuousRandomVariable,
    pub indoor_cashiers: u64,
    pub drive_interarrival: ContinuousRandomVariable,
    pub indoor_interarrival: ContinuousRandomVariable,
    /// Time before the indoor tellers start serving.
    pub opening_delay: f64,
}

impl Default for BankParameters {
    fn default() -> Self {
        Self {
            first_drive_line_capacity: 3,
            second_drive_line_capacity: 4,
            indoor_line_capacity: 7,
            first_drive_service: ContinuousRandomVariable::TruncatedNormal {
                mean: 0.5,
                std_dev: 0.25,
            },
            second_drive_service: ContinuousRandomVariable::uniform_around(0.6, 0.4),
            indoor_service: ContinuousRandomVariable::Triangular {
                min: 0.1,
                max: 1.2,
                mode: 0.4,
            },
            indoor_cashiers: 2,
            drive_interarrival: ContinuousRandomVariable::exp_with_mean(0.75),
            indoor_interarrival: ContinuousRandomVariable::exp_with_mean(0.5),
            opening_delay: 60.0,
        }
    }
}

/// The loan desk of the extended bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDesk {
    pub questioning: ContinuousRandomVariable,
    pub refusal: ContinuousRandomVariable,
    pub issuance: ContinuousRandomVariable,
    pub card_handout: f64,
    /// Share of indoor arrivals that are new clients.
    pub new_client_share: f64,
    /// Share of questioned clients that are refused.
    pub refusal_share: f64,
}

impl Default for LoanDesk {
    fn default() -> Self {
        Self {
            questioning: ContinuousRandomVariable::uniform_around(3.5, 1.5),
            refusal: ContinuousRandomVariable::exp_with_mean(10.0),
            issuance: ContinuousRandomVariable::exp_with_mean(5.0),
            card_handout: 1.0,
            new_client_share: 0.1,
            refusal_share: 0.05,
        }
    }
}

/// The standard bank.
pub fn standard(parameters: &BankParameters) -> Result<Net, SimulationError> {
    build(parameters, None)
}

/// The bank with a loan desk.
pub fn extended(parameters: &BankParameters, desk: &LoanDesk) -> Result<Net, SimulationError> {
    build(parameters, Some(desk))
}

fn constant(value: f64) -> Delay {
    if value == 0.0 {
        Delay::Immediate
    } else {
        Delay::constant(value)
    }
}

/// A drive-through cashier with its own bounded line.  Returns the line
/// and the served counter.
fn drive_through(
    net: &mut Net,
    ordinal: &str,
    capacity: u64,
    service: &ContinuousRandomVariable,
    arrivals: PlaceId,
) -> Result<(PlaceId, PlaceId), SimulationError> {
    let free_slots = net.add_place(Place::new(
        format!["{} drive-through line free slots", ordinal],
        capacity,
    ))?;
    let line = net.add_place(Place::new(format!["{} drive-through line", ordinal], 0))?;
    let idle = net.add_place(Place::new(format!["{} drive-through cashier idle", ordinal], 1))?;
    let at_cashier = net.add_place(Place::new(
        format!["{} drive-through cashier busy", ordinal],
        0,
    ))?;
    let served = net.add_place(Place::new(format!["{} drive-through served", ordinal], 0))?;
    net.add_transition(
        Transition::new(format!["{} drive-through line joined", ordinal])
            .with_priority(1)
            .with_probability(0.5)
            .input(arrivals, 1)
            .input(free_slots, 1)
            .output(line, 1),
    )?;
    net.add_transition(
        Transition::new(format!["{} drive-through line left", ordinal])
            .input(line, 1)
            .input(idle, 1)
            .output(free_slots, 1)
            .output(at_cashier, 1),
    )?;
    net.add_transition(
        Transition::new(format!["{} drive-through service", ordinal])
            .with_delay(service.clone())
            .input(at_cashier, 1)
            .output(idle, 1)
            .output(served, 1),
    )?;
    Ok((line, served))
}

fn build(parameters: &BankParameters, desk: Option<&LoanDesk>) -> Result<Net, SimulationError> {
    let mut net = Net::default();

    let drive_source = net.add_place(Place::new("drive-through arrivals source", 1))?;
    let drive_arrivals = net.add_place(Place::new("drive-through arrivals", 0))?;
    net.add_transition(
        Transition::new("drive-through arrival")
            .with_delay(parameters.drive_interarrival.clone())
            .input(drive_source, 1)
            .output(drive_source, 1)
            .output(drive_arrivals, 1),
    )?;
    let (first_line, first_served) = drive_through(
        &mut net,
        "First",
        parameters.first_drive_line_capacity,
        &parameters.first_drive_service,
        drive_arrivals,
    )?;
    let (second_line, second_served) = drive_through(
        &mut net,
        "Second",
        parameters.second_drive_line_capacity,
        &parameters.second_drive_service,
        drive_arrivals,
    )?;

    let indoor_source = net.add_place(Place::new("indoor arrivals source", 1))?;
    let indoor_arrivals = net.add_place(Place::new("indoor arrivals", 0))?;
    let free_slots = net.add_place(Place::new(
        "indoor line free slots",
        parameters.indoor_line_capacity,
    ))?;
    let indoor_line = net.add_place(Place::new("indoor line", 0))?;
    let idle_cashiers = net.add_place(Place::new("indoor cashiers idle", 0))?;
    let at_cashier = net.add_place(Place::new("indoor cashiers busy", 0))?;
    let indoor_served = net.add_place(Place::new("indoor served", 0))?;
    let closed = net.add_place(Place::new("indoor cashiers closed", 1))?;
    let lost = net.add_place(Place::new("lost", 0))?;

    // With a loan desk, arrivals are sorted into regular and new clients
    // before regular clients reach the indoor line.
    let arrival_target = match desk {
        Some(_) => net.add_place(Place::new("indoor clients", 0))?,
        None => indoor_arrivals,
    };
    net.add_transition(
        Transition::new("indoor arrival")
            .with_delay(parameters.indoor_interarrival.clone())
            .input(indoor_source, 1)
            .output(indoor_source, 1)
            .output(arrival_target, 1),
    )?;
    net.add_transition(
        Transition::new("indoor line joined")
            .with_priority(1)
            .input(indoor_arrivals, 1)
            .input(free_slots, 1)
            .output(indoor_line, 1),
    )?;
    net.add_transition(
        Transition::new("indoor line left")
            .input(indoor_line, 1)
            .input(idle_cashiers, 1)
            .output(free_slots, 1)
            .output(at_cashier, 1),
    )?;
    let indoor_service = net.add_transition(
        Transition::new("indoor service")
            .with_delay(parameters.indoor_service.clone())
            .input(at_cashier, 1)
            .output(idle_cashiers, 1)
            .output(indoor_served, 1),
    )?;
    net.add_transition(
        Transition::new("indoor cashiers opening")
            .with_delay(constant(parameters.opening_delay))
            .input(closed, 1)
            .output(idle_cashiers, parameters.indoor_cashiers),
    )?;
    net.add_transition(
        Transition::new("walked indoors")
            .input(drive_arrivals, 1)
            .output(indoor_arrivals, 1),
    )?;
    net.add_transition(
        Transition::new("left the bank")
            .input(indoor_arrivals, 1)
            .output(lost, 1),
    )?;

    if let Some(desk) = desk {
        loan_desk(&mut net, desk, arrival_target, indoor_arrivals, free_slots, indoor_line, lost)?;
    }

    net.observe(
        "First drive-through cashier load",
        Observable::MeanLoad {
            transition: net.transition_id("First drive-through service")?,
            servers: 1.0,
        },
    )?;
    net.observe(
        "Second drive-through cashier load",
        Observable::MeanLoad {
            transition: net.transition_id("Second drive-through service")?,
            servers: 1.0,
        },
    )?;
    net.observe(
        "Indoor cashiers load",
        Observable::MeanLoad {
            transition: indoor_service,
            servers: parameters.indoor_cashiers as f64,
        },
    )?;
    net.observe(
        "First drive-through line mean size",
        Observable::MeanMarking { place: first_line },
    )?;
    net.observe(
        "Second drive-through line mean size",
        Observable::MeanMarking { place: second_line },
    )?;
    net.observe(
        "Indoor line mean size",
        Observable::MeanMarking { place: indoor_line },
    )?;
    let counters = [lost, first_served, second_served, indoor_served];
    net.observe(
        "Loss probability",
        Observable::Share {
            numerator: vec![lost],
            denominator: counters.to_vec(),
        },
    )?;
    counters
        .iter()
        .try_for_each(|counter| net.reset_on_warmup(*counter))?;
    Ok(net)
}

fn loan_desk(
    net: &mut Net,
    desk: &LoanDesk,
    clients: PlaceId,
    indoor_arrivals: PlaceId,
    free_slots: PlaceId,
    indoor_line: PlaceId,
    lost: PlaceId,
) -> Result<(), SimulationError> {
    let manager_line = net.add_place(Place::new("manager line", 0))?;
    let manager_idle = net.add_place(Place::new("manager idle", 1))?;
    let questioned = net.add_place(Place::new("questioned", 0))?;
    let refusals = net.add_place(Place::new("awaiting refusal", 0))?;
    let issuances = net.add_place(Place::new("awaiting issuance", 0))?;
    let cards = net.add_place(Place::new("awaiting card", 0))?;
    let returning = net.add_place(Place::new("returning to indoor line", 0))?;

    net.add_transition(
        Transition::new("regular client")
            .with_probability(1.0 - desk.new_client_share)
            .input(clients, 1)
            .output(indoor_arrivals, 1),
    )?;
    net.add_transition(
        Transition::new("new client")
            .with_probability(desk.new_client_share)
            .input(clients, 1)
            .output(manager_line, 1),
    )?;
    net.add_transition(
        Transition::new("questioning")
            .with_delay(desk.questioning.clone())
            .input(manager_line, 1)
            .input(manager_idle, 1)
            .output(questioned, 1)
            .output(manager_idle, 1),
    )?;
    net.add_transition(
        Transition::new("sent to refusal")
            .with_probability(desk.refusal_share)
            .input(questioned, 1)
            .output(refusals, 1),
    )?;
    net.add_transition(
        Transition::new("sent to issuance")
            .with_probability(1.0 - desk.refusal_share)
            .input(questioned, 1)
            .output(issuances, 1),
    )?;
    net.add_transition(
        Transition::new("refusal")
            .with_delay(desk.refusal.clone())
            .input(refusals, 1)
            .input(manager_idle, 1)
            .output(lost, 1)
            .output(manager_idle, 1),
    )?;
    net.add_transition(
        Transition::new("loan issuance")
            .with_delay(desk.issuance.clone())
            .input(issuances, 1)
            .output(cards, 1),
    )?;
    net.add_transition(
        Transition::new("card handout")
            .with_delay(constant(desk.card_handout))
            .with_priority(1)
            .input(cards, 1)
            .input(manager_idle, 1)
            .output(returning, 1)
            .output(manager_idle, 1),
    )?;
    net.add_transition(
        Transition::new("returned to indoor line")
            .with_priority(1)
            .input(returning, 1)
            .input(free_slots, 1)
            .output(indoor_line, 1),
    )?;
    Ok(())
}
