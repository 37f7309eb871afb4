use petrisim::experiment::Experiment;
use petrisim::networks::{bank, BankParameters, LoanDesk};
use petrisim::output_analysis::{CsvSnapshotWriter, SnapshotLog};
use petrisim::utils::errors::SimulationError;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn standard_bank_metrics_are_bounded() -> Result<(), SimulationError> {
    init_logger();
    let parameters = BankParameters::default();
    let mut net = bank::standard(&parameters)?.with_seed(17);
    let metrics = net.run_for(1000.0, 100.0)?;
    assert_eq!(metrics.len(), 7);
    [
        "First drive-through cashier load",
        "Second drive-through cashier load",
        "Indoor cashiers load",
        "Loss probability",
    ]
    .iter()
    .for_each(|name| {
        let value = metrics[*name];
        assert!((0.0..=1.0).contains(&value), "{} = {}", name, value);
    });
    assert!(metrics["First drive-through line mean size"] <= 3.0);
    assert!(metrics["Second drive-through line mean size"] <= 4.0);
    assert!(metrics["Indoor line mean size"] <= 7.0);
    // The tellers are open for the whole window
    assert!(metrics["Indoor cashiers load"] > 0.0);
    Ok(())
}

#[test]
fn bank_capacities_hold_throughout() -> Result<(), SimulationError> {
    init_logger();
    let parameters = BankParameters::default();
    let mut net = bank::standard(&parameters)?.with_seed(2);
    let first_line = net.place_id("First drive-through line")?;
    let indoor_line = net.place_id("indoor line")?;
    let idle = net.place_id("indoor cashiers idle")?;
    let busy = net.place_id("indoor cashiers busy")?;
    let service = net.transition_id("indoor service")?;
    for _ in 0..20 {
        net.run_for(25.0, 0.0)?;
        assert!(net.place(first_line)?.tokens() <= parameters.first_drive_line_capacity);
        assert!(net.place(indoor_line)?.tokens() <= parameters.indoor_line_capacity);
        let cashiers = net.place(idle)?.tokens()
            + net.place(busy)?.tokens()
            + net.transition(service)?.pending().len() as u64;
        // Zero before opening, then all of them
        assert!(cashiers == 0 || cashiers == parameters.indoor_cashiers);
    }
    assert_eq!(net.current_time(), 500.0);
    Ok(())
}

#[test]
fn seeded_banks_are_reproducible() -> Result<(), SimulationError> {
    init_logger();
    let run = || -> Result<_, SimulationError> {
        bank::extended(&BankParameters::default(), &LoanDesk::default())?
            .with_seed(99)
            .run_for(300.0, 60.0)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn extended_bank_keeps_one_manager() -> Result<(), SimulationError> {
    init_logger();
    let mut net = bank::extended(&BankParameters::default(), &LoanDesk::default())?.with_seed(8);
    let manager = net.place_id("manager idle")?;
    let holds_manager = ["questioning", "refusal"]
        .iter()
        .map(|name| net.transition_id(name))
        .collect::<Result<Vec<_>, _>>()?;
    for _ in 0..10 {
        let metrics = net.run_for(50.0, 0.0)?;
        let busy: usize = holds_manager
            .iter()
            .map(|id| net.transition(*id).map(|transition| transition.pending().len()))
            .sum::<Result<usize, _>>()?;
        let handing_out = net
            .transition(net.transition_id("card handout")?)?
            .pending()
            .len();
        assert_eq!(
            net.place(manager)?.tokens() as usize + busy + handing_out,
            1
        );
        assert!((0.0..=1.0).contains(&metrics["Loss probability"]));
    }
    Ok(())
}

#[test]
fn replications_are_summarized() -> Result<(), SimulationError> {
    init_logger();
    let parameters = BankParameters::default();
    let summary = Experiment::new(6, 400.0)
        .with_warmup(60.0)
        .with_seed(1000)
        .run(|| bank::standard(&parameters))?;
    assert_eq!(summary.samples().len(), 7);
    let load = summary.sample("Indoor cashiers load").unwrap();
    assert_eq!(load.points().len(), 6);
    // Independent streams give distinct replications
    assert!(load.points().windows(2).any(|pair| pair[0] != pair[1]));
    let intervals = summary.confidence_intervals(0.05)?;
    intervals.values().for_each(|interval| {
        assert!(interval.lower() <= interval.upper());
    });
    assert!(intervals["Indoor cashiers load"].contains(load.point_estimate_mean()));
    assert!(matches!(
        summary.confidence_intervals(0.2),
        Err(SimulationError::UnsupportedConfidenceLevel(_))
    ));
    Ok(())
}

#[test]
fn replication_seeds_follow_the_experiment_seed() -> Result<(), SimulationError> {
    init_logger();
    let parameters = BankParameters::default();
    let summary = Experiment::new(2, 200.0)
        .with_seed(40)
        .run(|| bank::standard(&parameters))?;
    let second = bank::standard(&parameters)?.with_seed(41).run_for(200.0, 0.0)?;
    summary
        .samples()
        .iter()
        .for_each(|(name, sample)| assert_eq!(sample.points()[1], second[name]));
    Ok(())
}

#[test]
fn experiments_need_replications() {
    let parameters = BankParameters::default();
    assert!(matches!(
        Experiment::new(0, 100.0).run(|| bank::standard(&parameters)),
        Err(SimulationError::InvalidModelConfiguration(_))
    ));
}

#[test]
fn bank_snapshots_to_csv() -> Result<(), SimulationError> {
    init_logger();
    let mut writer = CsvSnapshotWriter::new(Vec::new());
    bank::standard(&BankParameters::default())?
        .with_seed(5)
        .run_with_snapshots(200.0, 50.0, 60.0, &mut writer)?;
    let csv = String::from_utf8(writer.into_inner()?).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("elapsed,First drive-through cashier load,"));
    assert!(lines[4].starts_with("200,"));
    Ok(())
}

#[test]
fn replications_snapshot_into_their_own_files() -> Result<(), SimulationError> {
    init_logger();
    let parameters = BankParameters::default();
    let directory = std::env::temp_dir();
    let path = |replication: usize| {
        directory.join(format![
            "petrisim-bank-{}-{}.csv",
            std::process::id(),
            replication
        ])
    };
    Experiment::new(3, 100.0).with_seed(7).run_with_snapshots(
        25.0,
        || bank::standard(&parameters),
        |replication| CsvSnapshotWriter::create(path(replication)),
    )?;
    for replication in 0..3 {
        let csv = std::fs::read_to_string(path(replication))?;
        assert_eq!(csv.lines().count(), 5);
        std::fs::remove_file(path(replication))?;
    }
    Ok(())
}

#[test]
fn bank_window_snapshots_grow_monotonically_in_time() -> Result<(), SimulationError> {
    init_logger();
    let mut log = SnapshotLog::new();
    bank::extended(&BankParameters::default(), &LoanDesk::default())?
        .with_seed(3)
        .run_with_snapshots(120.0, 30.0, 0.0, &mut log)?;
    let elapsed: Vec<f64> = log.snapshots().iter().map(|s| s.elapsed).collect();
    assert_eq!(elapsed, vec![30.0, 60.0, 90.0, 120.0]);
    // The indoor tellers open after 60 time units
    assert_eq!(log.series("Indoor cashiers load")[0], 0.0);
    assert!(log.series("Indoor cashiers load")[3] > 0.0);
    Ok(())
}
