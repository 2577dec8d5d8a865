//! Steady and slowly varying inflow.
//!
//! With the rectangular normal depth the uniform initial state satisfies
//! Sf = S0 exactly, so a constant inflow equal to the base discharge must
//! leave the field unchanged. A monotonically rising inflow must never lower
//! the depth anywhere.

use moc_rs::{
    InflowConfig, NodeIndex, NormalDepthMethod, ScenarioConfig, Simulation, SourceTermSign,
    StepIndex,
};

const STEADY_TOL: f64 = 1e-9;

fn steady_config() -> ScenarioConfig {
    ScenarioConfig::default()
        .with_inflow(InflowConfig::Constant { discharge: 100.0 })
        .with_normal_depth(NormalDepthMethod::Rectangular)
}

#[test]
fn test_constant_inflow_keeps_uniform_flow() {
    let output = Simulation::new(steady_config()).unwrap().run().unwrap();
    let y0 = output.initial.depth;
    let v0 = output.initial.velocity;

    let max_dy = output
        .field
        .depths()
        .iter()
        .fold(0.0_f64, |m, &y| m.max((y - y0).abs()));
    let max_dv = output
        .field
        .velocities()
        .iter()
        .fold(0.0_f64, |m, &v| m.max((v - v0).abs()));

    assert!(max_dy < STEADY_TOL, "depth drifted by {:e}", max_dy);
    assert!(max_dv < STEADY_TOL, "velocity drifted by {:e}", max_dv);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_steady_state_holds_for_either_sign() {
    // At Sf = S0 the source term vanishes, so the sign convention is irrelevant
    let config = steady_config()
        .with_source_sign(SourceTermSign::Subtractive)
        .with_duration(3600.0);
    let output = Simulation::new(config).unwrap().run().unwrap();

    let last = output.field.depth_row(output.last_step());
    for &y in last {
        assert!((y - output.initial.depth).abs() < STEADY_TOL);
    }
}

#[test]
fn test_steady_discharge_is_uniform_along_channel() {
    let output = Simulation::new(steady_config().with_duration(3600.0))
        .unwrap()
        .run()
        .unwrap();

    for &q in output.discharge.row(output.last_step()) {
        assert!((q - 100.0).abs() < 1e-7);
    }
    let balance = output.mass_balance();
    assert!(balance.residual().abs() < 1e-3);
}

#[test]
fn test_rising_inflow_never_lowers_depth() {
    let config = ScenarioConfig::default()
        .with_normal_depth(NormalDepthMethod::Rectangular)
        .with_inflow(InflowConfig::Series {
            times: vec![0.0, 7200.0],
            discharges: vec![100.0, 500.0],
        });
    let output = Simulation::new(config).unwrap().run().unwrap();

    for j in NodeIndex::iter(output.field.n_nodes()) {
        let series = output.field.depth_series(j);
        for (k, pair) in series.windows(2).enumerate() {
            assert!(
                pair[1] >= pair[0] - 1e-9,
                "depth fell at {} between {} and {}",
                j,
                StepIndex::new(k),
                StepIndex::new(k + 1)
            );
        }
    }

    // The last level is close to uniform flow at 500 m³/s
    let q_out = output.discharge.at(output.last_step(), output.mesh.last());
    assert!(q_out > 450.0);
}
