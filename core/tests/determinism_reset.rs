//! Determinism / reset reproducibility (spec.md §8, scenario 6): running
//! a scenario, resetting, and running again from the same seed produces
//! a bit-identical trace.

use snsim_core::bouncer::Bouncer;
use snsim_core::policy::Policy;
use snsim_core::scenario::loader::load_scenario;
use snsim_core::Engine;

const SCENARIO_XML: &str = r#"
    <SNSimScenario>
        <Parameters>
            <Seed>determinism-seed</Seed>
            <GoldWeight>5</GoldWeight>
        </Parameters>
        <ResourcePools>
            <ResourcePool>
                <Identifier>P</Identifier>
                <Resources>
                    <CPU>15</CPU>
                </Resources>
            </ResourcePool>
        </ResourcePools>
        <Services>
            <Service>
                <Identifier>A</Identifier>
                <ResourcePool>P</ResourcePool>
                <Resources>
                    <CPU>4</CPU>
                </Resources>
                <Ticks>3</Ticks>
                <Revenue>2</Revenue>
                <Penalty>1</Penalty>
                <MaxAttempts>2</MaxAttempts>
            </Service>
        </Services>
        <JobTemplates>
            <JobTemplate>
                <Identifier>J1</Identifier>
                <Signature>(('A',))</Signature>
                <Revenue>2</Revenue>
                <Penalty>1</Penalty>
            </JobTemplate>
        </JobTemplates>
        <Customers>
            <Customer>
                <Identifier>C1</Identifier>
                <isGold>True</isGold>
            </Customer>
            <Customer>
                <Identifier>C2</Identifier>
                <isGold>False</isGold>
            </Customer>
        </Customers>
    </SNSimScenario>
"#;

fn run_50_ticks() -> Engine {
    let scenario = load_scenario(SCENARIO_XML).unwrap();
    let mut engine = Engine::new(scenario, Policy::PenaltyBased, Some(Bouncer::tendency()));
    engine.start(50);
    engine
}

#[test]
fn reset_and_rerun_reproduces_an_identical_trace() {
    let mut engine = run_50_ticks();
    let first_run: Vec<_> = engine
        .trace()
        .iter()
        .map(|e| (e.active_jobs, e.active_services, e.aborted_jobs, e.declined_jobs, e.admitted_jobs))
        .collect();
    let first_revenue: Vec<f64> = engine.trace().iter().map(|e| e.acc_revenue).collect();
    let first_penalty: Vec<f64> = engine.trace().iter().map(|e| e.acc_penalty).collect();
    let first_bouncer: Vec<_> = engine
        .bouncer_trace()
        .iter()
        .map(|e| (e.base_value, e.tendency, e.new_jobs, e.derivative, e.quota))
        .collect();

    engine.start(50);

    let second_run: Vec<_> = engine
        .trace()
        .iter()
        .map(|e| (e.active_jobs, e.active_services, e.aborted_jobs, e.declined_jobs, e.admitted_jobs))
        .collect();
    let second_revenue: Vec<f64> = engine.trace().iter().map(|e| e.acc_revenue).collect();
    let second_penalty: Vec<f64> = engine.trace().iter().map(|e| e.acc_penalty).collect();
    let second_bouncer: Vec<_> = engine
        .bouncer_trace()
        .iter()
        .map(|e| (e.base_value, e.tendency, e.new_jobs, e.derivative, e.quota))
        .collect();

    assert_eq!(first_run, second_run);
    assert_eq!(first_revenue, second_revenue);
    assert_eq!(first_penalty, second_penalty);
    assert_eq!(first_bouncer, second_bouncer);
}

#[test]
fn trace_has_exactly_one_entry_per_tick() {
    let engine = run_50_ticks();
    assert_eq!(engine.trace().len(), 50);
    assert_eq!(engine.bouncer_trace().len(), 50);
}
