//! Concrete end-to-end scenario (spec.md §8, scenario 1): single-stage
//! FCFS with capacity sufficient for every arriving job to run at once.
//! Driven through the full `Engine` pipeline (load -> Prioritise via
//! `Policy::Fcfs` -> Schedule -> Advance), not by hand-stepping models.

use snsim_core::policy::Policy;
use snsim_core::scenario::loader::load_scenario;
use snsim_core::Engine;

const SCENARIO_XML: &str = r#"
    <SNSimScenario>
        <Parameters>
            <Seed>fcfs-sufficient-capacity</Seed>
            <GoldWeight>1</GoldWeight>
        </Parameters>
        <ResourcePools>
            <ResourcePool>
                <Identifier>P</Identifier>
                <Resources>
                    <CPU>1000</CPU>
                </Resources>
            </ResourcePool>
        </ResourcePools>
        <Services>
            <Service>
                <Identifier>A</Identifier>
                <ResourcePool>P</ResourcePool>
                <Resources>
                    <CPU>5</CPU>
                </Resources>
                <Ticks>2</Ticks>
                <MaxAttempts>1</MaxAttempts>
            </Service>
        </Services>
        <JobTemplates>
            <JobTemplate>
                <Identifier>J1</Identifier>
                <Signature>(('A',))</Signature>
                <Revenue>1</Revenue>
                <Penalty>0</Penalty>
            </JobTemplate>
        </JobTemplates>
        <Customers>
            <Customer>
                <Identifier>C1</Identifier>
                <isGold>False</isGold>
            </Customer>
        </Customers>
    </SNSimScenario>
"#;

#[test]
fn sufficient_capacity_never_aborts_and_still_pays_out_revenue() {
    let scenario = load_scenario(SCENARIO_XML).unwrap();
    let mut engine = Engine::new(scenario, Policy::Fcfs, None);
    engine.start(6);

    for entry in engine.trace() {
        assert_eq!(entry.aborted_jobs, 0, "abundant capacity must never force an abort");
        for (_, _, level) in &entry.pool_levels {
            assert!((0.0..=1.0).contains(level), "normalised level must stay within capacity");
        }
    }

    let last = engine.trace().last().unwrap();
    assert!(last.acc_revenue > 0.0, "some arrivals must have run to completion and paid out");
}
