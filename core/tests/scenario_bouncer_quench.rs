//! Concrete end-to-end scenario (spec.md §8, scenario 5): under a
//! sustained rising load, the tendency bouncer's decline count is
//! monotonically non-decreasing and resource levels never exceed
//! capacity.

use snsim_core::bouncer::Bouncer;
use snsim_core::policy::Policy;
use snsim_core::scenario::loader::load_scenario;
use snsim_core::Engine;

const SCENARIO_XML: &str = r#"
    <SNSimScenario>
        <Parameters>
            <Seed>quench-seed</Seed>
            <GoldWeight>1</GoldWeight>
        </Parameters>
        <ResourcePools>
            <ResourcePool>
                <Identifier>P</Identifier>
                <Resources>
                    <CPU>20</CPU>
                </Resources>
            </ResourcePool>
        </ResourcePools>
        <Services>
            <Service>
                <Identifier>A</Identifier>
                <ResourcePool>P</ResourcePool>
                <Resources>
                    <CPU>3</CPU>
                </Resources>
                <Ticks>5</Ticks>
                <Revenue>1</Revenue>
                <Penalty>1</Penalty>
                <MaxAttempts>3</MaxAttempts>
            </Service>
        </Services>
        <JobTemplates>
            <JobTemplate>
                <Identifier>J1</Identifier>
                <Signature>(('A',))</Signature>
                <Revenue>1</Revenue>
                <Penalty>1</Penalty>
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
fn declined_jobs_never_decreases_and_resource_levels_stay_in_bounds() {
    let scenario = load_scenario(SCENARIO_XML).unwrap();
    let mut engine = Engine::new(scenario, Policy::Fcfs, Some(Bouncer::tendency()));
    engine.start(80);

    let mut last_declined = 0;
    for entry in engine.trace() {
        assert!(entry.declined_jobs >= last_declined, "declinedJobs must be non-decreasing");
        last_declined = entry.declined_jobs;
        for (_, _, level) in &entry.pool_levels {
            assert!((0.0..=1.0).contains(level), "normalised level must stay within [0, 1]");
        }
    }

    for entry in engine.bouncer_trace() {
        assert!((0.0..=1.0).contains(&entry.quota), "quota must stay within [0, 1]");
    }
}
