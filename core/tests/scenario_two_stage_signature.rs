//! Concrete end-to-end scenario (spec.md §8, scenario 3): a two-stage
//! signature advances from stage 0 to stage 1 only once every stage-0
//! service has finished. Driven through the full `Engine` pipeline: if
//! the stage advance were skipped (a job wrongly finishing after stage
//! 0 alone), `accRevenue` would already show the full payout one tick
//! earlier than asserted here.

use snsim_core::policy::Policy;
use snsim_core::scenario::loader::load_scenario;
use snsim_core::Engine;

const SCENARIO_XML: &str = r#"
    <SNSimScenario>
        <Parameters>
            <Seed>two-stage-signature</Seed>
            <GoldWeight>1</GoldWeight>
        </Parameters>
        <ResourcePools>
            <ResourcePool>
                <Identifier>P</Identifier>
                <Resources>
                    <CPU>2</CPU>
                </Resources>
            </ResourcePool>
        </ResourcePools>
        <Services>
            <Service>
                <Identifier>A</Identifier>
                <ResourcePool>P</ResourcePool>
                <Resources>
                    <CPU>1</CPU>
                </Resources>
                <Ticks>1</Ticks>
                <MaxAttempts>5</MaxAttempts>
            </Service>
            <Service>
                <Identifier>B</Identifier>
                <ResourcePool>P</ResourcePool>
                <Resources>
                    <CPU>1</CPU>
                </Resources>
                <Ticks>1</Ticks>
                <MaxAttempts>5</MaxAttempts>
            </Service>
        </Services>
        <JobTemplates>
            <JobTemplate>
                <Identifier>J2</Identifier>
                <Signature>(('A',),('B',))</Signature>
                <Revenue>2</Revenue>
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
fn job_only_pays_out_after_both_stages_finish() {
    let scenario = load_scenario(SCENARIO_XML).unwrap();
    let mut engine = Engine::new(scenario, Policy::Fcfs, None);
    engine.start(2);

    let tick0 = &engine.trace()[0];
    assert_eq!(tick0.acc_revenue, 0.0, "stage A alone must not finish the job or pay out revenue");

    let tick1 = &engine.trace()[1];
    assert_eq!(tick1.acc_revenue, 4.0, "both arrivals complete stage B on tick 1, paying out revenue=2 each");
}
