//! XML scenario file loader
//!
//! Grounded on `original_source/src/snsim/xmlloader.py`'s
//! `XMLScenarioLoader`: strict validation per entity, permissive over
//! the whole file (a bad row is skipped with a log line, loading
//! continues) — spec.md §6, §7.

use std::collections::{HashMap, HashSet};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::errors::SimError;
use crate::models::{Customer, JobTemplate, ResourcePool, ServiceTemplate};
use crate::scenario::signature::parse_signature;
use crate::scenario::Scenario;

/// A minimal in-memory XML tree; the scenario format is small and
/// shallow enough that a hand-rolled tree beats pulling in a full DOM.
#[derive(Debug, Default)]
struct Element {
    name: String,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }
}

/// Parse `xml` into a `Scenario`. Returns `Err` only for structural
/// problems that prevent loading at all (malformed XML, missing
/// required top-level sections); per-entity problems are logged and
/// skipped.
pub fn load_scenario(xml: &str) -> Result<Scenario, SimError> {
    let root = parse_tree(xml)
        .map_err(|e| SimError::InvalidScenario(format!("malformed scenario XML: {e}")))?;

    let mut scenario = Scenario::new();

    if let Some(parameters) = root.child("Parameters") {
        for param in &parameters.children {
            match param.name.as_str() {
                "Seed" => scenario.seed = param.text.trim().to_string(),
                "GoldWeight" => {
                    scenario.gold_weight = param.text.trim().parse().unwrap_or(1.0);
                }
                _ => {}
            }
        }
    }
    if scenario.gold_weight == 0.0 {
        scenario.gold_weight = 1.0;
    }

    load_resource_pools(&root, &mut scenario);
    load_service_templates(&root, &mut scenario);
    load_job_templates(&root, &mut scenario);
    load_customers(&root, &mut scenario);

    tracing::info!(
        pools = scenario.pools.len(),
        service_templates = scenario.service_templates.len(),
        job_templates = scenario.job_templates.len(),
        customers = scenario.customers.len(),
        "finished scenario XML import"
    );

    Ok(scenario)
}

fn load_resource_pools(root: &Element, scenario: &mut Scenario) {
    let Some(pool_list) = root.child("ResourcePools") else {
        return;
    };
    for pool_el in pool_list.children_named("ResourcePool") {
        let Some(identifier) = pool_el.text_of("Identifier") else {
            warn!("skipping resource pool: missing Identifier");
            continue;
        };
        if scenario.pools.contains_key(identifier) {
            warn!(identifier, "skipping resource pool: name already in use");
            continue;
        }
        let mut pool = ResourcePool::new(identifier);
        if let Some(resources) = pool_el.child("Resources") {
            for resource in &resources.children {
                match resource.text.trim().parse::<i64>() {
                    Ok(capacity) => pool.set_capacity(&resource.name, capacity),
                    Err(_) => warn!(
                        identifier,
                        resource = resource.name.as_str(),
                        "skipping resource: capacity is not a number"
                    ),
                }
            }
        }
        scenario.pools.insert(identifier.to_string(), pool);
    }
}

fn load_service_templates(root: &Element, scenario: &mut Scenario) {
    let Some(service_list) = root.child("Services") else {
        return;
    };
    for service_el in service_list.children_named("Service") {
        let Some(identifier) = service_el.text_of("Identifier") else {
            warn!("skipping service: missing Identifier");
            continue;
        };
        if scenario.service_templates.contains_key(identifier) {
            warn!(identifier, "skipping service: name already in use");
            continue;
        }
        let Some(pool_id) = service_el.text_of("ResourcePool") else {
            warn!(identifier, "skipping service: missing ResourcePool reference");
            continue;
        };
        if !scenario.pools.contains_key(pool_id) {
            warn!(identifier, pool_id, "skipping service: unknown resource pool");
            continue;
        }

        let Some(ticks) = service_el.text_of("Ticks").and_then(|s| s.parse::<u32>().ok()) else {
            warn!(identifier, "skipping service: missing or invalid Ticks");
            continue;
        };
        // Revenue/Penalty may live on the Service or on the JobTemplate
        // depending on file version (spec.md §6); the engine only ever
        // reads payoff off the JobTemplate, so a Service missing these
        // is not an error — default to 0 rather than dropping it.
        let revenue = service_el.text_of("Revenue").and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0);
        let penalty = service_el.text_of("Penalty").and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0);
        let max_attempts = service_el
            .text_of("MaxAttempts")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(1);

        let mut template = ServiceTemplate::new(identifier, pool_id, ticks, revenue, penalty, max_attempts);
        if let Some(resources) = service_el.child("Resources") {
            for resource in &resources.children {
                match resource.text.trim().parse::<i64>() {
                    Ok(amount) => template.set_demand(&resource.name, amount),
                    Err(_) => warn!(
                        identifier,
                        resource = resource.name.as_str(),
                        "skipping demand: amount is not a number"
                    ),
                }
            }
        }
        scenario.service_templates.insert(identifier.to_string(), template);
    }
}

fn load_job_templates(root: &Element, scenario: &mut Scenario) {
    let Some(job_list) = root.child("JobTemplates") else {
        return;
    };
    let known_services: HashSet<String> = scenario.service_templates.keys().cloned().collect();

    for job_el in job_list.children_named("JobTemplate") {
        let Some(identifier) = job_el.text_of("Identifier") else {
            warn!("skipping job template: missing Identifier");
            continue;
        };
        if scenario.job_templates.contains_key(identifier) {
            warn!(identifier, "skipping job template: name already in use");
            continue;
        }
        let (Some(signature_raw), Some(revenue), Some(penalty)) = (
            job_el.text_of("Signature"),
            job_el.text_of("Revenue").and_then(|s| s.parse::<f64>().ok()),
            job_el.text_of("Penalty").and_then(|s| s.parse::<f64>().ok()),
        ) else {
            warn!(identifier, "skipping job template: missing Signature/Revenue/Penalty");
            continue;
        };

        match parse_signature(signature_raw, identifier, &known_services) {
            Ok(signature) => {
                let template = JobTemplate::new(identifier, signature, revenue, penalty);
                scenario.job_template_ids.push(identifier.to_string());
                scenario.job_templates.insert(identifier.to_string(), template);
            }
            Err(err) => warn!(identifier, error = %err, "skipping job template"),
        }
    }
}

fn load_customers(root: &Element, scenario: &mut Scenario) {
    let Some(customer_list) = root.child("Customers") else {
        return;
    };
    for customer_el in customer_list.children_named("Customer") {
        let Some(identifier) = customer_el.text_of("Identifier") else {
            warn!("skipping customer: missing Identifier");
            continue;
        };
        if scenario.customers.contains_key(identifier) {
            warn!(identifier, "skipping customer: name already in use");
            continue;
        }
        let is_gold = customer_el.text_of("isGold") == Some("True");
        let customer = Customer::new(identifier, is_gold, scenario.gold_weight);
        scenario.customer_ids.push(identifier.to_string());
        scenario.customers.insert(identifier.to_string(), customer);
    }
}

fn parse_tree(xml: &str) -> Result<Element, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = vec![Element::default()];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                stack.push(Element {
                    name,
                    children: Vec::new(),
                    text: String::new(),
                });
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    let finished = stack.pop().unwrap();
                    stack.last_mut().unwrap().children.push(finished);
                }
            }
            Event::Empty(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                stack.last_mut().unwrap().children.push(Element {
                    name,
                    children: Vec::new(),
                    text: String::new(),
                });
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let mut root_wrapper = stack.pop().unwrap_or_default();
    Ok(root_wrapper.children.pop().unwrap_or(Element {
        name: "SNSimScenario".to_string(),
        children: Vec::new(),
        text: String::new(),
    }))
}
