//! Job template signature grammar
//!
//! The source (`original_source/src/snsim/job.py`) parses the
//! `Signature` string by `eval`-ing it as a Python nested-tuple literal,
//! e.g. `(('A','B'),('C',))`. A systems implementation instead needs a
//! small dedicated parser for the grammar spec.md §9 gives:
//!
//! `signature := stage ("," stage)* ; stage := "(" id ("," id)* ")" ;
//! id := quoted-char`
//!
//! The worked examples in spec.md additionally wrap the whole stage
//! list in one sugar pair (`(('A','B'),('C',))`); that pair is stripped
//! only when parsing the raw string fails outright, so a bare
//! single-stage signature like `('A',)` (no sugar wrap at all) still
//! parses directly instead of being double-stripped into nonsense.

use std::collections::HashSet;

use crate::errors::SimError;

/// Parse a `Signature` string into an ordered list of stages, each
/// normalised to a sorted, deduplicated set of service-template
/// identifiers.
///
/// `job_template_id` is only used to label errors; `known_services` is
/// the scenario's set of declared service-template identifiers, used to
/// reject dangling references.
pub fn parse_signature(
    raw: &str,
    job_template_id: &str,
    known_services: &HashSet<String>,
) -> Result<Vec<Vec<String>>, SimError> {
    let trimmed = raw.trim();

    // The grammar itself needs no outer wrap (`('A','B'),('C',)` is a
    // complete two-stage signature on its own), so try it unstripped
    // first. The outer pair is only sugar when the raw string is one
    // fully-parenthesised span *and* that span isn't already the
    // signature's own single stage (`('A',)` parses correctly
    // unstripped; only a doubled wrap like `(('A',))` needs stripping).
    let unstripped = parse_body(trimmed, job_template_id, known_services);
    if unstripped.is_ok() {
        return unstripped;
    }
    if is_fully_wrapped(trimmed) {
        let stripped = &trimmed[1..trimmed.len() - 1];
        return parse_body(stripped, job_template_id, known_services);
    }
    unstripped
}

fn parse_body(
    body: &str,
    job_template_id: &str,
    known_services: &HashSet<String>,
) -> Result<Vec<Vec<String>>, SimError> {
    let mut stages = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format_error(job_template_id, "unbalanced parentheses"));
                }
                current.push(ch);
            }
            ',' if depth == 0 => {
                if !current.trim().is_empty() {
                    stages.push(parse_stage(&current, job_template_id, known_services)?);
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        stages.push(parse_stage(&current, job_template_id, known_services)?);
    }

    if depth != 0 {
        return Err(format_error(job_template_id, "unbalanced parentheses"));
    }
    if stages.is_empty() {
        return Err(format_error(job_template_id, "signature has no stages"));
    }

    Ok(stages)
}

fn parse_stage(
    raw: &str,
    job_template_id: &str,
    known_services: &HashSet<String>,
) -> Result<Vec<String>, SimError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('(') && trimmed.ends_with(')')) {
        return Err(format_error(job_template_id, "stage must be parenthesised"));
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    if inner.contains('(') || inner.contains(')') {
        return Err(SimError::TooManyNestedScopes {
            job_template: job_template_id.to_string(),
        });
    }

    let mut ids: Vec<String> = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue; // trailing comma, e.g. ('C',)
        }
        let id = parse_id(part, job_template_id)?;
        if !known_services.contains(&id) {
            return Err(SimError::InvalidServiceReference {
                job_template: job_template_id.to_string(),
                service_id: id,
            });
        }
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(format_error(job_template_id, "stage has no services"));
    }
    ids.sort();
    ids.dedup();
    Ok(ids)
}

fn parse_id(raw: &str, job_template_id: &str) -> Result<String, SimError> {
    let is_quoted = raw.len() >= 3
        && ((raw.starts_with('\'') && raw.ends_with('\'')) || (raw.starts_with('"') && raw.ends_with('"')));
    if is_quoted {
        let inner = &raw[1..raw.len() - 1];
        if inner.chars().count() == 1 {
            return Ok(inner.to_string());
        }
    }
    Err(format_error(
        job_template_id,
        &format!("'{raw}' is not a single quoted service identifier"),
    ))
}

fn is_fully_wrapped(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    if chars.first() != Some(&'(') || chars.last() != Some(&')') {
        return false;
    }
    let mut depth = 0i32;
    for (i, ch) in chars.iter().enumerate() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i != chars.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn format_error(job_template_id: &str, detail: &str) -> SimError {
    SimError::InvalidSignatureFormat {
        job_template: job_template_id.to_string(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_two_stage_signature() {
        let stages = parse_signature("(('A','B'),('C',))", "J2", &known(&["A", "B", "C"])).unwrap();
        assert_eq!(stages, vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string()]]);
    }

    #[test]
    fn parses_single_stage_without_outer_wrap() {
        let stages = parse_signature("('A',)", "J1", &known(&["A"])).unwrap();
        assert_eq!(stages, vec![vec!["A".to_string()]]);
    }

    #[test]
    fn normalises_stage_to_sorted_deduplicated_set() {
        let stages = parse_signature("(('B','A','A'),)", "J1", &known(&["A", "B"])).unwrap();
        assert_eq!(stages, vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn rejects_unknown_service_reference() {
        let err = parse_signature("(('Z',),)", "J1", &known(&["A"])).unwrap_err();
        assert!(matches!(err, SimError::InvalidServiceReference { .. }));
    }

    #[test]
    fn rejects_nesting_deeper_than_two_levels() {
        let err = parse_signature("((('A',)),)", "J1", &known(&["A"])).unwrap_err();
        assert!(matches!(err, SimError::TooManyNestedScopes { .. }));
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let err = parse_signature("(('A','B')", "J1", &known(&["A", "B"])).unwrap_err();
        assert!(matches!(err, SimError::InvalidSignatureFormat { .. }));
    }

    #[test]
    fn rejects_malformed_identifier() {
        let err = parse_signature("((A,),)", "J1", &known(&["A"])).unwrap_err();
        assert!(matches!(err, SimError::InvalidSignatureFormat { .. }));
    }
}
