//! Generic parameter extraction and validation.

use std::sync::OnceLock;

use regex::Regex;

use super::pattern::{CommandPattern, Params};

struct Extractors {
    project_id: Regex,
    group_ids: Regex,
    email: Regex,
    files: Vec<Regex>,
    branch_pair: Regex,
    branch: Regex,
}

fn extractors() -> &'static Extractors {
    static RE: OnceLock<Extractors> = OnceLock::new();
    RE.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("Invalid regex pattern");
        Extractors {
            project_id: re(r"(?i)\bproject\s+(?:id\s+)?(\d+)"),
            group_ids: re(r"(?i)\bgroups?\s+(\d[\d,\s]*)"),
            email: re(r"\b([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})\b"),
            files: vec![
                re(r"(?i)\bfile\s+(\S+\.\w+)"),
                re(r"(?i)\breport\s+(\S+\.\w+)"),
                re(r"(?i)\bsend\s+(\S+\.\w+)"),
                re(r"(?i)(\S+\.(?:pdf|html|txt|csv|json))\b"),
            ],
            branch_pair: re(r"(?i)\bfrom\s+(\S+)\s+to\s+(\S+)"),
            branch: re(r"(?i)\bbranch(?:es)?\s+(\S+)"),
        }
    })
}

fn first_capture(re: &Regex, input: &str) -> Option<String> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pulls well-known parameters out of `input` regardless of command:
/// `project_id`, `group_ids`, `email`, `file`, and either
/// `old_branch`/`new_branch` or `branch`.
#[must_use]
pub fn extract_common(input: &str) -> Params {
    let ex = extractors();
    let mut params = Params::new();

    if let Some(id) = first_capture(&ex.project_id, input) {
        params.insert("project_id".into(), id);
    }
    if let Some(ids) = first_capture(&ex.group_ids, input) {
        params.insert("group_ids".into(), ids.trim_end_matches([',', ' ']).to_string());
    }
    if let Some(email) = first_capture(&ex.email, input) {
        params.insert("email".into(), email);
    }
    if let Some(file) = ex.files.iter().find_map(|re| first_capture(re, input)) {
        params.insert("file".into(), file);
    }

    if let Some(caps) = ex.branch_pair.captures(input) {
        params.insert("old_branch".into(), caps[1].to_string());
        params.insert("new_branch".into(), caps[2].to_string());
    } else if let Some(branch) = ex
        .branch
        .captures_iter(input)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|word| !matches!(word.to_lowercase().as_str(), "in" | "from" | "to" | "for"))
    {
        params.insert("branch".into(), branch.to_string());
    }

    params
}

struct Checks {
    project_id: Regex,
    id_list: Regex,
    email: Regex,
    file: Regex,
}

fn checks() -> &'static Checks {
    static RE: OnceLock<Checks> = OnceLock::new();
    RE.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("Invalid regex pattern");
        Checks {
            project_id: re(r"^\d+$"),
            id_list: re(r"^[\d,\s]+$"),
            email: re(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"),
            file: re(r"\.\w+$"),
        }
    })
}

/// Checks `params` against `command`'s required parameters and the
/// per-name format rules. Returns whether everything passed, plus one
/// human-readable message per problem.
#[must_use]
pub fn validate_parameters(command: &CommandPattern, params: &Params) -> (bool, Vec<String>) {
    let mut errors: Vec<String> = command
        .required_params()
        .iter()
        .filter(|name| params.get(name.as_str()).map_or(true, |v| v.trim().is_empty()))
        .map(|name| format!("missing required parameter '{name}'"))
        .collect();

    let c = checks();
    for (name, value) in params {
        if value.is_empty() {
            continue;
        }
        let problem = match name.as_str() {
            "project_id" if !c.project_id.is_match(value) => Some("is not a valid project ID"),
            "group_ids" if !c.id_list.is_match(value) => Some("is not a valid group ID list"),
            "project_ids" if !c.id_list.is_match(value) => Some("is not a valid project ID list"),
            "email" if !c.email.is_match(value) => Some("is not a valid email address"),
            "file" if !c.file.is_match(value) => Some("does not appear to be a valid file"),
            _ => None,
        };
        if let Some(problem) = problem {
            errors.push(format!("{name}: '{value}' {problem}"));
        }
    }

    (errors.is_empty(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Operation;

    fn get<'p>(params: &'p Params, key: &str) -> Option<&'p str> {
        params.get(key).map(String::as_str)
    }

    #[test]
    fn extracts_ids_email_and_file() {
        let params = extract_common("mail report q3.pdf for project 42 to boss@example.com, groups 1, 2");
        assert_eq!(get(&params, "project_id"), Some("42"));
        assert_eq!(get(&params, "group_ids"), Some("1, 2"));
        assert_eq!(get(&params, "email"), Some("boss@example.com"));
        assert_eq!(get(&params, "file"), Some("q3.pdf"));
    }

    #[test]
    fn project_id_accepts_id_keyword() {
        let params = extract_common("stats for project id 7");
        assert_eq!(get(&params, "project_id"), Some("7"));
    }

    #[test]
    fn branch_pair_beats_single_branch() {
        let params = extract_common("change branch name from master to main");
        assert_eq!(get(&params, "old_branch"), Some("master"));
        assert_eq!(get(&params, "new_branch"), Some("main"));
        assert_eq!(get(&params, "branch"), None);
    }

    #[test]
    fn single_branch_skips_connectives() {
        let params = extract_common("update branches in develop");
        assert_eq!(get(&params, "branch"), None);
        let params = extract_common("update branch develop");
        assert_eq!(get(&params, "branch"), Some("develop"));
    }

    fn send_report() -> CommandPattern {
        CommandPattern::new(Operation::SendReport, r"send\s+(?P<file>\S+)\s+to\s+(?P<email>\S+)", "Send")
            .unwrap()
            .with_required(&["file", "email"])
    }

    #[test]
    fn missing_required_parameters_are_named() {
        let (ok, errors) = validate_parameters(&send_report(), &Params::new());
        assert!(!ok);
        assert_eq!(
            errors,
            vec!["missing required parameter 'file'", "missing required parameter 'email'"]
        );
    }

    #[test]
    fn format_errors_quote_the_value() {
        let mut params = Params::new();
        params.insert("file".into(), "report".into());
        params.insert("email".into(), "not-an-address".into());
        params.insert("project_id".into(), "12a".into());
        params.insert("group_ids".into(), "1,2;3".into());
        let (ok, errors) = validate_parameters(&send_report(), &params);
        assert!(!ok);
        assert!(errors.contains(&"file: 'report' does not appear to be a valid file".to_string()));
        assert!(errors.contains(&"email: 'not-an-address' is not a valid email address".to_string()));
        assert!(errors.contains(&"project_id: '12a' is not a valid project ID".to_string()));
        assert!(errors.contains(&"group_ids: '1,2;3' is not a valid group ID list".to_string()));
    }

    #[test]
    fn valid_parameters_pass() {
        let mut params = Params::new();
        params.insert("file".into(), "weekly.html".into());
        params.insert("email".into(), "team@company.com".into());
        params.insert("project_ids".into(), "1, 2,3".into());
        assert_eq!(validate_parameters(&send_report(), &params), (true, Vec::new()));
    }
}
