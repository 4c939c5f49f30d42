// SPDX-License-Identifier: MIT

//! Hand-rolled frontmatter parsing for task markdown files (spec §3, §4.3).
//!
//! Only the subset of YAML the task files actually use: scalar `key:
//! value` lines and `key: [a, b, c]` lists. Not a general YAML parser —
//! task files are generated by [`crate::registry::render_task_markdown`],
//! so the format is ours to keep simple.

use crate::error::TasksError;
use amx_core::role::Role;
use amx_core::task_frontmatter::{Priority, TaskFrontmatter};

const DELIMITER: &str = "---";

/// Split `content` into frontmatter fields and the remaining body.
pub fn parse(content: &str) -> Result<(TaskFrontmatter, String), TasksError> {
    let mut lines = content.lines();
    let first = lines.next().unwrap_or("").trim();
    if first != DELIMITER {
        return Err(TasksError::FrontmatterParse("missing opening frontmatter delimiter".into()));
    }

    let mut id = None;
    let mut title = None;
    let mut status = None;
    let mut priority = Priority::default();
    let mut target_role = None;
    let mut dependencies = Vec::new();
    let mut estimated_hours = None;
    let mut milestone_id = None;
    let mut closed = false;
    let mut body_start = 0usize;

    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.trim() == DELIMITER {
            closed = true;
            body_start = idx + 1;
            break;
        }
        let Some((key, value)) = line.split_once(':') else { continue };
        let key = key.trim();
        let value = value.trim();
        match key {
            "id" => id = Some(value.to_string()),
            "title" => title = Some(value.to_string()),
            "status" => status = Some(value.to_string()),
            "priority" => priority = Priority::parse(value).unwrap_or_default(),
            "targetRole" | "target_role" => target_role = Role::parse(value),
            "dependencies" => dependencies = parse_list(value),
            "estimatedHours" | "estimated_hours" => estimated_hours = value.parse::<f64>().ok(),
            "milestoneId" | "milestone_id" => milestone_id = Some(value.to_string()),
            _ => {}
        }
    }

    if !closed {
        return Err(TasksError::FrontmatterParse("missing closing frontmatter delimiter".into()));
    }

    let frontmatter = TaskFrontmatter {
        id: id.ok_or_else(|| TasksError::FrontmatterParse("missing id".into()))?,
        title: title.unwrap_or_default(),
        status: status.unwrap_or_default(),
        priority,
        target_role,
        dependencies,
        estimated_hours,
        milestone_id: milestone_id.ok_or_else(|| TasksError::FrontmatterParse("missing milestoneId".into()))?,
    };

    let body = content.lines().skip(body_start).collect::<Vec<_>>().join("\n");
    Ok((frontmatter, body))
}

fn parse_list(value: &str) -> Vec<String> {
    let inner = value.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

/// Render a task markdown file from frontmatter + body.
pub fn render(frontmatter: &TaskFrontmatter, body: &str) -> String {
    let role = frontmatter.target_role.map(|r| r.as_str().to_string()).unwrap_or_default();
    let deps = frontmatter.dependencies.join(", ");
    let hours = frontmatter.estimated_hours.map(|h| h.to_string()).unwrap_or_default();
    format!(
        "---\nid: {}\ntitle: {}\nstatus: {}\npriority: {}\ntargetRole: {}\ndependencies: [{}]\nestimatedHours: {}\nmilestoneId: {}\n---\n\n{}\n",
        frontmatter.id,
        frontmatter.title,
        frontmatter.status,
        priority_str(frontmatter.priority),
        role,
        deps,
        hours,
        frontmatter.milestone_id,
        body.trim_start(),
    )
}

fn priority_str(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\nid: 01_foo\ntitle: Foo thing\nstatus: open\npriority: high\ntargetRole: developer\ndependencies: [a, b]\nestimatedHours: 3.5\nmilestoneId: m0_specs\n---\n\nDo the thing.\n";

    #[test]
    fn parses_all_fields() {
        let (fm, body) = parse(SAMPLE).unwrap();
        assert_eq!(fm.id, "01_foo");
        assert_eq!(fm.title, "Foo thing");
        assert_eq!(fm.priority, Priority::High);
        assert_eq!(fm.target_role, Some(Role::Developer));
        assert_eq!(fm.dependencies, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(fm.estimated_hours, Some(3.5));
        assert_eq!(fm.milestone_id, "m0_specs");
        assert_eq!(body.trim(), "Do the thing.");
    }

    #[test]
    fn priority_defaults_to_medium_when_absent() {
        let content = "---\nid: x\ntitle: X\nstatus: open\nmilestoneId: m0\n---\nbody\n";
        let (fm, _) = parse(content).unwrap();
        assert_eq!(fm.priority, Priority::Medium);
    }

    #[test]
    fn missing_opening_delimiter_is_rejected() {
        assert!(parse("no frontmatter here").is_err());
    }

    #[test]
    fn missing_closing_delimiter_is_rejected() {
        assert!(parse("---\nid: x\ntitle: X\n").is_err());
    }

    #[test]
    fn render_then_parse_round_trips_core_fields() {
        let (fm, _) = parse(SAMPLE).unwrap();
        let rendered = render(&fm, "Do the thing.");
        let (reparsed, body) = parse(&rendered).unwrap();
        assert_eq!(reparsed.id, fm.id);
        assert_eq!(reparsed.target_role, fm.target_role);
        assert_eq!(body.trim(), "Do the thing.");
    }
}
