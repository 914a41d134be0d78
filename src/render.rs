//! ASCII tree rendering for teams and owner lookups.

use crate::models::{OwnerMatch, Team};

const MEMBER: char = '@';

/// A labelled node with nested children.
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

fn team_node(team: &Team) -> Node {
    let title = if team.description.is_empty() {
        team.name.clone()
    } else {
        format!("{} ({})", team.name, team.description)
    };

    let members = team
        .members
        .iter()
        .map(|m| Node::leaf(format!("{}{} {}", MEMBER, m.username, m.display_name)))
        .collect();
    let paths = team
        .owned_paths()
        .iter()
        .map(|p| Node::leaf(p.clone()))
        .collect();

    Node {
        label: title,
        children: vec![
            Node {
                label: "members".to_string(),
                children: members,
            },
            Node {
                label: "paths".to_string(),
                children: paths,
            },
        ],
    }
}

/// Render teams with their members and owned paths.
///
/// Example output:
/// ```text
/// Payments (Card processing)
/// ├── members
/// │   ├── @alice Alice A.
/// │   └── @bob Bob B.
/// └── paths
///     └── /Modules/Payments
/// ```
pub fn render_teams(teams: &[Team]) -> String {
    let nodes: Vec<Node> = teams.iter().map(team_node).collect();
    render_tree(&nodes)
}

/// Render the owners of `query`, one root per matching team.
pub fn render_owners(query: &str, owners: &[OwnerMatch]) -> String {
    if owners.is_empty() {
        return format!("No owners for {}\n", query);
    }
    let nodes: Vec<Node> = owners
        .iter()
        .map(|owner| Node {
            label: owner.team_name.clone(),
            children: owner
                .matched_paths
                .iter()
                .map(|p| Node::leaf(p.clone()))
                .collect(),
        })
        .collect();
    render_tree(&nodes)
}

fn render_tree(nodes: &[Node]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(&mut output, node, "", true, true);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}
