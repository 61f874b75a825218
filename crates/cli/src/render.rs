//! Terminal rendering of session state and events.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use console::style;
use srdfse_client::{ClientState, ConnectionPhase, FormField, Phase, SessionEvent};
use srdfse_protocol::{LangMap, Ontology, Resource, TreeType};

const TREES: [TreeType; 3] = [TreeType::Class, TreeType::Property, TreeType::Individual];

/// One row per resource, trees flattened depth-first.
pub fn ontology_table(state: &ClientState) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ontology", "tree", "hashCode", "localname", "label"]);

    let Some(set) = state.ontologies.as_ref() else {
        return table;
    };
    for onto in &set.ontologies {
        let name = ontology_name(onto);
        for tree_type in TREES {
            for resource in &onto.tree(tree_type).children {
                add_rows(&mut table, &name, tree_type, resource, 0, &state.lang);
            }
        }
    }
    table
}

fn ontology_name(onto: &Ontology) -> String {
    let prefix = if onto.prefix.is_empty() {
        "(no prefix)"
    } else {
        onto.prefix.as_str()
    };
    if onto.is_user || onto.index == 0 {
        prefix.to_string()
    } else {
        format!("{prefix} [{}]", onto.index)
    }
}

fn add_rows(
    table: &mut Table,
    ontology: &str,
    tree_type: TreeType,
    resource: &Resource,
    depth: usize,
    lang: &str,
) {
    let hash = resource
        .hash_code
        .map(|h| h.to_string())
        .unwrap_or_default();
    let name = format!("{}{}", "· ".repeat(depth), resource.localname);
    table.add_row(vec![
        Cell::new(ontology),
        Cell::new(tree_type),
        Cell::new(hash),
        Cell::new(name),
        Cell::new(text_in(&resource.label, lang)),
    ]);
    for child in &resource.children {
        add_rows(table, ontology, tree_type, child, depth + 1, lang);
    }
}

/// Text in `lang`, or any language when `lang` is missing.
fn text_in(map: &LangMap, lang: &str) -> String {
    map.get(lang)
        .or_else(|| map.values().next())
        .cloned()
        .unwrap_or_default()
}

/// One-line summary of the focused resource
pub fn focus_line(state: &ClientState) -> String {
    let focus = &state.focus;
    let res = focus.resource();
    let phase = match focus.phase() {
        Phase::Draft => style("draft").yellow(),
        Phase::PendingCreate => style("creating").cyan(),
        Phase::Persisted => style("saved").green(),
    };
    let hash = focus
        .hash_code()
        .map(|h| format!(" #{h}"))
        .unwrap_or_default();
    format!(
        "{} {}{} [{}] label={:?} comment={:?}",
        res.resource_type,
        style(&res.localname).bold(),
        hash,
        phase,
        text_in(&res.label, &state.lang),
        text_in(&res.comment, &state.lang),
    )
}

/// Prompt prefix reflecting the connection phase
pub fn prompt(state: &ClientState) -> String {
    let phase = match state.phase {
        ConnectionPhase::Connecting => style("connecting").dim(),
        ConnectionPhase::Open => style("syncing").cyan(),
        ConnectionPhase::Ready => style("ready").green(),
        ConnectionPhase::Disconnected => style("offline").red(),
        ConnectionPhase::Closed => style("closed").red(),
    };
    format!("[{} {}] ", state.session_id, phase)
}

/// Human text for a session event; `None` for events with no output.
pub fn describe(event: &SessionEvent, state: &ClientState) -> Option<String> {
    match event {
        SessionEvent::Connected => Some(format!("{} connected", style("*").green())),
        SessionEvent::Synced => Some(format!("{} {}", style("*").green(), focus_line(state))),
        SessionEvent::FocusInput(FormField::Label) => {
            Some(format!("{} {}", style(">").dim(), "type `label <text>`"))
        }
        SessionEvent::FocusInput(FormField::Comment) => Some(format!(
            "{} {}\n{} {}",
            style("*").green(),
            focus_line(state),
            style(">").dim(),
            "type `comment <text>`"
        )),
        SessionEvent::Rejected(violation) => Some(format!(
            "{} {} ({})",
            style("!").red(),
            violation,
            violation.code()
        )),
        SessionEvent::Navigate(_) => None,
        SessionEvent::Disconnected { reason } => Some(format!(
            "{} disconnected{}",
            style("!").red(),
            reason
                .as_deref()
                .map(|r| format!(": {r}"))
                .unwrap_or_default()
        )),
    }
}
