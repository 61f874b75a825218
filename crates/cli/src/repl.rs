//! Line commands of the interactive editor.
//!
//! A line parses into a [`Command`]. Commands that need the current
//! ontology snapshot (lookups by hashCode, drops on a root) are resolved
//! into client inputs with [`Intent::resolve`].

use srdfse_client::reparent::{begin_drag, DropTarget, TreeNode};
use srdfse_client::{ClientState, Input, RemoveTarget, Violation};
use srdfse_protocol::{Field, HashCode, Ontology, Preset, PropertyFacet, ResourceType, TreeType};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  new <class|property|individual>   start a fresh draft
  label <text>                      set the label in the current language
  comment <text>                    set the comment in the current language
  localname <text>                  set the local name (drafts only)
  lang <code>                       switch editing language
  create                            create the focused draft on the server
  save <label|comment>              send a change of the focused resource
  reset <domain|range>              clear a facet of the focused property
  focus <hashCode>                  bind a tree resource to the form
  rm [hashCode]                     remove the focused or given resource
  rm-ontology <index>               remove an imported ontology
  prefix <value>                    set the ontology prefix
  uri <value>                       set the ontology URI
  preset <xsd|foaf|dcterms|path>    import a vocabulary preset
  drag <tree> <hash> <tree> <hash|root>
                                    move a resource under another node
  show                              list the ontology trees
  help                              this text
  quit                              leave the editor";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{command}`: invalid {what} `{value}`")]
    InvalidArgument {
        command: &'static str,
        what: &'static str,
        value: String,
    },
}

#[derive(Debug)]
pub enum Command {
    Show,
    Help,
    Quit,
    Session(Intent),
}

/// Something to do with the session
#[derive(Debug)]
pub enum Intent {
    Input(Input),
    Focus(HashCode),
    Remove(HashCode),
    Drag {
        from: (TreeType, HashCode),
        to: (TreeType, TreeNode),
    },
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = |input: Input| -> Result<Option<Command>, ParseError> {
        Ok(Some(Command::Session(Intent::Input(input))))
    };
    match word {
        "show" | "ls" => Ok(Some(Command::Show)),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),

        "new" => input(Input::NewResource(resource_type("new", rest)?)),
        "label" => input(edit(Field::Label, rest)),
        "comment" => input(edit(Field::Comment, rest)),
        "localname" => input(edit(Field::Localname, required("localname", rest, "a name")?)),
        "lang" => input(Input::SetLang(required("lang", rest, "a language code")?.to_string())),
        "create" => input(Input::CreateResource),
        "save" => {
            let field = match required("save", rest, "`label` or `comment`")? {
                "label" => Field::Label,
                "comment" => Field::Comment,
                other => return Err(invalid("save", "field", other)),
            };
            input(Input::Changed(field))
        }
        "reset" => {
            let facet = match required("reset", rest, "`domain` or `range`")? {
                "domain" => PropertyFacet::Domain,
                "range" => PropertyFacet::Range,
                other => return Err(invalid("reset", "facet", other)),
            };
            input(Input::Reset(facet))
        }
        "focus" => Ok(Some(Command::Session(Intent::Focus(hash("focus", rest)?)))),
        "rm" if rest.is_empty() => input(Input::Remove(RemoveTarget::Focused)),
        "rm" => Ok(Some(Command::Session(Intent::Remove(hash("rm", rest)?)))),
        "rm-ontology" => {
            let raw = required("rm-ontology", rest, "an ontology index")?;
            let index = raw
                .parse()
                .map_err(|_| invalid("rm-ontology", "index", raw))?;
            input(Input::Remove(RemoveTarget::Ontology(index)))
        }
        "prefix" => input(Input::SetPrefix(rest.to_string())),
        "uri" => input(Input::SetUri(rest.to_string())),
        "preset" => {
            let name = required("preset", rest, "a preset name or path")?;
            let preset = Preset::from_name(name)
                .map(|p| p.path().to_string())
                .unwrap_or_else(|| name.to_string());
            input(Input::ImportPreset(preset))
        }
        "drag" => parse_drag(rest).map(|intent| Some(Command::Session(intent))),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn edit(field: Field, value: &str) -> Input {
    Input::Edit {
        field,
        value: value.to_string(),
    }
}

fn required<'a>(
    command: &'static str,
    rest: &'a str,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, what })
    } else {
        Ok(rest)
    }
}

fn invalid(command: &'static str, what: &'static str, value: &str) -> ParseError {
    ParseError::InvalidArgument {
        command,
        what,
        value: value.to_string(),
    }
}

fn resource_type(command: &'static str, raw: &str) -> Result<ResourceType, ParseError> {
    match required(command, raw, "a resource type")? {
        "class" => Ok(ResourceType::Class),
        "property" => Ok(ResourceType::Property),
        "individual" => Ok(ResourceType::Individual),
        other => Err(invalid(command, "resource type", other)),
    }
}

fn tree_type(raw: &str) -> Result<TreeType, ParseError> {
    match raw {
        "class" => Ok(TreeType::Class),
        "property" => Ok(TreeType::Property),
        "individual" => Ok(TreeType::Individual),
        other => Err(invalid("drag", "tree", other)),
    }
}

fn hash(command: &'static str, raw: &str) -> Result<HashCode, ParseError> {
    let raw = required(command, raw, "a hashCode")?;
    raw.parse::<i64>()
        .map(HashCode)
        .map_err(|_| invalid(command, "hashCode", raw))
}

fn parse_drag(rest: &str) -> Result<Intent, ParseError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [src_tree, src_hash, dst_tree, dst] = parts.as_slice() else {
        return Err(ParseError::MissingArgument {
            command: "drag",
            what: "<tree> <hash> <tree> <hash|root>",
        });
    };
    let to = match *dst {
        "root" => TreeNode::Root,
        raw => TreeNode::Resource(hash("drag", raw)?),
    };
    Ok(Intent::Drag {
        from: (tree_type(src_tree)?, hash("drag", src_hash)?),
        to: (tree_type(dst_tree)?, to),
    })
}

impl Intent {
    /// Turn the intent into a client input against the current snapshot.
    pub fn resolve(self, state: &ClientState) -> Result<Input, Violation> {
        match self {
            Intent::Input(input) => Ok(input),
            Intent::Focus(hash_code) => lookup(state, hash_code).map(Input::Focus),
            Intent::Remove(hash_code) => lookup(state, hash_code)
                .map(|resource| Input::Remove(RemoveTarget::Resource(resource))),
            Intent::Drag { from, to } => {
                let (src_tree, src_hash) = from;
                let (dst_tree, dst_node) = to;
                lookup(state, src_hash)?;
                let ontology = match dst_node {
                    TreeNode::Resource(dst_hash) => {
                        lookup(state, dst_hash)?;
                        owning_ontology(state, dst_hash)
                    }
                    TreeNode::Root => state.ontologies.as_ref().and_then(|set| set.primary()),
                }
                .and_then(|onto| onto.hash_code)
                .ok_or(Violation::NoPrimaryOntology)?;

                let token = begin_drag(src_tree, TreeNode::Resource(src_hash))
                    .ok_or(Violation::UnknownResource(src_hash))?;
                Ok(Input::Drop {
                    token,
                    target: DropTarget {
                        tree_type: dst_tree,
                        node: dst_node,
                        ontology,
                    },
                })
            }
        }
    }
}

fn lookup(state: &ClientState, hash_code: HashCode) -> Result<srdfse_protocol::Resource, Violation> {
    state
        .ontologies
        .as_ref()
        .and_then(|set| set.find_resource(hash_code))
        .cloned()
        .ok_or(Violation::UnknownResource(hash_code))
}

fn owning_ontology(state: &ClientState, hash_code: HashCode) -> Option<&Ontology> {
    state
        .ontologies
        .as_ref()?
        .ontologies
        .iter()
        .find(|onto| onto.find(hash_code).is_some())
}
