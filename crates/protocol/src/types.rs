//! Core types shared across the protocol

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Language code → text (`{"en": "Network Device"}`)
pub type LangMap = BTreeMap<String, String>;

/// Server-assigned identity of a persisted resource or ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashCode(pub i64);

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for HashCode {
    fn from(value: i64) -> Self {
        HashCode(value)
    }
}

/// Resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Class,
    Property,
    #[serde(alias = "Instance")]
    Individual,
}

impl ResourceType {
    /// Classes use PascalCase local names, everything else camelCase.
    pub fn capitalizes_local_name(self) -> bool {
        matches!(self, ResourceType::Class)
    }

    /// The tree a resource of this kind is listed in
    pub fn tree_type(self) -> TreeType {
        match self {
            ResourceType::Class => TreeType::Class,
            ResourceType::Property => TreeType::Property,
            ResourceType::Individual => TreeType::Individual,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Class => "Class",
            ResourceType::Property => "Property",
            ResourceType::Individual => "Individual",
        };
        f.write_str(name)
    }
}

/// One of the three disjoint hierarchical views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    Class,
    Property,
    Individual,
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TreeType::Class => "class",
            TreeType::Property => "property",
            TreeType::Individual => "individual",
        };
        f.write_str(name)
    }
}

/// Field addressed by a `changed` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Label,
    Comment,
    Localname,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Label => "label",
            Field::Comment => "comment",
            Field::Localname => "localname",
        }
    }
}

/// Property facet that a `reset` request clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyFacet {
    Domain,
    Range,
}

/// Vocabularies the server ships for `importPreset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Xsd,
    Foaf,
    DcTerms,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Xsd, Preset::Foaf, Preset::DcTerms];

    /// Server-side resource path of the vocabulary
    pub fn path(self) -> &'static str {
        match self {
            Preset::Xsd => "/vocab/xsd.ttl",
            Preset::Foaf => "/vocab/foaf.ttl",
            Preset::DcTerms => "/vocab/dcterms.ttl",
        }
    }

    pub fn from_name(name: &str) -> Option<Preset> {
        match name.trim().to_ascii_lowercase().as_str() {
            "xsd" => Some(Preset::Xsd),
            "foaf" => Some(Preset::Foaf),
            "dcterms" | "dct" => Some(Preset::DcTerms),
            _ => None,
        }
    }
}

/// A Class, Property or Individual.
///
/// Absence of `hash_code` marks a draft the server has not acknowledged.
/// The decoration fields (`imported` .. `children`) are only ever filled
/// in by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub localname: String,
    #[serde(default)]
    pub label: LangMap,
    #[serde(default)]
    pub comment: LangMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_code: Option<HashCode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub imported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Box<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Box<Resource>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Resource>,
}

impl Resource {
    /// Fresh, empty draft of the given kind
    pub fn draft(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            localname: String::new(),
            label: LangMap::new(),
            comment: LangMap::new(),
            hash_code: None,
            imported: false,
            ontology_index: None,
            domain: None,
            range: None,
            children: Vec::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.hash_code.is_none()
    }

    /// Reference form used when only identity matters
    pub fn reference(&self) -> Option<ResourceRef> {
        self.hash_code.map(|hash_code| ResourceRef { hash_code })
    }

    /// Depth-first search of this resource and its children
    pub fn find(&self, hash_code: HashCode) -> Option<&Resource> {
        if self.hash_code == Some(hash_code) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(hash_code))
    }
}

/// Identity-only view of a resource or ontology (`{"hashCode": 42}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub hash_code: HashCode,
}

/// Root of one tree inside an ontology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeRoot {
    #[serde(default)]
    pub children: Vec<Resource>,
}

/// Ontology descriptor. Element 0 of an [`OntologySet`] is the one being
/// edited; the rest are read-only imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ontology {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_code: Option<HashCode>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub is_user: bool,
    #[serde(default)]
    pub classes: TreeRoot,
    #[serde(default)]
    pub properties: TreeRoot,
    #[serde(default)]
    pub individuals: TreeRoot,
}

impl Ontology {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
            hash_code: None,
            index: 0,
            is_user: false,
            classes: TreeRoot::default(),
            properties: TreeRoot::default(),
            individuals: TreeRoot::default(),
        }
    }

    pub fn tree(&self, tree_type: TreeType) -> &TreeRoot {
        match tree_type {
            TreeType::Class => &self.classes,
            TreeType::Property => &self.properties,
            TreeType::Individual => &self.individuals,
        }
    }

    pub fn find(&self, hash_code: HashCode) -> Option<&Resource> {
        [&self.classes, &self.properties, &self.individuals]
            .into_iter()
            .flat_map(|root| root.children.iter())
            .find_map(|res| res.find(hash_code))
    }
}

/// Full snapshot pushed in `init.state`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologySet {
    #[serde(default)]
    pub ontologies: Vec<Ontology>,
}

impl OntologySet {
    /// The ontology being edited
    pub fn primary(&self) -> Option<&Ontology> {
        self.ontologies.first()
    }

    pub fn primary_mut(&mut self) -> Option<&mut Ontology> {
        self.ontologies.first_mut()
    }

    pub fn find_resource(&self, hash_code: HashCode) -> Option<&Resource> {
        self.ontologies.iter().find_map(|onto| onto.find(hash_code))
    }
}
