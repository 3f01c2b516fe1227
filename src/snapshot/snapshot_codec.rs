use std::borrow::Cow;
use std::collections::HashSet;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml, YamlEmitter};
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::debug;

use crate::znode::{InvalidPathError, Node, path};

const FORMAT_VERSION: i64 = 1;

const VERSION_KEY: &str = "version";
const NODE_COUNT_KEY: &str = "node_count";
const ROOT_KEY: &str = "root";
const PATH_KEY: &str = "path";
const DATA_KEY: &str = "data";
const DATA_BASE64_KEY: &str = "data_base64";
const CHILDREN_KEY: &str = "children";

/// How node payloads are written into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadStyle {
    /// UTF-8 payloads as plain strings, everything else as base64.
    Text,
    /// Every payload as base64.
    Base64,
}

/// Encodes `tree` as a single YAML document.
///
/// Payloads are kept readable where possible. The output is decoded again before
/// it is returned; if a readable payload does not survive that, every payload
/// is written as base64 instead.
pub fn encode(tree: &Node) -> Result<Vec<u8>, EncodeError> {
    let text = emit(tree, PayloadStyle::Text)?;
    if decodes_to(&text, tree) {
        return Ok(text.into_bytes());
    }

    debug!("Readable payloads did not round-trip, falling back to base64");
    let text = emit(tree, PayloadStyle::Base64)?;
    ensure!(decodes_to(&text, tree), NotRepresentableSnafu { path: &tree.path });
    Ok(text.into_bytes())
}

/// Decodes a document produced by [`encode`], rejecting anything malformed or truncated.
pub fn decode(bytes: &[u8]) -> Result<Node, DecodeError> {
    let text = std::str::from_utf8(bytes).context(InvalidUtf8Snafu)?;
    let documents = Yaml::load_from_str(text).context(ParseSnafu)?;
    ensure!(
        documents.len() == 1,
        DocumentCountSnafu {
            count: documents.len()
        }
    );

    let top_level = Fields::new(&documents[0], "snapshot".to_string())?;
    let version = top_level.integer(VERSION_KEY)?;
    ensure!(version == FORMAT_VERSION, UnsupportedVersionSnafu { version });
    let declared = top_level.integer(NODE_COUNT_KEY)?;

    let root = decode_node(top_level.field(ROOT_KEY)?, None)?;

    let actual = root.count();
    ensure!(
        usize::try_from(declared).is_ok_and(|declared| declared == actual),
        NodeCountMismatchSnafu { declared, actual }
    );
    Ok(root)
}

fn emit(tree: &Node, style: PayloadStyle) -> Result<String, EncodeError> {
    let mut document = LinkedHashMap::new();
    document.insert(
        key(VERSION_KEY),
        Yaml::Value(Scalar::Integer(FORMAT_VERSION)),
    );
    document.insert(
        key(NODE_COUNT_KEY),
        Yaml::Value(Scalar::Integer(
            i64::try_from(tree.count()).unwrap_or(i64::MAX),
        )),
    );
    document.insert(key(ROOT_KEY), node_to_yaml(tree, style));

    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&Yaml::Mapping(document))
        .context(EmitSnafu)?;
    out.push('\n');
    Ok(out)
}

fn decodes_to(text: &str, tree: &Node) -> bool {
    match decode(text.as_bytes()) {
        Ok(decoded) => decoded == *tree,
        Err(err) => {
            debug!("Encoded snapshot failed verification: {}", err);
            false
        }
    }
}

fn node_to_yaml(node: &Node, style: PayloadStyle) -> Yaml<'static> {
    let mut mapping = LinkedHashMap::new();
    mapping.insert(key(PATH_KEY), string(node.path.clone()));

    match (style, std::str::from_utf8(&node.data)) {
        (PayloadStyle::Text, Ok(text)) => {
            mapping.insert(key(DATA_KEY), string(text.to_string()));
        }
        _ => {
            mapping.insert(key(DATA_BASE64_KEY), string(BASE64.encode(&node.data)));
        }
    }

    let children = node
        .children
        .iter()
        .map(|child| node_to_yaml(child, style))
        .collect();
    mapping.insert(key(CHILDREN_KEY), Yaml::Sequence(children));

    Yaml::Mapping(mapping)
}

fn decode_node(yaml: &Yaml, parent: Option<&str>) -> Result<Node, DecodeError> {
    let context = match parent {
        Some(parent) => format!("child of {parent}"),
        None => "root node".to_string(),
    };
    let fields = Fields::new(yaml, context)?;

    let node_path = fields.string(PATH_KEY)?;
    path::validate(node_path).context(InvalidPathSnafu)?;
    if let Some(parent) = parent {
        let nested = path::final_segment(node_path)
            .is_some_and(|name| path::join(parent, name) == node_path);
        ensure!(
            nested,
            NotNestedSnafu {
                path: node_path,
                parent,
            }
        );
    }

    let data = match (
        fields.optional_string(DATA_KEY)?,
        fields.optional_string(DATA_BASE64_KEY)?,
    ) {
        (Some(text), None) => text.as_bytes().to_vec(),
        (None, Some(encoded)) => BASE64
            .decode(encoded)
            .context(InvalidBase64Snafu { path: node_path })?,
        (Some(_), Some(_)) => return AmbiguousPayloadSnafu { path: node_path }.fail(),
        (None, None) => {
            return MissingFieldSnafu {
                field: DATA_KEY,
                context: node_path,
            }
            .fail();
        }
    };

    let mut seen = HashSet::new();
    let children = fields
        .sequence(CHILDREN_KEY)?
        .iter()
        .map(|child| {
            let child = decode_node(child, Some(node_path))?;
            ensure!(
                seen.insert(child.path.clone()),
                DuplicatePathSnafu { path: &child.path }
            );
            Ok(child)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Node::new(node_path, data).with_children(children))
}

fn key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

fn string(value: String) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Owned(value)))
}

/// Typed access to the fields of one YAML mapping.
struct Fields<'a, 'input> {
    mapping: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
    context: String,
}

impl<'a, 'input> Fields<'a, 'input> {
    fn new(yaml: &'a Yaml<'input>, context: String) -> Result<Self, DecodeError> {
        let mapping = yaml
            .as_mapping()
            .context(NotAMappingSnafu { context: &context })?;
        Ok(Fields { mapping, context })
    }

    fn optional(&self, field: &'static str) -> Option<&'a Yaml<'input>> {
        self.mapping.get(&key(field))
    }

    fn field(&self, field: &'static str) -> Result<&'a Yaml<'input>, DecodeError> {
        self.optional(field).context(MissingFieldSnafu {
            field,
            context: &self.context,
        })
    }

    fn optional_string(&self, field: &'static str) -> Result<Option<&'a str>, DecodeError> {
        self.optional(field)
            .map(|value| {
                value.as_str().context(WrongTypeSnafu {
                    field,
                    expected: "string",
                    context: &self.context,
                })
            })
            .transpose()
    }

    fn string(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        self.optional_string(field)?.context(MissingFieldSnafu {
            field,
            context: &self.context,
        })
    }

    fn integer(&self, field: &'static str) -> Result<i64, DecodeError> {
        match self.field(field)? {
            Yaml::Value(Scalar::Integer(value)) => Ok(*value),
            _ => WrongTypeSnafu {
                field,
                expected: "integer",
                context: &self.context,
            }
            .fail(),
        }
    }

    fn sequence(&self, field: &'static str) -> Result<&'a Vec<Yaml<'input>>, DecodeError> {
        self.field(field)?.as_sequence().context(WrongTypeSnafu {
            field,
            expected: "sequence",
            context: &self.context,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display("Failed to emit the snapshot document"))]
    EmitError { source: saphyr::EmitError },
    #[snafu(display("The tree rooted at {path} cannot be represented faithfully"))]
    NotRepresentable { path: String },
}

#[derive(Debug, Snafu)]
pub enum DecodeError {
    #[snafu(display("Snapshot is not valid UTF-8"))]
    InvalidUtf8 { source: std::str::Utf8Error },
    #[snafu(display("Failed to parse the snapshot document"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Expected exactly one document in the snapshot, found {count}"))]
    DocumentCount { count: usize },
    #[snafu(display("Expected the {context} to be a mapping"))]
    NotAMapping { context: String },
    #[snafu(display("Missing field '{field}' in {context}"))]
    MissingField {
        field: &'static str,
        context: String,
    },
    #[snafu(display("Field '{field}' in {context} should be a {expected}"))]
    WrongType {
        field: &'static str,
        expected: &'static str,
        context: String,
    },
    #[snafu(display("Unsupported snapshot version {version}"))]
    UnsupportedVersion { version: i64 },
    #[snafu(display("Snapshot contains an invalid path"))]
    InvalidPath { source: InvalidPathError },
    #[snafu(display("Node {path} is not a direct child of {parent}"))]
    NotNested { path: String, parent: String },
    #[snafu(display("Node {path} appears more than once"))]
    DuplicatePath { path: String },
    #[snafu(display("Node {path} has both a text and a base64 payload"))]
    AmbiguousPayload { path: String },
    #[snafu(display("Node {path} has a malformed base64 payload"))]
    InvalidBase64 {
        path: String,
        source: base64::DecodeError,
    },
    #[snafu(display("Snapshot declares {declared} nodes but contains {actual}"))]
    NodeCountMismatch { declared: i64, actual: usize },
}
